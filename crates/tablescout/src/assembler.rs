//! Feature assembly: one feature vector per candidate box.

use tablescout_core::{
    AlignmentFeatures, BBox, Candidate, CandidateSource, FontStats, LineFeatures, PageElements,
    PageRef, RulingFeatures, TextAlignmentFeatures,
};

use crate::error::ExtractError;

/// Combines alignment and line features into per-candidate vectors.
///
/// Alignment boxes keep the parser's feature rows; line boxes get theirs
/// from the alignment feature function. Line features are computed for
/// every box. Each candidate's vector is its alignment row followed by its
/// line row.
#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler<A = TextAlignmentFeatures, L = RulingFeatures> {
    alignment: A,
    lines: L,
}

impl<A: AlignmentFeatures, L: LineFeatures> FeatureAssembler<A, L> {
    pub fn new(alignment: A, lines: L) -> Self {
        Self { alignment, lines }
    }

    /// Width of every assembled feature vector.
    pub fn width(&self) -> usize {
        self.alignment.width() + self.lines.width()
    }

    /// Width of the alignment part; parser rows must match it.
    pub fn alignment_width(&self) -> usize {
        self.alignment.width()
    }

    /// Assemble the candidates of one page.
    ///
    /// Candidates are returned alignment boxes first, then line boxes, each
    /// in input order. No feature function runs when both lists are empty.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FeatureRowMismatch`] if any feature matrix
    /// disagrees with its box list in row count, and
    /// [`ExtractError::FeatureWidthMismatch`] if a row is not as wide as its
    /// feature function declares.
    pub fn assemble(
        &self,
        page: PageRef,
        alignment_boxes: &[BBox],
        alignment_rows: Vec<Vec<f64>>,
        line_boxes: &[BBox],
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Result<Vec<Candidate>, ExtractError> {
        let total = alignment_boxes.len() + line_boxes.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mismatch = |expected: usize, actual: usize| ExtractError::FeatureRowMismatch {
            page: page.number,
            expected,
            actual,
        };

        let check_width = |rows: &[Vec<f64>], expected: usize| {
            match rows.iter().find(|row| row.len() != expected) {
                Some(row) => Err(ExtractError::FeatureWidthMismatch {
                    page: page.number,
                    expected,
                    actual: row.len(),
                }),
                None => Ok(()),
            }
        };

        if alignment_rows.len() != alignment_boxes.len() {
            return Err(mismatch(alignment_boxes.len(), alignment_rows.len()));
        }
        check_width(&alignment_rows, self.alignment.width())?;

        let line_box_rows = self.alignment.compute(line_boxes, elements, font_stats);
        if line_box_rows.len() != line_boxes.len() {
            return Err(mismatch(line_boxes.len(), line_box_rows.len()));
        }
        check_width(&line_box_rows, self.alignment.width())?;

        let boxes: Vec<BBox> = alignment_boxes
            .iter()
            .chain(line_boxes.iter())
            .copied()
            .collect();
        let line_rows = self.lines.compute(&boxes, elements);
        if line_rows.len() != total {
            return Err(mismatch(total, line_rows.len()));
        }
        check_width(&line_rows, self.lines.width())?;

        let sources = std::iter::repeat_n(CandidateSource::Alignment, alignment_boxes.len())
            .chain(std::iter::repeat_n(CandidateSource::Lines, line_boxes.len()));

        let candidates = boxes
            .into_iter()
            .zip(sources)
            .zip(alignment_rows.into_iter().chain(line_box_rows))
            .zip(line_rows)
            .map(|(((bbox, source), mut features), line_row)| {
                features.extend(line_row);
                Candidate {
                    page,
                    bbox,
                    source,
                    features,
                }
            })
            .collect();
        Ok(candidates)
    }
}
