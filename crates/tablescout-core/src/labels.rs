//! Ground-truth labeling of candidates by Intersection-over-Union.

use std::collections::HashMap;

use crate::candidate::{Candidate, PageRef};
use crate::error::ConfigError;
use crate::geometry::BBox;

/// Default IoU a candidate must exceed to be labeled a table.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.8;

/// An annotated table, recorded on a page of known dimensions.
///
/// The recording dimensions may differ from the candidate's page
/// dimensions (e.g., annotations made on a rendering at another scale).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundTruthTable {
    /// Width of the page the annotation was recorded on.
    pub page_width: f64,
    /// Height of the page the annotation was recorded on.
    pub page_height: f64,
    /// Table region in the recording coordinate space.
    pub bbox: BBox,
}

impl GroundTruthTable {
    pub fn new(page_width: f64, page_height: f64, bbox: BBox) -> Self {
        Self {
            page_width,
            page_height,
            bbox,
        }
    }

    /// Build from a `(page_width, page_height, y0, x0, y1, x1)` tuple.
    pub fn from_tuple(t: (f64, f64, f64, f64, f64, f64)) -> Self {
        let (page_width, page_height, y0, x0, y1, x1) = t;
        Self::new(page_width, page_height, BBox::from_yx(y0, x0, y1, x1))
    }

    /// The table region in `page`'s coordinate space.
    ///
    /// x coordinates scale by `page.width / page_width`, y coordinates by
    /// `page.height / page_height`. Returns `None` when the recorded
    /// dimensions are not positive.
    pub fn rescaled_to(&self, page: &PageRef) -> Option<BBox> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return None;
        }
        let w_ratio = page.width / self.page_width;
        let h_ratio = page.height / self.page_height;
        Some(self.bbox.scaled(w_ratio, h_ratio))
    }
}

/// Ground-truth tables keyed by page number (1-indexed).
pub type GroundTruth = HashMap<usize, Vec<GroundTruthTable>>;

/// Assigns binary labels to candidates by IoU with ground-truth tables.
///
/// Serializes as its bare threshold; deserializing goes through
/// [`Labeler::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Labeler {
    iou_threshold: f64,
}

impl Default for Labeler {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

impl TryFrom<f64> for Labeler {
    type Error = ConfigError;

    fn try_from(iou_threshold: f64) -> Result<Self, Self::Error> {
        Self::new(iou_threshold)
    }
}

impl From<Labeler> for f64 {
    fn from(labeler: Labeler) -> Self {
        labeler.iou_threshold
    }
}

impl Labeler {
    /// Create a labeler with a custom IoU threshold in `[0, 1]`.
    pub fn new(iou_threshold: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&iou_threshold) {
            return Err(ConfigError::InvalidIouThreshold(iou_threshold));
        }
        Ok(Self { iou_threshold })
    }

    pub fn iou_threshold(&self) -> f64 {
        self.iou_threshold
    }

    /// One label per candidate: 1 when some ground-truth table on the
    /// candidate's page overlaps it with IoU above the threshold, else 0.
    ///
    /// Pages missing from `ground_truth` label all their candidates 0.
    pub fn label<'a, I>(&self, candidates: I, ground_truth: &GroundTruth) -> Vec<u8>
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        candidates
            .into_iter()
            .map(|candidate| {
                let tables = ground_truth
                    .get(&candidate.page.number)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                match self.best_match(candidate, tables) {
                    Some((_, iou)) if iou > self.iou_threshold => 1,
                    _ => 0,
                }
            })
            .collect()
    }

    /// Index and IoU of the ground-truth table overlapping `candidate` the
    /// most, or `None` when no table can be rescaled onto its page.
    pub fn best_match(
        &self,
        candidate: &Candidate,
        tables: &[GroundTruthTable],
    ) -> Option<(usize, f64)> {
        tables
            .iter()
            .enumerate()
            .filter_map(|(i, table)| {
                table
                    .rescaled_to(&candidate.page)
                    .map(|gt| (i, candidate.bbox.iou(&gt)))
            })
            .fold(None, |best: Option<(usize, f64)>, (i, iou)| match best {
                Some((_, best_iou)) if best_iou >= iou => best,
                _ => Some((i, iou)),
            })
    }
}

/// Label candidates with the default threshold.
pub fn label_candidates<'a, I>(candidates: I, ground_truth: &GroundTruth) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    Labeler::default().label(candidates, ground_truth)
}
