//! Alignment candidate detection.
//!
//! Table-like text blocks come from a [`LayoutParser`]. Parser failures are
//! isolated to the page: [`AlignmentDetector::detect`] turns them into an
//! explicit [`LayoutOutcome::Failed`] so the page still yields its ruling-line
//! candidates.

use tablescout_core::{
    AlignmentFeatures, BBox, ExtractWarning, ExtractWarningCode, FontStats, LayoutError,
    LayoutNode, LayoutSettings, PageElements, TextAlignmentFeatures, find_table_nodes,
};

/// Table-like nodes found on a page, with one alignment feature row per node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLayout {
    pub nodes: Vec<LayoutNode>,
    pub features: Vec<Vec<f64>>,
}

impl ParsedLayout {
    pub fn new(nodes: Vec<LayoutNode>, features: Vec<Vec<f64>>) -> Self {
        Self { nodes, features }
    }

    /// Node regions in node order.
    pub fn boxes(&self) -> Vec<BBox> {
        self.nodes.iter().map(|n| n.bbox).collect()
    }
}

/// Groups page text into table-like layout nodes.
pub trait LayoutParser {
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the page cannot be parsed. The error is
    /// recoverable: the page continues without alignment candidates.
    fn parse(
        &self,
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Result<ParsedLayout, LayoutError>;
}

impl<F> LayoutParser for F
where
    F: Fn(&PageElements, &FontStats) -> Result<ParsedLayout, LayoutError>,
{
    fn parse(
        &self,
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Result<ParsedLayout, LayoutError> {
        self(elements, font_stats)
    }
}

/// Built-in layout parser over text block grouping.
///
/// Nodes are the blocks [`find_table_nodes`] reports as table-like; their
/// feature rows are [`TextAlignmentFeatures`] of the node boxes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlockParser {
    settings: LayoutSettings,
    features: TextAlignmentFeatures,
}

impl TextBlockParser {
    pub fn new(settings: LayoutSettings) -> Self {
        let features = TextAlignmentFeatures::new(settings.align_tolerance);
        Self { settings, features }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }
}

impl LayoutParser for TextBlockParser {
    fn parse(
        &self,
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Result<ParsedLayout, LayoutError> {
        if elements.width <= 0.0 || elements.height <= 0.0 {
            return Err(LayoutError::InvalidPageSize {
                width: elements.width,
                height: elements.height,
            });
        }
        if elements.texts.is_empty() {
            return Err(LayoutError::NoText);
        }

        let nodes = find_table_nodes(&elements.texts, &self.settings);
        let boxes: Vec<BBox> = nodes.iter().map(|n| n.bbox).collect();
        let features = self.features.compute(&boxes, elements, font_stats);
        Ok(ParsedLayout::new(nodes, features))
    }
}

/// Why alignment candidates were dropped for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFailure {
    pub code: ExtractWarningCode,
    pub reason: String,
}

impl LayoutFailure {
    /// Warning describing this failure on `page`.
    pub fn to_warning(&self, page: usize) -> ExtractWarning {
        ExtractWarning::with_code(self.code.clone(), self.reason.clone()).on_page(page)
    }
}

/// Result of running the layout parser on one page.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    Parsed {
        nodes: Vec<LayoutNode>,
        features: Vec<Vec<f64>>,
    },
    Failed(LayoutFailure),
}

impl LayoutOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, LayoutOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&LayoutFailure> {
        match self {
            LayoutOutcome::Failed(failure) => Some(failure),
            LayoutOutcome::Parsed { .. } => None,
        }
    }

    /// Candidate boxes and their feature rows; both empty on failure.
    pub fn into_parts(self) -> (Vec<BBox>, Vec<Vec<f64>>) {
        match self {
            LayoutOutcome::Parsed { nodes, features } => {
                (nodes.iter().map(|n| n.bbox).collect(), features)
            }
            LayoutOutcome::Failed(_) => (Vec::new(), Vec::new()),
        }
    }
}

/// Runs a [`LayoutParser`] and validates what it returns.
#[derive(Debug, Clone)]
pub struct AlignmentDetector<P> {
    parser: P,
    feature_width: usize,
}

impl<P: LayoutParser> AlignmentDetector<P> {
    /// `feature_width` is the number of columns every parser row must have.
    pub fn new(parser: P, feature_width: usize) -> Self {
        Self {
            parser,
            feature_width,
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Detect alignment candidates on page `page` (1-indexed).
    ///
    /// Parser errors, and feature rows that do not match the nodes one for
    /// one at the expected width, yield [`LayoutOutcome::Failed`].
    pub fn detect(
        &self,
        page: usize,
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> LayoutOutcome {
        let parsed = match self.parser.parse(elements, font_stats) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Layout parser failed on page {}: {}", page, e);
                return LayoutOutcome::Failed(LayoutFailure {
                    code: ExtractWarningCode::LayoutParserFailed,
                    reason: format!("layout parser failed: {e}"),
                });
            }
        };

        if parsed.features.len() != parsed.nodes.len() {
            tracing::warn!(
                "Layout parser returned {} feature rows for {} nodes on page {}",
                parsed.features.len(),
                parsed.nodes.len(),
                page
            );
            return LayoutOutcome::Failed(LayoutFailure {
                code: ExtractWarningCode::LayoutFeatureMismatch,
                reason: format!(
                    "layout parser returned {} feature rows for {} nodes",
                    parsed.features.len(),
                    parsed.nodes.len()
                ),
            });
        }

        if let Some(row) = parsed
            .features
            .iter()
            .find(|row| row.len() != self.feature_width)
        {
            tracing::warn!(
                "Layout parser returned a {}-column feature row on page {} (expected {})",
                row.len(),
                page,
                self.feature_width
            );
            return LayoutOutcome::Failed(LayoutFailure {
                code: ExtractWarningCode::LayoutFeatureMismatch,
                reason: format!(
                    "layout feature row has {} columns, expected {}",
                    row.len(),
                    self.feature_width
                ),
            });
        }

        LayoutOutcome::Parsed {
            nodes: parsed.nodes,
            features: parsed.features,
        }
    }
}
