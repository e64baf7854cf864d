//! Document sources and page normalization.
//!
//! A [`DocumentSource`] yields raw page layouts in page order; a
//! [`Normalizer`] turns one raw layout into the [`PageElements`] and
//! [`FontStats`] the detectors work on.

use tablescout_core::{FontStats, PageElements, Segment, TextElement};

use crate::error::ExtractError;

/// A document that can produce raw page layouts by 0-based index.
///
/// Page numbers reported downstream are `index + 1`.
pub trait DocumentSource {
    /// Raw layout of a single page.
    type Page;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw layout of the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Source`] if the page cannot be produced.
    fn page(&self, index: usize) -> Result<Self::Page, ExtractError>;
}

/// Converts a raw page layout into normalized page elements.
///
/// Implementations must be deterministic; every geometric quantity is
/// multiplied by `scale`.
pub trait Normalizer<P> {
    fn normalize(&self, page: &P, scale: f64) -> (PageElements, FontStats);
}

/// Raw content of one page as delivered by a content extractor.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPage {
    pub width: f64,
    pub height: f64,
    pub segments: Vec<Segment>,
    pub texts: Vec<TextElement>,
}

impl RawPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_texts(mut self, texts: Vec<TextElement>) -> Self {
        self.texts = texts;
        self
    }
}

impl DocumentSource for Vec<RawPage> {
    type Page = RawPage;

    fn page_count(&self) -> usize {
        self.len()
    }

    fn page(&self, index: usize) -> Result<RawPage, ExtractError> {
        self.get(index).cloned().ok_or_else(|| ExtractError::Source {
            page: index + 1,
            message: format!(
                "page index {index} out of range (document has {} pages)",
                self.len()
            ),
        })
    }
}

/// Built-in normalizer for [`RawPage`]: scales all geometry uniformly and
/// computes font statistics over the scaled text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleNormalizer;

impl Normalizer<RawPage> for ScaleNormalizer {
    fn normalize(&self, page: &RawPage, scale: f64) -> (PageElements, FontStats) {
        let segments = page
            .segments
            .iter()
            .map(|s| Segment::new(s.x0 * scale, s.y0 * scale, s.x1 * scale, s.y1 * scale))
            .collect();
        let texts: Vec<TextElement> = page
            .texts
            .iter()
            .map(|t| {
                TextElement::new(
                    t.text.clone(),
                    t.bbox.scaled(scale, scale),
                    t.font_size * scale,
                )
            })
            .collect();
        let font_stats = FontStats::from_texts(&texts);
        let elements = PageElements::new(page.width * scale, page.height * scale)
            .with_segments(segments)
            .with_texts(texts);
        (elements, font_stats)
    }
}
