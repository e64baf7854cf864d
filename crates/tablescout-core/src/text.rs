//! Text elements and the normalized page content they belong to.

use std::collections::BTreeMap;

use crate::geometry::BBox;
use crate::segments::Segment;

/// A run of text (word or glyph group) extracted from a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextElement {
    /// The text content.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font size in points.
    pub font_size: f64,
}

impl TextElement {
    pub fn new(text: impl Into<String>, bbox: BBox, font_size: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
        }
    }
}

/// Normalized content of one page: dimensions, ruling segments and text.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageElements {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
    /// Ruling-line segments drawn on the page.
    pub segments: Vec<Segment>,
    /// Text elements on the page.
    pub texts: Vec<TextElement>,
}

impl PageElements {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Builder-style setter for the ruling segments.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Builder-style setter for the text elements.
    pub fn with_texts(mut self, texts: Vec<TextElement>) -> Self {
        self.texts = texts;
        self
    }

    /// Text elements whose center lies inside `bbox`.
    pub fn texts_within<'a>(&'a self, bbox: &'a BBox) -> impl Iterator<Item = &'a TextElement> {
        self.texts.iter().filter(move |t| {
            let (cx, cy) = t.bbox.center();
            bbox.contains_point(cx, cy)
        })
    }
}

/// Summary font statistics of one page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStats {
    /// Most frequent font size (ties resolve to the smaller size).
    pub dominant_size: f64,
    /// Mean font size.
    pub mean_size: f64,
    /// Smallest font size.
    pub min_size: f64,
    /// Largest font size.
    pub max_size: f64,
    /// Number of text elements the statistics were computed from.
    pub count: usize,
}

impl FontStats {
    /// Compute statistics from text elements. Sizes are bucketed to a tenth
    /// of a point before the mode is taken.
    ///
    /// Returns all-zero statistics for an empty slice.
    pub fn from_texts(texts: &[TextElement]) -> Self {
        if texts.is_empty() {
            return Self::default();
        }

        let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
        let mut sum = 0.0;
        let mut min_size = f64::INFINITY;
        let mut max_size = f64::NEG_INFINITY;
        for t in texts {
            *histogram.entry((t.font_size * 10.0).round() as i64).or_default() += 1;
            sum += t.font_size;
            min_size = min_size.min(t.font_size);
            max_size = max_size.max(t.font_size);
        }

        // BTreeMap iterates ascending, so the first maximum wins ties.
        let mut dominant_key = 0;
        let mut dominant_count = 0;
        for (&key, &count) in &histogram {
            if count > dominant_count {
                dominant_key = key;
                dominant_count = count;
            }
        }

        Self {
            dominant_size: dominant_key as f64 / 10.0,
            mean_size: sum / texts.len() as f64,
            min_size,
            max_size,
            count: texts.len(),
        }
    }
}
