//! Ruling-line segments and their classification.
//!
//! Raw [`Segment`]s come straight from the page content and may have their
//! endpoints in any order. Classification turns them into axis-aligned
//! [`RulingLine`]s used by the line geometry engine.

use crate::geometry::{BBox, Orientation};
use crate::settings::LineSettings;

/// A raw 2D segment between two endpoints, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Segment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Copy with endpoints in canonical order (smaller coordinate first on
    /// both axes).
    pub fn reordered(&self) -> Segment {
        Segment {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        let dx = self.x1 - self.x0;
        let dy = self.y1 - self.y0;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Where a ruling line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineSource {
    /// Classified directly from a drawn segment.
    Drawn,
    /// A drawn line lengthened to meet a crossing line.
    Extended,
    /// A closing border added around a stack of rules sharing one span.
    Synthesized,
}

/// An axis-aligned ruling line.
///
/// Vertical lines have `x0 == x1`, horizontal lines have `top == bottom`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RulingLine {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Line orientation, never [`Orientation::Diagonal`].
    pub orientation: Orientation,
    /// Where this line was derived from.
    pub source: LineSource,
}

impl RulingLine {
    /// A vertical line at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64, source: LineSource) -> Self {
        Self {
            x0: x,
            top: top.min(bottom),
            x1: x,
            bottom: top.max(bottom),
            orientation: Orientation::Vertical,
            source,
        }
    }

    /// A horizontal line at `y` spanning `x0..x1`.
    pub fn horizontal(y: f64, x0: f64, x1: f64, source: LineSource) -> Self {
        Self {
            x0: x0.min(x1),
            top: y,
            x1: x0.max(x1),
            bottom: y,
            orientation: Orientation::Horizontal,
            source,
        }
    }

    /// Coordinate on the constant axis (x for vertical, y for horizontal).
    pub fn position(&self) -> f64 {
        match self.orientation {
            Orientation::Vertical => self.x0,
            _ => self.top,
        }
    }

    /// Extent along the varying axis as `(start, end)`.
    pub fn span(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (self.top, self.bottom),
            _ => (self.x0, self.x1),
        }
    }

    /// Length along the varying axis.
    pub fn length(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }

    /// Bounding box of the line (zero width or zero height).
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }
}

/// Normalize every segment so its endpoints are in canonical order.
pub fn reorder_segments(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().map(Segment::reordered).collect()
}

/// Classify a segment by the delta on each axis.
///
/// Segments with both deltas within `axis_tolerance` are degenerate and
/// reported as [`Orientation::Diagonal`] so callers drop them.
pub fn classify_segment(segment: &Segment, axis_tolerance: f64) -> Orientation {
    let dx = (segment.x1 - segment.x0).abs();
    let dy = (segment.y1 - segment.y0).abs();
    match (dx <= axis_tolerance, dy <= axis_tolerance) {
        (true, false) => Orientation::Vertical,
        (false, true) => Orientation::Horizontal,
        _ => Orientation::Diagonal,
    }
}

/// Split segments into `(vertical, horizontal)` ruling lines.
///
/// Segments are reordered first. Diagonal, degenerate and too-short
/// segments are dropped. The constant axis of each kept line collapses to
/// the midpoint of its two endpoint coordinates.
pub fn split_by_orientation(
    segments: &[Segment],
    settings: &LineSettings,
) -> (Vec<RulingLine>, Vec<RulingLine>) {
    let mut verticals = Vec::new();
    let mut horizontals = Vec::new();

    for segment in reorder_segments(segments) {
        if segment.length() < settings.min_segment_length || segment.length() == 0.0 {
            continue;
        }
        match classify_segment(&segment, settings.axis_tolerance) {
            Orientation::Vertical => verticals.push(RulingLine::vertical(
                (segment.x0 + segment.x1) / 2.0,
                segment.y0,
                segment.y1,
                LineSource::Drawn,
            )),
            Orientation::Horizontal => horizontals.push(RulingLine::horizontal(
                (segment.y0 + segment.y1) / 2.0,
                segment.x0,
                segment.x1,
                LineSource::Drawn,
            )),
            Orientation::Diagonal => {}
        }
    }

    (verticals, horizontals)
}
