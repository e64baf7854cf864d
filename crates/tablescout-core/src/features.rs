//! Per-candidate feature functions.
//!
//! Two feature groups describe a candidate region: how well its interior
//! text lines up in rows and columns ([`AlignmentFeatures`]) and how much of
//! its boundary is backed by drawn rulings ([`LineFeatures`]). Both are pure
//! functions returning exactly one row per input box, every row of the same
//! width.

use crate::geometry::BBox;
use crate::segments::{RulingLine, split_by_orientation};
use crate::settings::LineSettings;
use crate::text::{FontStats, PageElements};

/// Number of columns produced by [`TextAlignmentFeatures`].
pub const ALIGNMENT_FEATURE_COUNT: usize = 8;

/// Number of columns produced by [`RulingFeatures`].
pub const LINE_FEATURE_COUNT: usize = 7;

/// Scores the text alignment inside candidate regions.
pub trait AlignmentFeatures {
    /// Number of columns in every row.
    fn width(&self) -> usize;

    /// One row per box.
    fn compute(
        &self,
        boxes: &[BBox],
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Vec<Vec<f64>>;
}

/// Scores ruling-line support of candidate region boundaries.
pub trait LineFeatures {
    /// Number of columns in every row.
    fn width(&self) -> usize;

    /// One row per box.
    fn compute(&self, boxes: &[BBox], elements: &PageElements) -> Vec<Vec<f64>>;
}

/// Built-in alignment features.
///
/// Columns:
/// 0. text elements inside the box
/// 1. distinct left-edge columns
/// 2. distinct right-edge columns
/// 3. distinct rows
/// 4. fraction of elements whose left edge is shared with another element
/// 5. text coverage (text area / box area)
/// 6. mean font size relative to the page's dominant font size
/// 7. box area relative to page area
#[derive(Debug, Clone, PartialEq)]
pub struct TextAlignmentFeatures {
    /// Two edges closer than this count as aligned.
    pub align_tolerance: f64,
}

impl Default for TextAlignmentFeatures {
    fn default() -> Self {
        Self {
            align_tolerance: 2.0,
        }
    }
}

impl TextAlignmentFeatures {
    pub fn new(align_tolerance: f64) -> Self {
        Self { align_tolerance }
    }

    fn row(&self, bbox: &BBox, elements: &PageElements, font_stats: &FontStats) -> Vec<f64> {
        let inside: Vec<&BBox> = elements.texts_within(bbox).map(|t| &t.bbox).collect();
        let sizes: Vec<f64> = elements.texts_within(bbox).map(|t| t.font_size).collect();
        let n = inside.len();

        let lefts: Vec<f64> = inside.iter().map(|b| b.x0).collect();
        let rights: Vec<f64> = inside.iter().map(|b| b.x1).collect();
        let mids: Vec<f64> = inside.iter().map(|b| b.center().1).collect();
        let tol = self.align_tolerance;

        let aligned = if n > 1 {
            let shared = lefts
                .iter()
                .enumerate()
                .filter(|(i, x)| {
                    lefts
                        .iter()
                        .enumerate()
                        .any(|(j, other)| *i != j && (*x - other).abs() <= tol)
                })
                .count();
            shared as f64 / n as f64
        } else {
            0.0
        };

        let box_area = bbox.area();
        let coverage = if box_area > 0.0 {
            let text_area: f64 = inside
                .iter()
                .filter_map(|b| b.intersection(bbox))
                .map(|b| b.area())
                .sum();
            (text_area / box_area).min(1.0)
        } else {
            0.0
        };

        let font_ratio = if n > 0 && font_stats.dominant_size > 0.0 {
            let mean = sizes.iter().sum::<f64>() / n as f64;
            mean / font_stats.dominant_size
        } else {
            0.0
        };

        let page_area = elements.width * elements.height;
        let area_ratio = if page_area > 0.0 {
            box_area / page_area
        } else {
            0.0
        };

        vec![
            n as f64,
            count_clusters(lefts, tol) as f64,
            count_clusters(rights, tol) as f64,
            count_clusters(mids, tol) as f64,
            aligned,
            coverage,
            font_ratio,
            area_ratio,
        ]
    }
}

impl AlignmentFeatures for TextAlignmentFeatures {
    fn width(&self) -> usize {
        ALIGNMENT_FEATURE_COUNT
    }

    fn compute(
        &self,
        boxes: &[BBox],
        elements: &PageElements,
        font_stats: &FontStats,
    ) -> Vec<Vec<f64>> {
        boxes
            .iter()
            .map(|bbox| self.row(bbox, elements, font_stats))
            .collect()
    }
}

/// Built-in ruling support features.
///
/// Columns:
/// 0. fraction of the top side backed by a horizontal ruling
/// 1. fraction of the bottom side backed by a horizontal ruling
/// 2. fraction of the left side backed by a vertical ruling
/// 3. fraction of the right side backed by a vertical ruling
/// 4. interior vertical rulings
/// 5. interior horizontal rulings
/// 6. interior ruling crossings per 10 000 square units of box area
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RulingFeatures {
    /// Classification and proximity tolerances. `intersection_tolerance`
    /// decides whether a ruling lies on a box side.
    pub lines: LineSettings,
}

impl RulingFeatures {
    pub fn new(lines: LineSettings) -> Self {
        Self { lines }
    }

    fn row(&self, bbox: &BBox, verticals: &[RulingLine], horizontals: &[RulingLine]) -> Vec<f64> {
        let tol = self.lines.intersection_tolerance;

        let side = |lines: &[RulingLine], pos: f64, lo: f64, hi: f64| {
            let spans: Vec<(f64, f64)> = lines
                .iter()
                .filter(|l| (l.position() - pos).abs() <= tol)
                .map(RulingLine::span)
                .collect();
            covered_fraction(&spans, lo, hi)
        };

        let top = side(horizontals, bbox.top, bbox.x0, bbox.x1);
        let bottom = side(horizontals, bbox.bottom, bbox.x0, bbox.x1);
        let left = side(verticals, bbox.x0, bbox.top, bbox.bottom);
        let right = side(verticals, bbox.x1, bbox.top, bbox.bottom);

        let inner_v: Vec<&RulingLine> = verticals
            .iter()
            .filter(|v| {
                v.x0 > bbox.x0 + tol
                    && v.x0 < bbox.x1 - tol
                    && v.top < bbox.bottom
                    && v.bottom > bbox.top
            })
            .collect();
        let inner_h: Vec<&RulingLine> = horizontals
            .iter()
            .filter(|h| {
                h.top > bbox.top + tol
                    && h.top < bbox.bottom - tol
                    && h.x0 < bbox.x1
                    && h.x1 > bbox.x0
            })
            .collect();

        let crossings = inner_v
            .iter()
            .map(|v| {
                inner_h
                    .iter()
                    .filter(|h| {
                        v.x0 >= h.x0 - tol
                            && v.x0 <= h.x1 + tol
                            && h.top >= v.top - tol
                            && h.top <= v.bottom + tol
                    })
                    .count()
            })
            .sum::<usize>();
        let area = bbox.area();
        let crossing_density = if area > 0.0 {
            crossings as f64 * 10_000.0 / area
        } else {
            0.0
        };

        vec![
            top,
            bottom,
            left,
            right,
            inner_v.len() as f64,
            inner_h.len() as f64,
            crossing_density,
        ]
    }
}

impl LineFeatures for RulingFeatures {
    fn width(&self) -> usize {
        LINE_FEATURE_COUNT
    }

    fn compute(&self, boxes: &[BBox], elements: &PageElements) -> Vec<Vec<f64>> {
        if boxes.is_empty() {
            return Vec::new();
        }
        let (verticals, horizontals) = split_by_orientation(&elements.segments, &self.lines);
        boxes
            .iter()
            .map(|bbox| self.row(bbox, &verticals, &horizontals))
            .collect()
    }
}

/// Count clusters of values where each cluster spans at most `tolerance`
/// from its first (smallest) member.
fn count_clusters(mut values: Vec<f64>, tolerance: f64) -> usize {
    if values.is_empty() {
        return 0;
    }
    values.sort_by(f64::total_cmp);
    let mut clusters = 1;
    let mut start = values[0];
    for &v in &values[1..] {
        if v - start > tolerance {
            clusters += 1;
            start = v;
        }
    }
    clusters
}

/// Fraction of `lo..hi` covered by the union of `spans`.
fn covered_fraction(spans: &[(f64, f64)], lo: f64, hi: f64) -> f64 {
    let length = hi - lo;
    if length <= 0.0 {
        return 0.0;
    }

    let mut clipped: Vec<(f64, f64)> = spans
        .iter()
        .map(|&(s, e)| (s.max(lo), e.min(hi)))
        .filter(|(s, e)| e > s)
        .collect();
    clipped.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut covered = 0.0;
    let mut current: Option<(f64, f64)> = None;
    for (s, e) in clipped {
        current = match current {
            Some((cs, ce)) if s <= ce => Some((cs, ce.max(e))),
            Some((cs, ce)) => {
                covered += ce - cs;
                Some((s, e))
            }
            None => Some((s, e)),
        };
    }
    if let Some((cs, ce)) = current {
        covered += ce - cs;
    }

    (covered / length).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::Segment;
    use crate::text::TextElement;

    fn assert_approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    fn grid_page() -> PageElements {
        // 2x2 ruled grid from (0,0) to (100,100); the top rule only covers half.
        PageElements::new(200.0, 200.0).with_segments(vec![
            Segment::new(0.0, 0.0, 50.0, 0.0),
            Segment::new(0.0, 50.0, 100.0, 50.0),
            Segment::new(0.0, 100.0, 100.0, 100.0),
            Segment::new(0.0, 0.0, 0.0, 100.0),
            Segment::new(50.0, 0.0, 50.0, 100.0),
            Segment::new(100.0, 0.0, 100.0, 100.0),
        ])
    }

    fn text_page() -> PageElements {
        let mut texts = Vec::new();
        for r in 0..3 {
            let y = 10.0 + r as f64 * 20.0;
            texts.push(TextElement::new("a", BBox::new(10.0, y, 30.0, y + 10.0), 10.0));
            texts.push(TextElement::new("b", BBox::new(60.0, y, 90.0, y + 10.0), 10.0));
        }
        PageElements::new(100.0, 100.0).with_texts(texts)
    }

    #[test]
    fn test_covered_fraction() {
        assert_approx(covered_fraction(&[(0.0, 50.0)], 0.0, 100.0), 0.5);
        assert_approx(covered_fraction(&[(0.0, 60.0), (40.0, 100.0)], 0.0, 100.0), 1.0);
        assert_approx(covered_fraction(&[(-50.0, 10.0), (90.0, 500.0)], 0.0, 100.0), 0.2);
        assert_approx(covered_fraction(&[], 0.0, 100.0), 0.0);
        assert_approx(covered_fraction(&[(0.0, 10.0)], 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_count_clusters() {
        assert_eq!(count_clusters(vec![], 2.0), 0);
        assert_eq!(count_clusters(vec![10.0, 11.0, 50.0, 51.5, 100.0], 2.0), 3);
    }

    #[test]
    fn test_ruling_features_grid() {
        let features = RulingFeatures::default();
        let rows = features.compute(&[BBox::new(0.0, 0.0, 100.0, 100.0)], &grid_page());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), LINE_FEATURE_COUNT);
        assert_approx(row[0], 0.5); // top
        assert_approx(row[1], 1.0); // bottom
        assert_approx(row[2], 1.0); // left
        assert_approx(row[3], 1.0); // right
        assert_approx(row[4], 1.0); // interior vertical at x=50
        assert_approx(row[5], 1.0); // interior horizontal at y=50
        assert_approx(row[6], 1.0); // one crossing per 10 000
    }

    #[test]
    fn test_ruling_features_unsupported_region() {
        let rows = RulingFeatures::default()
            .compute(&[BBox::new(150.0, 150.0, 190.0, 190.0)], &grid_page());
        assert!(rows[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_ruling_features_empty_boxes() {
        assert!(RulingFeatures::default().compute(&[], &grid_page()).is_empty());
    }

    #[test]
    fn test_alignment_features_table_region() {
        let page = text_page();
        let stats = FontStats::from_texts(&page.texts);
        let features = TextAlignmentFeatures::default();
        let rows = features.compute(&[BBox::new(0.0, 0.0, 100.0, 100.0)], &page, &stats);
        let row = &rows[0];
        assert_eq!(row.len(), ALIGNMENT_FEATURE_COUNT);
        assert_approx(row[0], 6.0);
        assert_approx(row[1], 2.0);
        assert_approx(row[2], 2.0);
        assert_approx(row[3], 3.0);
        assert_approx(row[4], 1.0);
        // 3 * (200 + 300) / 10 000
        assert_approx(row[5], 0.15);
        assert_approx(row[6], 1.0);
        assert_approx(row[7], 1.0);
    }

    #[test]
    fn test_alignment_features_empty_region() {
        let page = text_page();
        let stats = FontStats::from_texts(&page.texts);
        let rows = TextAlignmentFeatures::default().compute(
            &[BBox::new(95.0, 95.0, 100.0, 100.0)],
            &page,
            &stats,
        );
        let row = &rows[0];
        assert_eq!(&row[..7], &[0.0; 7]);
        assert_approx(row[7], 25.0 / 10_000.0);
    }

    #[test]
    fn test_alignment_features_one_row_per_box() {
        let page = text_page();
        let stats = FontStats::from_texts(&page.texts);
        let features = TextAlignmentFeatures::default();
        assert_eq!(features.width(), ALIGNMENT_FEATURE_COUNT);
        let boxes = vec![BBox::new(0.0, 0.0, 50.0, 50.0); 4];
        let rows = features.compute(&boxes, &page, &stats);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == ALIGNMENT_FEATURE_COUNT));
    }
}
