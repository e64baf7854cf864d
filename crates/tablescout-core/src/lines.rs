//! Ruling-line geometry engine.
//!
//! Turns the ruling segments of one page into table-like rectangles:
//! reorder → classify → snap → extend → merge → rectangle reconstruction.
//! Every step returns new lines; inputs are never mutated in place.

use std::collections::BTreeMap;

use crate::geometry::{BBox, Orientation};
use crate::segments::{LineSource, RulingLine, Segment, split_by_orientation};
use crate::settings::LineSettings;

/// Final vertical and horizontal line sets of a page, sorted along their
/// primary axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGrid {
    /// Vertical lines sorted by x, then top.
    pub verticals: Vec<RulingLine>,
    /// Horizontal lines sorted by y, then x0.
    pub horizontals: Vec<RulingLine>,
}

impl LineGrid {
    /// Run classification, snapping, extension and merging over raw segments.
    pub fn build(segments: &[Segment], settings: &LineSettings) -> Self {
        let (verticals, horizontals) = split_by_orientation(segments, settings);
        if verticals.is_empty() && horizontals.is_empty() {
            return Self::default();
        }

        let verticals = snap_lines(verticals, settings.snap_tolerance);
        let horizontals = snap_lines(horizontals, settings.snap_tolerance);

        let mut all_verticals =
            extend_vertical_lines(&verticals, &horizontals, settings.extend_tolerance);
        let mut all_horizontals =
            extend_horizontal_lines(&horizontals, &verticals, settings.extend_tolerance);

        if settings.synthesize_borders {
            let tolerance = settings.intersection_tolerance;
            all_verticals.extend(synthesize_vertical_borders(
                &horizontals,
                &verticals,
                tolerance,
            ));
            all_horizontals.extend(synthesize_horizontal_borders(
                &verticals,
                &horizontals,
                tolerance,
            ));
        }

        Self {
            verticals: merge_vertical_lines(all_verticals, settings.join_tolerance),
            horizontals: merge_horizontal_lines(all_horizontals, settings.join_tolerance),
        }
    }

    /// Rectangles whose four sides are all backed by lines of this grid.
    pub fn rectangles(&self, settings: &LineSettings) -> Vec<BBox> {
        find_rectangles(
            &self.verticals,
            &self.horizontals,
            settings.intersection_tolerance,
            settings.min_rect_size,
        )
    }
}

/// Detect table-like rectangles from the ruling segments of one page.
///
/// Returns an empty list when the page has no usable rulings.
pub fn detect_rectangles(segments: &[Segment], settings: &LineSettings) -> Vec<BBox> {
    LineGrid::build(segments, settings).rectangles(settings)
}

/// Align parallel lines whose constant-axis coordinate lies within
/// `tolerance` of a cluster's first member to the cluster mean.
pub fn snap_lines(mut lines: Vec<RulingLine>, tolerance: f64) -> Vec<RulingLine> {
    if lines.is_empty() {
        return lines;
    }

    lines.sort_by(|a, b| a.position().total_cmp(&b.position()));

    let mut cluster_start = 0;
    for i in 1..=lines.len() {
        let end_of_cluster = i == lines.len()
            || (lines[i].position() - lines[cluster_start].position()).abs() > tolerance;
        if end_of_cluster {
            let sum: f64 = lines[cluster_start..i].iter().map(RulingLine::position).sum();
            let mean = sum / (i - cluster_start) as f64;
            for line in &mut lines[cluster_start..i] {
                match line.orientation {
                    Orientation::Vertical => {
                        line.x0 = mean;
                        line.x1 = mean;
                    }
                    _ => {
                        line.top = mean;
                        line.bottom = mean;
                    }
                }
            }
            cluster_start = i;
        }
    }

    lines
}

/// Lengthen vertical lines whose ends stop just short of a crossing
/// horizontal line.
///
/// A vertical line end is moved onto a horizontal line when the gap between
/// them is at most `tolerance` and the vertical's x lies within the
/// horizontal's span (give or take `tolerance`). The gap is always measured
/// from the original end, so a line is never chained across several gaps.
/// Returns every vertical line, extended ones marked [`LineSource::Extended`].
pub fn extend_vertical_lines(
    verticals: &[RulingLine],
    horizontals: &[RulingLine],
    tolerance: f64,
) -> Vec<RulingLine> {
    verticals
        .iter()
        .map(|v| {
            let x = v.x0;
            let crossing = horizontals
                .iter()
                .filter(|h| x >= h.x0 - tolerance && x <= h.x1 + tolerance)
                .map(|h| h.top);
            extend_span(v, crossing, tolerance, |start, end| {
                RulingLine::vertical(x, start, end, LineSource::Extended)
            })
        })
        .collect()
}

/// Lengthen horizontal lines whose ends stop just short of a crossing
/// vertical line. Mirror image of [`extend_vertical_lines`].
pub fn extend_horizontal_lines(
    horizontals: &[RulingLine],
    verticals: &[RulingLine],
    tolerance: f64,
) -> Vec<RulingLine> {
    horizontals
        .iter()
        .map(|h| {
            let y = h.top;
            let crossing = verticals
                .iter()
                .filter(|v| y >= v.top - tolerance && y <= v.bottom + tolerance)
                .map(|v| v.x0);
            extend_span(h, crossing, tolerance, |start, end| {
                RulingLine::horizontal(y, start, end, LineSource::Extended)
            })
        })
        .collect()
}

fn extend_span<I, B>(line: &RulingLine, crossing: I, tolerance: f64, build: B) -> RulingLine
where
    I: Iterator<Item = f64>,
    B: Fn(f64, f64) -> RulingLine,
{
    let (start, end) = line.span();
    let mut new_start = start;
    let mut new_end = end;

    for pos in crossing {
        if pos < start && start - pos <= tolerance {
            new_start = new_start.min(pos);
        }
        if pos > end && pos - end <= tolerance {
            new_end = new_end.max(pos);
        }
    }

    if new_start < start || new_end > end {
        build(new_start, new_end)
    } else {
        line.clone()
    }
}

/// Close stacks of horizontal rules that share one x-span with vertical
/// borders at both ends.
///
/// Tables drawn with horizontal rules only get left and right borders
/// spanning from the topmost to the bottommost rule of the stack. A stack
/// already boxed by two of `verticals` crossing its top and bottom rules is
/// left alone.
pub fn synthesize_vertical_borders(
    horizontals: &[RulingLine],
    verticals: &[RulingLine],
    tolerance: f64,
) -> Vec<RulingLine> {
    let mut groups: BTreeMap<(i64, i64), Vec<&RulingLine>> = BTreeMap::new();
    for h in horizontals {
        groups
            .entry((float_key(h.x0), float_key(h.x1)))
            .or_default()
            .push(h);
    }

    let mut borders = Vec::new();
    for group in groups.values().filter(|g| g.len() > 1) {
        let first = group.iter().min_by(|a, b| a.top.total_cmp(&b.top));
        let last = group.iter().max_by(|a, b| a.top.total_cmp(&b.top));
        let (Some(first), Some(last)) = (first, last) else {
            continue;
        };
        let closing = verticals
            .iter()
            .filter(|v| crosses(v, first, tolerance) && crosses(v, last, tolerance))
            .count();
        if closing >= 2 {
            continue;
        }
        let (x0, x1) = (first.x0, first.x1);
        borders.push(RulingLine::vertical(x0, first.top, last.top, LineSource::Synthesized));
        borders.push(RulingLine::vertical(x1, first.top, last.top, LineSource::Synthesized));
    }
    borders
}

/// Close stacks of vertical rules that share one y-span with horizontal
/// borders at both ends. Mirror image of [`synthesize_vertical_borders`].
pub fn synthesize_horizontal_borders(
    verticals: &[RulingLine],
    horizontals: &[RulingLine],
    tolerance: f64,
) -> Vec<RulingLine> {
    let mut groups: BTreeMap<(i64, i64), Vec<&RulingLine>> = BTreeMap::new();
    for v in verticals {
        groups
            .entry((float_key(v.top), float_key(v.bottom)))
            .or_default()
            .push(v);
    }

    let mut borders = Vec::new();
    for group in groups.values().filter(|g| g.len() > 1) {
        let first = group.iter().min_by(|a, b| a.x0.total_cmp(&b.x0));
        let last = group.iter().max_by(|a, b| a.x0.total_cmp(&b.x0));
        let (Some(first), Some(last)) = (first, last) else {
            continue;
        };
        let closing = horizontals
            .iter()
            .filter(|h| crosses(first, h, tolerance) && crosses(last, h, tolerance))
            .count();
        if closing >= 2 {
            continue;
        }
        let (top, bottom) = (first.top, first.bottom);
        borders.push(RulingLine::horizontal(top, first.x0, last.x0, LineSource::Synthesized));
        borders.push(RulingLine::horizontal(bottom, first.x0, last.x0, LineSource::Synthesized));
    }
    borders
}

/// Fold collinear vertical lines (same x) whose y-ranges overlap or leave a
/// gap of at most `join_tolerance`. Output is sorted by x, then top.
pub fn merge_vertical_lines(lines: Vec<RulingLine>, join_tolerance: f64) -> Vec<RulingLine> {
    join_collinear(
        lines,
        |proto, start, end| RulingLine::vertical(proto.x0, start, end, proto.source),
        join_tolerance,
    )
}

/// Fold collinear horizontal lines (same y) whose x-ranges overlap or leave
/// a gap of at most `join_tolerance`. Output is sorted by y, then x0.
pub fn merge_horizontal_lines(lines: Vec<RulingLine>, join_tolerance: f64) -> Vec<RulingLine> {
    join_collinear(
        lines,
        |proto, start, end| RulingLine::horizontal(proto.top, start, end, proto.source),
        join_tolerance,
    )
}

/// Group lines by their constant-axis coordinate, then merge overlapping or
/// adjacent spans within each group.
fn join_collinear<B>(mut lines: Vec<RulingLine>, build: B, tolerance: f64) -> Vec<RulingLine>
where
    B: Fn(&RulingLine, f64, f64) -> RulingLine,
{
    if lines.is_empty() {
        return Vec::new();
    }

    lines.sort_by(|a, b| {
        a.position()
            .total_cmp(&b.position())
            .then_with(|| a.span().0.total_cmp(&b.span().0))
    });

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let group_key = lines[i].position();
        let mut j = i + 1;
        while j < lines.len() && (lines[j].position() - group_key).abs() < 1e-9 {
            j += 1;
        }

        let (mut cur_start, mut cur_end) = lines[i].span();
        let mut proto_idx = i;

        for k in (i + 1)..j {
            let (s, e) = lines[k].span();
            if s <= cur_end + tolerance {
                if e > cur_end {
                    cur_end = e;
                }
            } else {
                result.push(build(&lines[proto_idx], cur_start, cur_end));
                cur_start = s;
                cur_end = e;
                proto_idx = k;
            }
        }
        result.push(build(&lines[proto_idx], cur_start, cur_end));

        i = j;
    }

    result
}

/// Whether vertical `v` and horizontal `h` meet: each line's span reaches
/// the other's coordinate within `tolerance`.
fn crosses(v: &RulingLine, h: &RulingLine, tolerance: f64) -> bool {
    v.x0 >= h.x0 - tolerance
        && v.x0 <= h.x1 + tolerance
        && h.top >= v.top - tolerance
        && h.top <= v.bottom + tolerance
}

/// Reconstruct rectangles from sorted vertical and horizontal line sets.
///
/// Crossings are found first, with lines allowed to run past each other.
/// A crossing is a top-left corner when its horizontal is the topmost line
/// crossing its vertical and its vertical is the leftmost line crossing its
/// horizontal. Each corner proposes a rectangle reaching the rightmost
/// vertical crossing the horizontal and the bottommost horizontal crossing
/// the vertical. The proposal is kept only when a vertical line backs its
/// full right side and a horizontal line backs its full bottom side.
/// Rectangles no larger than `min_size` on either axis are dropped. Output is
/// deduplicated and sorted top-to-bottom, left-to-right.
pub fn find_rectangles(
    verticals: &[RulingLine],
    horizontals: &[RulingLine],
    tolerance: f64,
    min_size: f64,
) -> Vec<BBox> {
    let crossing: Vec<Vec<bool>> = verticals
        .iter()
        .map(|v| horizontals.iter().map(|h| crosses(v, h, tolerance)).collect())
        .collect();

    let mut rectangles: Vec<BBox> = Vec::new();

    for (vi, v) in verticals.iter().enumerate() {
        for (hi, h) in horizontals.iter().enumerate() {
            if !crossing[vi][hi] {
                continue;
            }

            let down: Vec<f64> = horizontals
                .iter()
                .zip(&crossing[vi])
                .filter(|(_, meets)| **meets)
                .map(|(other, _)| other.top)
                .collect();
            let across: Vec<f64> = verticals
                .iter()
                .zip(&crossing)
                .filter(|(_, row)| row[hi])
                .map(|(other, _)| other.x0)
                .collect();

            let is_topmost = down.iter().all(|&y| y >= h.top - tolerance);
            let is_leftmost = across.iter().all(|&x| x >= v.x0 - tolerance);
            if !is_topmost || !is_leftmost {
                continue;
            }

            let right = across.iter().copied().fold(v.x0, f64::max);
            let bottom = down.iter().copied().fold(h.top, f64::max);
            let rect = BBox::new(v.x0, h.top, right, bottom);
            if rect.width() <= min_size || rect.height() <= min_size {
                continue;
            }

            let right_backed = verticals.iter().any(|r| {
                (r.x0 - rect.x1).abs() <= tolerance
                    && r.top <= rect.top + tolerance
                    && r.bottom >= rect.bottom - tolerance
            });
            let bottom_backed = horizontals.iter().any(|b| {
                (b.top - rect.bottom).abs() <= tolerance
                    && b.x0 <= rect.x0 + tolerance
                    && b.x1 >= rect.x1 - tolerance
            });

            if right_backed && bottom_backed && !rectangles.iter().any(|r| same_box(r, &rect)) {
                rectangles.push(rect);
            }
        }
    }

    rectangles.sort_by(|a, b| {
        a.top
            .total_cmp(&b.top)
            .then_with(|| a.x0.total_cmp(&b.x0))
            .then_with(|| a.bottom.total_cmp(&b.bottom))
            .then_with(|| a.x1.total_cmp(&b.x1))
    });
    rectangles
}

fn same_box(a: &BBox, b: &BBox) -> bool {
    (a.x0 - b.x0).abs() < 1e-9
        && (a.top - b.top).abs() < 1e-9
        && (a.x1 - b.x1).abs() < 1e-9
        && (a.bottom - b.bottom).abs() < 1e-9
}

/// Convert a float to an integer key for grouping (multiply by 1000 to preserve 3 decimal places).
fn float_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}
