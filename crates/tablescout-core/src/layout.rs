//! Text layout grouping: elements → lines → blocks → table-like nodes.

use crate::geometry::BBox;
use crate::settings::LayoutSettings;
use crate::text::TextElement;

/// A text line: a sequence of elements on the same y-level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Elements in this line, sorted left-to-right.
    pub elements: Vec<TextElement>,
    /// Bounding box of this line.
    pub bbox: BBox,
}

impl TextLine {
    /// Number of column segments in this line: runs of elements separated
    /// by horizontal gaps wider than `x_density`.
    pub fn column_segments(&self, x_density: f64) -> usize {
        if self.elements.is_empty() {
            return 0;
        }
        let mut segments = 1;
        let mut right = self.elements[0].bbox.x1;
        for element in self.elements.iter().skip(1) {
            if element.bbox.x0 - right > x_density {
                segments += 1;
            }
            right = right.max(element.bbox.x1);
        }
        segments
    }
}

/// A text block: a group of lines stacked closely on top of each other.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBlock {
    /// Lines in this block, sorted top-to-bottom.
    pub lines: Vec<TextLine>,
    /// Bounding box of this block.
    pub bbox: BBox,
}

/// A table-like block found by [`find_table_nodes`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutNode {
    /// Region covered by the node.
    pub bbox: BBox,
    /// Lines that split into at least `min_columns` column segments.
    pub rows: usize,
    /// Largest number of column segments on any line.
    pub columns: usize,
}

impl LayoutNode {
    pub fn y0(&self) -> f64 {
        self.bbox.top
    }

    pub fn x0(&self) -> f64 {
        self.bbox.x0
    }

    pub fn y1(&self) -> f64 {
        self.bbox.bottom
    }

    pub fn x1(&self) -> f64 {
        self.bbox.x1
    }
}

/// Cluster text elements into lines based on y-proximity.
///
/// Elements whose vertical midpoints are within `y_tolerance` of a line's
/// vertical midpoint are grouped into the same line. Elements within each
/// line are sorted left-to-right.
pub fn cluster_elements_into_lines(elements: &[TextElement], y_tolerance: f64) -> Vec<TextLine> {
    if elements.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextElement> = elements.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<TextLine> = Vec::new();

    for element in sorted {
        let mid_y = (element.bbox.top + element.bbox.bottom) / 2.0;

        let existing = lines.iter_mut().find(|line| {
            let line_mid_y = (line.bbox.top + line.bbox.bottom) / 2.0;
            (mid_y - line_mid_y).abs() <= y_tolerance
        });

        match existing {
            Some(line) => {
                line.bbox = line.bbox.union(&element.bbox);
                line.elements.push(element.clone());
            }
            None => lines.push(TextLine {
                elements: vec![element.clone()],
                bbox: element.bbox,
            }),
        }
    }

    for line in &mut lines {
        line.elements
            .sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }

    lines.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));

    lines
}

/// Cluster text lines into blocks based on x-overlap and vertical proximity.
///
/// Lines that vertically follow each other (gap <= `y_density`) and have
/// overlapping x-ranges are grouped into the same block.
pub fn cluster_lines_into_blocks(lines: Vec<TextLine>, y_density: f64) -> Vec<TextBlock> {
    let mut blocks: Vec<TextBlock> = Vec::new();

    for line in lines {
        // Closest block above with x-overlap
        let mut best_block: Option<usize> = None;
        let mut best_gap = f64::INFINITY;

        for (i, block) in blocks.iter().enumerate() {
            let gap = line.bbox.top - block.bbox.bottom;
            if gap <= y_density && has_x_overlap(&line.bbox, &block.bbox) && gap < best_gap {
                best_gap = gap;
                best_block = Some(i);
            }
        }

        if let Some(idx) = best_block {
            blocks[idx].bbox = blocks[idx].bbox.union(&line.bbox);
            blocks[idx].lines.push(line);
        } else {
            blocks.push(TextBlock {
                bbox: line.bbox,
                lines: vec![line],
            });
        }
    }

    for block in &mut blocks {
        block
            .lines
            .sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
    }

    blocks
}

/// Check if two bounding boxes overlap horizontally.
fn has_x_overlap(a: &BBox, b: &BBox) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1
}

/// Group text into blocks and keep the ones that look like tables.
///
/// A block is table-like when at least `min_rows` of its lines split into
/// `min_columns` or more column segments. Nodes are returned in reading
/// order (top-to-bottom, then left-to-right).
pub fn find_table_nodes(elements: &[TextElement], settings: &LayoutSettings) -> Vec<LayoutNode> {
    let lines = cluster_elements_into_lines(elements, settings.y_tolerance);
    let blocks = cluster_lines_into_blocks(lines, settings.y_density);

    let mut nodes: Vec<LayoutNode> = blocks
        .iter()
        .filter_map(|block| {
            let counts: Vec<usize> = block
                .lines
                .iter()
                .map(|line| line.column_segments(settings.x_density))
                .collect();
            let rows = counts
                .iter()
                .filter(|&&c| c >= settings.min_columns)
                .count();
            let columns = counts.iter().copied().max().unwrap_or(0);
            (rows >= settings.min_rows && rows > 0).then_some(LayoutNode {
                bbox: block.bbox,
                rows,
                columns,
            })
        })
        .collect();

    nodes.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> TextElement {
        TextElement::new(text, BBox::new(x0, top, x1, bottom), bottom - top)
    }

    /// Three-column grid of cells, `rows` rows starting at `top`.
    fn table(rows: usize, top: f64) -> Vec<TextElement> {
        let mut elements = Vec::new();
        for r in 0..rows {
            let y = top + r as f64 * 14.0;
            elements.push(el("a", 50.0, y, 90.0, y + 10.0));
            elements.push(el("b", 150.0, y, 190.0, y + 10.0));
            elements.push(el("c", 250.0, y, 290.0, y + 10.0));
        }
        elements
    }

    #[test]
    fn test_cluster_elements_into_lines() {
        let elements = vec![
            el("world", 60.0, 101.0, 90.0, 111.0),
            el("hello", 10.0, 100.0, 50.0, 110.0),
            el("next", 10.0, 130.0, 40.0, 140.0),
        ];
        let lines = cluster_elements_into_lines(&elements, 3.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].elements[0].text, "hello");
        assert_eq!(lines[0].elements[1].text, "world");
        assert_eq!(lines[0].bbox, BBox::new(10.0, 100.0, 90.0, 111.0));
        assert_eq!(lines[1].elements[0].text, "next");
    }

    #[test]
    fn test_cluster_elements_empty() {
        assert!(cluster_elements_into_lines(&[], 3.0).is_empty());
    }

    #[test]
    fn test_column_segments() {
        let lines = cluster_elements_into_lines(&table(1, 0.0), 3.0);
        assert_eq!(lines[0].column_segments(10.0), 3);
        assert_eq!(lines[0].column_segments(100.0), 1);
    }

    #[test]
    fn test_cluster_lines_into_blocks_splits_on_gap() {
        let mut elements = table(2, 0.0);
        elements.extend(table(2, 200.0));
        let lines = cluster_elements_into_lines(&elements, 3.0);
        let blocks = cluster_lines_into_blocks(lines, 10.0);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[1].bbox.top, 200.0);
    }

    #[test]
    fn test_find_table_nodes_detects_grid() {
        let nodes = find_table_nodes(&table(4, 100.0), &LayoutSettings::default());
        assert_eq!(nodes.len(), 1);
        let node = nodes[0];
        assert_eq!(node.rows, 4);
        assert_eq!(node.columns, 3);
        assert_eq!((node.y0(), node.x0(), node.y1(), node.x1()), (100.0, 50.0, 152.0, 290.0));
    }

    #[test]
    fn test_find_table_nodes_ignores_paragraph() {
        let paragraph = vec![
            el("Lorem ipsum dolor", 50.0, 100.0, 300.0, 110.0),
            el("sit amet consectetur", 50.0, 114.0, 310.0, 124.0),
            el("adipiscing elit", 50.0, 128.0, 200.0, 138.0),
        ];
        assert!(find_table_nodes(&paragraph, &LayoutSettings::default()).is_empty());
    }

    #[test]
    fn test_find_table_nodes_min_rows() {
        let settings = LayoutSettings {
            min_rows: 5,
            ..LayoutSettings::default()
        };
        assert!(find_table_nodes(&table(4, 0.0), &settings).is_empty());
    }
}
