//! tablescout-core: Backend-independent types and algorithms for table
//! candidate generation.
//!
//! This crate provides the geometry ([`BBox`], [`Segment`], [`RulingLine`]),
//! the page model ([`PageElements`], [`TextElement`]) and the pure algorithms
//! (ruling-line rectangle detection, text layout grouping, candidate feature
//! functions, IoU labeling) used by `tablescout`. Nothing here performs I/O.

pub mod candidate;
pub mod error;
pub mod features;
pub mod geometry;
pub mod labels;
pub mod layout;
pub mod lines;
pub mod segments;
pub mod settings;
pub mod text;

pub use candidate::{Candidate, CandidateSet, CandidateSource, PageRef};
pub use error::{
    ConfigError, ExtractResult, ExtractWarning, ExtractWarningCode, LayoutError,
};
pub use features::{
    ALIGNMENT_FEATURE_COUNT, AlignmentFeatures, LINE_FEATURE_COUNT, LineFeatures,
    RulingFeatures, TextAlignmentFeatures,
};
pub use geometry::{BBox, Orientation, compute_iou};
pub use labels::{
    DEFAULT_IOU_THRESHOLD, GroundTruth, GroundTruthTable, Labeler, label_candidates,
};
pub use layout::{
    LayoutNode, TextBlock, TextLine, cluster_elements_into_lines, cluster_lines_into_blocks,
    find_table_nodes,
};
pub use lines::{LineGrid, detect_rectangles, find_rectangles};
pub use segments::{
    LineSource, RulingLine, Segment, classify_segment, reorder_segments, split_by_orientation,
};
pub use settings::{LayoutSettings, LineSettings};
pub use text::{FontStats, PageElements, TextElement};
