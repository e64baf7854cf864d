//! tablescout: Locate candidate table regions in parsed document pages and
//! describe each with a feature vector for a table/non-table classifier.
//!
//! This is the public API facade crate. It re-exports types from
//! tablescout-core and ties the pipeline together.
//!
//! # Architecture
//!
//! - **tablescout-core**: Backend-independent data types and algorithms
//!   (ruling-line geometry, layout grouping, feature functions, IoU labeling)
//! - **tablescout** (this crate): Document sources, the alignment detector,
//!   the feature assembler and the page orchestrator
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use tablescout::{GroundTruthTable, RawPage, Segment, extract_candidates};
//!
//! let page = RawPage::new(200.0, 200.0).with_segments(vec![
//!     Segment::new(10.0, 10.0, 90.0, 10.0),
//!     Segment::new(10.0, 90.0, 90.0, 90.0),
//!     Segment::new(10.0, 10.0, 10.0, 90.0),
//!     Segment::new(90.0, 10.0, 90.0, 90.0),
//! ]);
//! let result = extract_candidates(&vec![page]).unwrap();
//!
//! let mut ground_truth = HashMap::new();
//! ground_truth.insert(
//!     1,
//!     vec![GroundTruthTable::from_tuple((100.0, 100.0, 5.0, 5.0, 45.0, 45.0))],
//! );
//! assert_eq!(result.value.labels(&ground_truth), vec![1]);
//! ```

pub mod alignment;
pub mod assembler;
mod error;
pub mod extractor;
pub mod source;

pub use tablescout_core;
pub use tablescout_core::{
    ALIGNMENT_FEATURE_COUNT, AlignmentFeatures, BBox, Candidate, CandidateSet, CandidateSource,
    ConfigError, ExtractResult, ExtractWarning, ExtractWarningCode, FontStats, GroundTruth,
    GroundTruthTable, LINE_FEATURE_COUNT, Labeler, LayoutError, LayoutNode, LayoutSettings,
    LineFeatures, LineSettings, PageElements, PageRef, RulingFeatures, Segment,
    TextAlignmentFeatures, TextElement, compute_iou, label_candidates,
};

pub use alignment::{
    AlignmentDetector, LayoutFailure, LayoutOutcome, LayoutParser, ParsedLayout, TextBlockParser,
};
pub use assembler::FeatureAssembler;
pub use error::ExtractError;
pub use extractor::{
    CachedPage, CandidateExtractor, ExtractSettings, Extraction, PageBatch, PageCache,
    extract_candidates,
};
pub use source::{DocumentSource, Normalizer, RawPage, ScaleNormalizer};
