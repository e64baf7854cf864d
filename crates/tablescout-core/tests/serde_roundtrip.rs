//! Serde serialization/deserialization round-trip tests.
//!
//! These tests verify that the public data types can be serialized to JSON
//! and deserialized back, producing equal values.

#![cfg(feature = "serde")]

use tablescout_core::*;

/// Helper: serialize to JSON string, deserialize back, assert equality.
fn roundtrip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_string(value).expect("serialize failed");
    let restored: T = serde_json::from_str(&json).expect("deserialize failed");
    assert_eq!(*value, restored, "round-trip mismatch for JSON: {json}");
}

// --- Geometry types ---

#[test]
fn test_serde_orientation() {
    roundtrip(&Orientation::Horizontal);
    roundtrip(&Orientation::Vertical);
    roundtrip(&Orientation::Diagonal);
}

#[test]
fn test_serde_bbox() {
    roundtrip(&BBox::new(10.0, 20.0, 300.0, 400.0));
}

#[test]
fn test_serde_ruling_line() {
    roundtrip(&Segment::new(0.0, 10.0, 200.0, 10.0));
    roundtrip(&RulingLine::vertical(50.0, 0.0, 100.0, LineSource::Synthesized));
    roundtrip(&RulingLine::horizontal(20.0, 0.0, 100.0, LineSource::Drawn));
}

// --- Page model ---

#[test]
fn test_serde_page_elements() {
    let page = PageElements::new(612.0, 792.0)
        .with_segments(vec![Segment::new(0.0, 0.0, 100.0, 0.0)])
        .with_texts(vec![TextElement::new(
            "Total",
            BBox::new(10.0, 10.0, 40.0, 20.0),
            10.0,
        )]);
    roundtrip(&page);
    roundtrip(&FontStats::from_texts(&page.texts));
}

#[test]
fn test_serde_layout_node() {
    roundtrip(&LayoutNode {
        bbox: BBox::new(50.0, 100.0, 290.0, 152.0),
        rows: 4,
        columns: 3,
    });
}

// --- Settings ---

#[test]
fn test_serde_settings() {
    roundtrip(&LineSettings::default());
    roundtrip(&LayoutSettings::default());
    roundtrip(&Labeler::default());
}

#[test]
fn test_serde_labeler_validates_threshold() {
    let labeler: Labeler = serde_json::from_str("0.5").unwrap();
    assert_eq!(labeler.iou_threshold(), 0.5);
    assert!(serde_json::from_str::<Labeler>("1.5").is_err());
}

#[test]
fn test_serde_settings_from_partial_json() {
    let json = r#"{"snap_tolerance": 5.0, "synthesize_borders": false}"#;
    let settings: LineSettings = serde_json::from_str(json).unwrap();
    assert_eq!(settings.snap_tolerance, 5.0);
    assert!(!settings.synthesize_borders);
    assert_eq!(settings.join_tolerance, LineSettings::default().join_tolerance);
}

// --- Candidates and labels ---

#[test]
fn test_serde_candidate_set() {
    let set = CandidateSet::new().with_page(vec![Candidate {
        page: PageRef::new(1, 612.0, 792.0),
        bbox: BBox::new(50.0, 100.0, 290.0, 152.0),
        source: CandidateSource::Alignment,
        features: vec![1.0, 0.5, 0.25],
    }]);
    roundtrip(&set);
}

#[test]
fn test_serde_ground_truth() {
    roundtrip(&GroundTruthTable::from_tuple((100.0, 100.0, 5.0, 5.0, 45.0, 45.0)));
}

#[test]
fn test_serde_warning() {
    roundtrip(
        &ExtractWarning::with_code(ExtractWarningCode::LayoutParserFailed, "no text").on_page(3),
    );
    roundtrip(&ExtractWarningCode::LayoutFeatureMismatch);
}
