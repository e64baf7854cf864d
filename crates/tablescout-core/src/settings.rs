//! Tolerances and thresholds for candidate generation.
//!
//! Every geometric tolerance is expressed in page units (points at scale 1).

use crate::error::ConfigError;

/// Configuration for the ruling-line geometry engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LineSettings {
    /// Maximum delta on the constant axis for a segment to count as
    /// horizontal or vertical.
    pub axis_tolerance: f64,
    /// Segments shorter than this are discarded during classification.
    pub min_segment_length: f64,
    /// Parallel lines closer than this on their constant axis are aligned.
    pub snap_tolerance: f64,
    /// Largest gap a line end is extended across to meet a crossing line.
    pub extend_tolerance: f64,
    /// Largest gap between collinear segments that are still merged.
    pub join_tolerance: f64,
    /// Tolerance for corner matching and side coverage during
    /// rectangle reconstruction.
    pub intersection_tolerance: f64,
    /// Rectangles no larger than this on either axis are dropped.
    pub min_rect_size: f64,
    /// Add closing border lines around stacks of rules sharing one span.
    pub synthesize_borders: bool,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            axis_tolerance: 1.0,
            min_segment_length: 1.0,
            snap_tolerance: 3.0,
            extend_tolerance: 3.0,
            join_tolerance: 3.0,
            intersection_tolerance: 3.0,
            min_rect_size: 3.0,
            synthesize_borders: true,
        }
    }
}

impl LineSettings {
    /// Reject negative, NaN or infinite tolerances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("axis_tolerance", self.axis_tolerance)?;
        check_tolerance("min_segment_length", self.min_segment_length)?;
        check_tolerance("snap_tolerance", self.snap_tolerance)?;
        check_tolerance("extend_tolerance", self.extend_tolerance)?;
        check_tolerance("join_tolerance", self.join_tolerance)?;
        check_tolerance("intersection_tolerance", self.intersection_tolerance)?;
        check_tolerance("min_rect_size", self.min_rect_size)
    }
}

/// Configuration for text grouping and alignment scoring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LayoutSettings {
    /// Vertical tolerance for clustering text elements into the same line.
    pub y_tolerance: f64,
    /// Horizontal gap that splits a line into separate column segments.
    pub x_density: f64,
    /// Maximum vertical gap between lines grouped into the same block.
    pub y_density: f64,
    /// Minimum number of lines for a block to count as table-like.
    pub min_rows: usize,
    /// Minimum number of column segments on some line of a table-like block.
    pub min_columns: usize,
    /// Tolerance for two text edges to count as aligned.
    pub align_tolerance: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            y_tolerance: 3.0,
            x_density: 10.0,
            y_density: 10.0,
            min_rows: 2,
            min_columns: 2,
            align_tolerance: 2.0,
        }
    }
}

impl LayoutSettings {
    /// Reject negative, NaN or infinite tolerances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("y_tolerance", self.y_tolerance)?;
        check_tolerance("x_density", self.x_density)?;
        check_tolerance("y_density", self.y_density)?;
        check_tolerance("align_tolerance", self.align_tolerance)
    }
}

pub(crate) fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_settings_default_values() {
        let settings = LineSettings::default();
        assert_eq!(settings.axis_tolerance, 1.0);
        assert_eq!(settings.min_segment_length, 1.0);
        assert_eq!(settings.snap_tolerance, 3.0);
        assert_eq!(settings.extend_tolerance, 3.0);
        assert_eq!(settings.join_tolerance, 3.0);
        assert_eq!(settings.intersection_tolerance, 3.0);
        assert_eq!(settings.min_rect_size, 3.0);
        assert!(settings.synthesize_borders);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_line_settings_zero_tolerances_are_valid() {
        let settings = LineSettings {
            snap_tolerance: 0.0,
            join_tolerance: 0.0,
            extend_tolerance: 0.0,
            ..LineSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_line_settings_negative_tolerance_rejected() {
        let settings = LineSettings {
            join_tolerance: -0.5,
            ..LineSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidTolerance {
                name: "join_tolerance",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_line_settings_nan_rejected() {
        let settings = LineSettings {
            axis_tolerance: f64::NAN,
            ..LineSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidTolerance {
                name: "axis_tolerance",
                ..
            })
        ));
    }

    #[test]
    fn test_layout_settings_defaults_and_validation() {
        let settings = LayoutSettings::default();
        assert_eq!(settings.min_rows, 2);
        assert_eq!(settings.min_columns, 2);
        assert!(settings.validate().is_ok());

        let bad = LayoutSettings {
            x_density: f64::INFINITY,
            ..LayoutSettings::default()
        };
        assert!(bad.validate().is_err());
    }
}
