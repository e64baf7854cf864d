//! Error and warning types for tablescout.
//!
//! Provides [`ConfigError`] for settings rejected at construction time,
//! [`LayoutError`] for recoverable layout parser failures,
//! [`ExtractWarning`] for non-fatal issues that allow best-effort continuation,
//! and [`ExtractResult`] for pairing a value with collected warnings.

use std::fmt;

use thiserror::Error;

/// Invalid configuration, detected before any page is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A geometric tolerance is negative, NaN or infinite.
    #[error("invalid tolerance {name}: {value} (must be finite and >= 0)")]
    InvalidTolerance {
        /// Name of the offending setting (e.g., "snap_tolerance").
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The IoU threshold lies outside `[0, 1]`.
    #[error("invalid IoU threshold {0} (must be within [0, 1])")]
    InvalidIouThreshold(f64),
    /// The normalization scale is not a positive finite number.
    #[error("invalid scale {0} (must be finite and > 0)")]
    InvalidScale(f64),
}

/// Reason a layout parser could not produce nodes for a page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The page has no text elements to group.
    #[error("page has no text elements")]
    NoText,
    /// The page dimensions are unusable.
    #[error("invalid page size {width}x{height}")]
    InvalidPageSize {
        /// Page width.
        width: f64,
        /// Page height.
        height: f64,
    },
    /// The layout structure is not supported by the parser.
    #[error("unsupported layout: {0}")]
    Unsupported(String),
    /// Any other parser failure.
    #[error("{0}")]
    Other(String),
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// The layout parser failed; alignment candidates were dropped for the page.
    LayoutParserFailed,
    /// The layout parser returned feature rows that do not match its nodes.
    LayoutFeatureMismatch,
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::LayoutParserFailed => "LAYOUT_PARSER_FAILED",
            ExtractWarningCode::LayoutFeatureMismatch => "LAYOUT_FEATURE_MISMATCH",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (1-indexed), if applicable.
    pub page: Option<usize>,
}

impl ExtractWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
        }
    }

    /// Attach page context, returning the modified warning.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when extraction can partially succeed with non-fatal issues.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidTolerance {
            name: "snap_tolerance",
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid tolerance snap_tolerance: -1 (must be finite and >= 0)"
        );
        assert_eq!(
            ConfigError::InvalidIouThreshold(1.5).to_string(),
            "invalid IoU threshold 1.5 (must be within [0, 1])"
        );
    }

    #[test]
    fn layout_error_display() {
        assert_eq!(LayoutError::NoText.to_string(), "page has no text elements");
        let err = LayoutError::InvalidPageSize {
            width: 0.0,
            height: 792.0,
        };
        assert_eq!(err.to_string(), "invalid page size 0x792");
    }

    #[test]
    fn layout_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(LayoutError::Other("boom".to_string()));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn warning_code_as_str() {
        assert_eq!(
            ExtractWarningCode::LayoutParserFailed.as_str(),
            "LAYOUT_PARSER_FAILED"
        );
        assert_eq!(
            ExtractWarningCode::LayoutFeatureMismatch.to_string(),
            "LAYOUT_FEATURE_MISMATCH"
        );
    }

    #[test]
    fn warning_display_with_page() {
        let w = ExtractWarning::with_code(
            ExtractWarningCode::LayoutParserFailed,
            "page has no text elements",
        )
        .on_page(3);
        assert_eq!(
            w.to_string(),
            "[LAYOUT_PARSER_FAILED] page has no text elements (page 3)"
        );
    }

    #[test]
    fn warning_without_page_display() {
        let w = ExtractWarning::with_code(ExtractWarningCode::LayoutFeatureMismatch, "2 rows");
        assert_eq!(w.page, None);
        assert_eq!(w.to_string(), "[LAYOUT_FEATURE_MISMATCH] 2 rows");
    }

    #[test]
    fn extract_result_is_clean() {
        let w = ExtractWarning::with_code(ExtractWarningCode::LayoutParserFailed, "boom");
        assert!(!ExtractResult::with_warnings(2, vec![w]).is_clean());
        assert!(ExtractResult::with_warnings((), Vec::new()).is_clean());
    }
}
