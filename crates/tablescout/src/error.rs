//! Error type for the extraction pipeline.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Recoverable problems
//! (a failing layout parser) are reported as [`ExtractWarning`]s instead.
//!
//! [`ExtractWarning`]: tablescout_core::ExtractWarning

use tablescout_core::ConfigError;
use thiserror::Error;

/// Fatal error raised while extracting candidates from a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// Settings failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The document source could not produce a page.
    #[error("page {page}: source error: {message}")]
    Source { page: usize, message: String },

    /// Feature rows and candidate boxes disagree in count.
    #[error("page {page}: expected {expected} feature rows, got {actual}")]
    FeatureRowMismatch {
        page: usize,
        expected: usize,
        actual: usize,
    },

    /// A feature row has the wrong number of columns.
    #[error("page {page}: expected feature rows of width {expected}, got {actual}")]
    FeatureWidthMismatch {
        page: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_from_config() {
        let err: ExtractError = ConfigError::InvalidScale(0.0).into();
        assert!(matches!(err, ExtractError::Config(_)));
        assert!(err.to_string().starts_with("invalid configuration: "));
    }

    #[test]
    fn extract_error_source_display() {
        let err = ExtractError::Source {
            page: 3,
            message: "truncated content stream".to_string(),
        };
        assert_eq!(err.to_string(), "page 3: source error: truncated content stream");
    }

    #[test]
    fn extract_error_row_mismatch_display() {
        let err = ExtractError::FeatureRowMismatch {
            page: 2,
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "page 2: expected 4 feature rows, got 3");
    }

    #[test]
    fn extract_error_width_mismatch_display() {
        let err = ExtractError::FeatureWidthMismatch {
            page: 1,
            expected: 7,
            actual: 6,
        };
        assert_eq!(
            err.to_string(),
            "page 1: expected feature rows of width 7, got 6"
        );
    }
}
