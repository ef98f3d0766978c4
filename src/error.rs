//! Error types for the taxa-diversity library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library.
///
/// Only file-level and dataset-level problems surface here. Malformed report
/// lines are counted and logged by the format adapters, and undefined metric
/// values are reported as not-applicable results instead of errors.
#[derive(Error, Debug)]
pub enum DiversityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported report format '{0}' (expected bracken, kreport, kreport2, krona, single or simple)")]
    UnsupportedFormat(String),

    #[error("Unsupported alpha diversity metric '{0}' (expected Sh, BP, Si, ISi, F or all)")]
    UnsupportedMetric(String),

    #[error("Unsupported taxonomic rank '{0}' (expected all, D, P, C, O, F, G or S)")]
    UnsupportedRank(String),

    #[error("Invalid column specification: {0}")]
    InvalidColumns(String),

    #[error("No valid abundance data found for taxonomy level {rank}")]
    NoData { rank: String },

    #[error("At least {required} samples are required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiversityError {
    /// Stable, machine-friendly category for this error.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::FileNotFound(_) => "input",
            Self::UnsupportedFormat(_) | Self::UnsupportedMetric(_) | Self::UnsupportedRank(_) => {
                "unsupported"
            }
            Self::InvalidColumns(_) | Self::InvalidParameter(_) => "invalid_argument",
            Self::NoData { .. } => "no_data",
            Self::InsufficientSamples { .. } => "insufficient_samples",
            Self::Yaml(_) | Self::Json(_) => "serialization",
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DiversityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_stable() {
        assert_eq!(DiversityError::FileNotFound("x.tsv".into()).category(), "input");
        assert_eq!(DiversityError::UnsupportedMetric("Q".into()).category(), "unsupported");
        assert_eq!(
            DiversityError::NoData { rank: "S".into() }.category(),
            "no_data"
        );
        assert_eq!(
            DiversityError::InsufficientSamples { required: 2, actual: 1 }.category(),
            "insufficient_samples"
        );
    }

    #[test]
    fn test_no_data_message_names_rank() {
        let err = DiversityError::NoData { rank: "G".into() };
        assert_eq!(err.to_string(), "No valid abundance data found for taxonomy level G");
    }
}
