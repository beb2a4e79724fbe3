//! Pipeline failures and their user-facing categories.

use std::fmt;

use dash_ingest::IngestError;
use dash_insight::InsightError;
use dash_viz::VizError;
use serde::Serialize;
use thiserror::Error;

/// Category of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The file extension is not one of the supported formats.
    UnsupportedType,
    /// The bytes could not be decoded as text.
    DecodeFailure,
    /// The content is not valid for its format.
    StructuralParseFailure,
    /// Statistics or charts could not be computed.
    ComputationFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedType => "unsupported_type",
            Self::DecodeFailure => "decode_failure",
            Self::StructuralParseFailure => "structural_parse_failure",
            Self::ComputationFailure => "computation_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure between receiving an upload and rendering its charts.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{}", ingest_message(.0))]
    Ingest(#[from] IngestError),

    #[error("An error occurred while processing the file: {0}")]
    Insight(#[from] InsightError),

    #[error("An error occurred while processing the file: {0}")]
    Chart(#[from] VizError),
}

fn ingest_message(error: &IngestError) -> String {
    match error {
        IngestError::UnsupportedType { .. } => error.to_string(),
        other => format!("An error occurred while processing the file: {other}"),
    }
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ingest(IngestError::UnsupportedType { .. }) => ErrorKind::UnsupportedType,
            Self::Ingest(IngestError::Decode { .. }) => ErrorKind::DecodeFailure,
            Self::Ingest(_) => ErrorKind::StructuralParseFailure,
            Self::Insight(_) | Self::Chart(_) => ErrorKind::ComputationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_message_is_explicit() {
        let error = DashboardError::from(IngestError::UnsupportedType {
            extension: "txt".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::UnsupportedType);
        assert_eq!(
            error.to_string(),
            "Unsupported file type: txt (expected csv, xlsx, json, pdf)"
        );
    }

    #[test]
    fn other_failures_are_wrapped() {
        let error = DashboardError::from(IngestError::Decode {
            encoding: "windows-1252",
        });
        assert_eq!(error.kind(), ErrorKind::DecodeFailure);
        assert_eq!(
            error.to_string(),
            "An error occurred while processing the file: 'windows-1252' codec can't decode the upload"
        );

        let error = DashboardError::from(InsightError::NoColumns);
        assert_eq!(error.kind(), ErrorKind::ComputationFailure);
        assert!(
            error
                .to_string()
                .starts_with("An error occurred while processing the file: ")
        );
    }

    #[test]
    fn parse_failures_are_structural() {
        let error = DashboardError::from(IngestError::EmptyInput);
        assert_eq!(error.kind(), ErrorKind::StructuralParseFailure);
    }
}
