//! Error types for upload ingestion.

use thiserror::Error;

/// Errors that can occur while turning an upload into a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Dispatch Errors ===
    /// The file extension is not one of the supported formats.
    #[error("Unsupported file type: {extension} (expected csv, xlsx, json, pdf)")]
    UnsupportedType { extension: String },

    // === Stream Errors ===
    /// Failed to read or rewind the upload stream.
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not valid in the encoding used to decode them.
    #[error("'{encoding}' codec can't decode the upload")]
    Decode { encoding: &'static str },

    // === Format Errors ===
    /// Delimited text is malformed (ragged rows, bad quoting).
    #[error("failed to parse CSV: {message}")]
    CsvParse { message: String },

    /// The upload contains no data to parse.
    #[error("no columns to parse from file")]
    EmptyInput,

    /// Spreadsheet could not be opened or has no usable sheet.
    #[error("failed to read workbook: {message}")]
    Workbook { message: String },

    /// JSON text is not well formed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON is well formed but cannot be turned into rows.
    #[error("unsupported JSON layout: {message}")]
    JsonShape { message: String },

    /// PDF document could not be loaded.
    #[error("failed to read PDF: {message}")]
    Pdf { message: String },

    // === Table Errors ===
    /// Parsed columns could not form a valid table.
    #[error(transparent)]
    Table(#[from] dash_model::ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// True when the failure is a character decoding problem.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
