use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Columns could not be assembled into a frame (length mismatch, duplicate names).
    #[error("invalid table: {message}")]
    Frame { message: String },

    #[error("unknown chart '{0}'")]
    UnknownChart(String),

    #[error("chart '{chart}' has no '{role}' selection")]
    UnknownRole { chart: String, role: String },

    #[error("selection key must look like '<chart>.<role>', got '{0}'")]
    MalformedKey(String),
}

impl From<polars::prelude::PolarsError> for ModelError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Frame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
