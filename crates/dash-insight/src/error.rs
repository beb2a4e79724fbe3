//! Error types for insight computation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    /// Descriptive statistics need at least one column.
    #[error("Cannot describe a DataFrame without columns")]
    NoColumns,
}

pub type Result<T> = std::result::Result<T, InsightError>;
