//! Error types for chart construction.

use dash_model::{ChartKind, SelectionKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// The dataset lacks the column classes this chart needs.
    #[error("{chart} chart is not available for this dataset")]
    Unavailable { chart: ChartKind },

    /// No column of the required class exists for a selection.
    #[error("no eligible column for '{key}'")]
    NoEligibleColumn { key: SelectionKey },

    /// A resolved column is missing from the dataset.
    #[error("column '{0}' not found in dataset")]
    ColumnNotFound(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
