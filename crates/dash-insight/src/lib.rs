//! Insights for an uploaded dataset.
//!
//! [`classify_columns`] decides which charts a dataset can feed, and
//! [`build_insight_report`] produces the dimensions, missing-value counts
//! and descriptive statistics shown above the charts.

pub mod error;
pub mod report;
pub mod schema;
pub mod stats;

pub use error::{InsightError, Result};
pub use report::{
    CATEGORICAL_STATISTICS, CategoricalSummary, InsightReport, MissingCount, NUMERIC_STATISTICS,
    NumericSummary, SummaryTable, build_insight_report, format_statistic,
};
pub use schema::classify_columns;
pub use stats::FiveNumber;
