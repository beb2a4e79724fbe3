//! Data model for the upload dashboard.
//!
//! - [`Dataset`]: a parsed upload with an explicit [`ColumnKind`] per column
//! - [`ColumnSets`]: columns grouped by chart eligibility
//! - [`ChartKind`], [`SelectionKey`], [`SessionState`]: the chart menu and
//!   the per-session selections that drive it

pub mod chart;
pub mod dataset;
pub mod error;
pub mod selection;
pub mod value;

pub use chart::{ChartKind, ColumnClass, SelectionKey, SelectionRole};
pub use dataset::{ColumnKind, ColumnSchema, Dataset};
pub use error::{ModelError, Result};
pub use selection::{ColumnSets, SessionState};
pub use value::{
    any_to_f64, any_to_label, any_to_ordinal, any_to_string, column_epoch_micros, column_f64,
    column_labels, column_ordinals, format_numeric,
};
