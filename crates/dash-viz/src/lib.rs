//! The dashboard's fixed chart menu.
//!
//! [`available_charts`] applies each chart's column-class precondition,
//! [`resolve_selection`] picks the column behind every selector, and
//! [`render_charts`] computes the data series of every offered chart.

pub mod chart;
pub mod error;
pub mod menu;

pub use chart::{
    Bar, BoxGroup, ChartData, ChartOptions, DEFAULT_HISTOGRAM_BINS, HistogramBin, LinePoint,
    PieSlice, RenderedChart, ResolvedSelection, ScatterPoint, build_chart, histogram,
    render_charts,
};
pub use error::{Result, VizError};
pub use menu::{available_charts, eligible_columns, is_available, resolve_selection};
