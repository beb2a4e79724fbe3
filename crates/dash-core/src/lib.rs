//! Upload dashboard pipeline.
//!
//! [`build_dashboard`] turns an [`Upload`] and the current selections into a
//! [`Dashboard`]; [`Session`] keeps both between interactions.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;

pub use config::{ConfigError, DashboardConfig};
pub use error::{DashboardError, ErrorKind, Result};
pub use pipeline::{Dashboard, Preview, Upload, build_dashboard};
pub use session::Session;
