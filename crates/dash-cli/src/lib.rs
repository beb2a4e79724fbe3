//! CLI library components for the upload dashboard.

pub mod logging;
pub mod render;
pub mod repl;
