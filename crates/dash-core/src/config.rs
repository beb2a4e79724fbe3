//! Dashboard settings, optionally loaded from a TOML file.

use std::path::{Path, PathBuf};

use dash_ingest::{CsvOptions, IngestOptions};
use dash_viz::{ChartOptions, DEFAULT_HISTOGRAM_BINS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for parsing, insights and rendering.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in the table preview.
    pub preview_rows: usize,
    pub histogram_bins: usize,
    /// Maximum width of terminal tables, in characters.
    pub table_width: u16,
    pub csv: CsvOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 10,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            table_width: 120,
            csv: CsvOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl DashboardConfig {
    /// Loads settings from an explicit file. Missing fields keep defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            csv: self.csv.clone(),
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            histogram_bins: self.histogram_bins,
        }
    }
}
