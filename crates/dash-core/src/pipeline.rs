//! Upload → parse → insights → charts.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use dash_ingest::{FileFormat, read_dataset};
use dash_insight::{InsightReport, build_insight_report, classify_columns};
use dash_model::{ColumnSchema, ColumnSets, Dataset, SessionState};
use dash_viz::{RenderedChart, render_charts};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::DashboardConfig;
use crate::error::Result;

/// An uploaded file: its name (for format dispatch) and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// The first rows of the parsed table, stringified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub columns: Vec<ColumnSchema>,
    pub rows: Vec<Vec<String>>,
}

/// Everything rendered for one upload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub file_name: String,
    pub format: FileFormat,
    #[serde(skip)]
    pub dataset: Dataset,
    pub preview: Preview,
    pub insights: InsightReport,
    pub column_sets: ColumnSets,
    pub charts: Vec<RenderedChart>,
}

/// Runs the full pipeline for one upload and the current selections.
///
/// Any failure aborts the whole render; no partial dashboard is returned.
pub fn build_dashboard(
    upload: &Upload,
    state: &SessionState,
    config: &DashboardConfig,
) -> Result<Dashboard> {
    let span = info_span!("dashboard", file = %upload.name);
    let _guard = span.enter();
    let start = Instant::now();

    let format = FileFormat::from_file_name(&upload.name)?;
    debug!(format = %format, bytes = upload.bytes.len(), "upload dispatched");

    let mut reader = Cursor::new(upload.bytes.as_slice());
    let dataset = read_dataset(format, &mut reader, &config.ingest_options())?;
    info!(
        rows = dataset.height(),
        columns = dataset.width(),
        duration_ms = start.elapsed().as_millis(),
        "parse complete"
    );

    let column_sets = classify_columns(&dataset);
    let insights = build_insight_report(&dataset)?;
    let charts = render_charts(&dataset, &column_sets, state, &config.chart_options())?;

    let preview = Preview {
        columns: dataset.schema().to_vec(),
        rows: dataset.preview_rows(config.preview_rows),
    };
    info!(
        charts = charts.len(),
        selections = state.len(),
        duration_ms = start.elapsed().as_millis(),
        "dashboard built"
    );

    Ok(Dashboard {
        file_name: upload.name.clone(),
        format,
        dataset,
        preview,
        insights,
        column_sets,
        charts,
    })
}
