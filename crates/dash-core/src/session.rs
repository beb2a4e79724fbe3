//! Interactive session: the current upload and its chart selections.

use dash_model::{SelectionKey, SessionState};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::pipeline::{Dashboard, Upload, build_dashboard};

/// State kept between interactions. Every render starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct Session {
    upload: Option<Upload>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current upload and forgets all selections.
    pub fn upload(&mut self, upload: Upload) {
        debug!(file = %upload.name, cleared = self.state.len(), "new upload");
        self.state.clear();
        self.upload = Some(upload);
    }

    /// Records the column chosen for one selector.
    pub fn select(&mut self, key: SelectionKey, column: impl Into<String>) -> Option<String> {
        self.state.set(key, column)
    }

    pub fn current_upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Re-runs the whole pipeline; `None` until something is uploaded.
    pub fn render(&self, config: &DashboardConfig) -> Result<Option<Dashboard>> {
        self.upload
            .as_ref()
            .map(|upload| build_dashboard(upload, &self.state, config))
            .transpose()
    }
}
