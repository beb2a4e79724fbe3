//! Column classification sets and per-session chart selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::{ColumnClass, SelectionKey};

/// Column names grouped by chart-eligibility class, in column order.
///
/// Each column appears in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSets {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
}

impl ColumnSets {
    pub fn get(&self, class: ColumnClass) -> &[String] {
        match class {
            ColumnClass::Numeric => &self.numeric,
            ColumnClass::Categorical => &self.categorical,
            ColumnClass::Datetime => &self.datetime,
        }
    }

    pub fn contains(&self, class: ColumnClass, column: &str) -> bool {
        self.get(class).iter().any(|name| name == column)
    }

    /// Total number of classified columns.
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.datetime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// User selections for the current session, keyed by `"<chart>.<role>"`.
///
/// Cleared whenever a new file is uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState {
    selections: BTreeMap<SelectionKey, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SelectionKey) -> Option<&str> {
        self.selections.get(&key).map(String::as_str)
    }

    /// Stores a selection, returning the previous one.
    pub fn set(&mut self, key: SelectionKey, column: impl Into<String>) -> Option<String> {
        self.selections.insert(key, column.into())
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
