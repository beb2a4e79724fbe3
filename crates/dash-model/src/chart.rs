//! Chart menu and the selection keys each chart reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Chart-eligibility class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnClass {
    Numeric,
    Categorical,
    Datetime,
}

impl ColumnClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for ColumnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed chart menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Bar,
    Pie,
    Scatter,
    Line,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Histogram,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Box,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Line => "line",
            Self::Box => "box",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Histogram => "Histogram",
            Self::Bar => "Bar Chart",
            Self::Pie => "Pie Chart",
            Self::Scatter => "Scatter Plot",
            Self::Line => "Line Chart",
            Self::Box => "Box Plot",
        }
    }

    /// Selection roles this chart needs, in prompt order.
    pub fn roles(&self) -> &'static [SelectionRole] {
        match self {
            Self::Histogram | Self::Pie => &[SelectionRole::Column],
            Self::Bar | Self::Box => &[SelectionRole::Category, SelectionRole::Value],
            Self::Scatter => &[SelectionRole::X, SelectionRole::Y],
            Self::Line => &[SelectionRole::Time, SelectionRole::Value],
        }
    }

    pub fn keys(&self) -> Vec<SelectionKey> {
        self.roles()
            .iter()
            .map(|role| SelectionKey::new(*self, *role))
            .collect()
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownChart(s.to_string()))
    }
}

/// The part a selected column plays within a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionRole {
    Column,
    Category,
    Value,
    X,
    Y,
    Time,
}

impl SelectionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Category => "category",
            Self::Value => "value",
            Self::X => "x",
            Self::Y => "y",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for SelectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable session key for one chart input, written `"<chart>.<role>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SelectionKey {
    pub chart: ChartKind,
    pub role: SelectionRole,
}

impl SelectionKey {
    pub fn new(chart: ChartKind, role: SelectionRole) -> Self {
        Self { chart, role }
    }

    /// Column class a value for this key must belong to.
    pub fn class(&self) -> ColumnClass {
        match (self.chart, self.role) {
            (ChartKind::Bar | ChartKind::Pie | ChartKind::Box, SelectionRole::Category)
            | (ChartKind::Pie, _) => ColumnClass::Categorical,
            (ChartKind::Line, SelectionRole::Time) => ColumnClass::Datetime,
            _ => ColumnClass::Numeric,
        }
    }

    /// Prompt shown next to the selector.
    pub fn prompt(&self) -> &'static str {
        match (self.chart, self.role) {
            (ChartKind::Histogram, _) => "Select a numerical column for the histogram:",
            (ChartKind::Bar, SelectionRole::Category) => "Select a categorical column:",
            (ChartKind::Bar, _) => "Select a numerical column:",
            (ChartKind::Pie, _) => "Select a categorical column for the pie chart:",
            (ChartKind::Scatter, SelectionRole::X) => "Select X-axis column:",
            (ChartKind::Scatter, _) => "Select Y-axis column:",
            (ChartKind::Line, SelectionRole::Time) => "Select a datetime column:",
            (ChartKind::Line, _) => "Select a numerical column for the line chart:",
            (ChartKind::Box, SelectionRole::Category) => {
                "Select a categorical column for the box plot:"
            }
            (ChartKind::Box, _) => "Select a numerical column for the box plot:",
        }
    }

    /// Every key of every chart, in menu order.
    pub fn all() -> Vec<SelectionKey> {
        ChartKind::ALL.iter().flat_map(ChartKind::keys).collect()
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chart, self.role)
    }
}

impl FromStr for SelectionKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chart, role) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| ModelError::MalformedKey(s.to_string()))?;
        let chart: ChartKind = chart.parse()?;
        let role_name = role.trim().to_lowercase();
        chart
            .roles()
            .iter()
            .find(|candidate| candidate.as_str() == role_name)
            .map(|role| SelectionKey::new(chart, *role))
            .ok_or_else(|| ModelError::UnknownRole {
                chart: chart.to_string(),
                role: role.to_string(),
            })
    }
}

impl TryFrom<String> for SelectionKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SelectionKey> for String {
    fn from(key: SelectionKey) -> Self {
        key.to_string()
    }
}
