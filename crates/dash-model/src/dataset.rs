//! The tabular structure every parser produces.

use std::fmt;

use polars::prelude::{Column, DataFrame, DataType};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::any_to_string;

/// Semantic type of a column, assigned once when the dataset is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Datetime,
    Boolean,
    Other,
}

impl ColumnKind {
    /// Maps a Polars dtype onto the dashboard's closed set of kinds.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float32 | DataType::Float64 => Self::Float,
            DataType::String => Self::Text,
            DataType::Date | DataType::Datetime(_, _) => Self::Datetime,
            DataType::Boolean => Self::Boolean,
            _ => Self::Other,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and kind of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// A parsed upload: a Polars frame plus the kind tag of each column.
///
/// The frame guarantees equal column lengths and unique names; the schema
/// is derived from it at construction and never recomputed.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    schema: Vec<ColumnSchema>,
}

impl Dataset {
    pub fn new(frame: DataFrame) -> Self {
        let schema = frame
            .get_columns()
            .iter()
            .map(|col| ColumnSchema {
                name: col.name().to_string(),
                kind: ColumnKind::from_dtype(col.dtype()),
            })
            .collect();
        Self { frame, schema }
    }

    /// Builds a dataset from columns, rejecting ragged or duplicate columns.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let frame = DataFrame::new(columns)?;
        Ok(Self::new(frame))
    }

    pub fn empty() -> Self {
        Self::new(DataFrame::empty())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.schema.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.frame.column(name).ok()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.schema
            .iter()
            .find(|schema| schema.name == name)
            .map(|schema| schema.kind)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.iter().map(|schema| schema.name.as_str()).collect()
    }

    /// Stringified cells of the first `limit` rows, nulls as empty strings.
    pub fn preview_rows(&self, limit: usize) -> Vec<Vec<String>> {
        let rows = self.height().min(limit);
        (0..rows)
            .map(|row| {
                self.frame
                    .get_columns()
                    .iter()
                    .map(|col| col.get(row).map(any_to_string).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
