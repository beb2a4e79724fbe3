//! JSON documents flattened into a table.
//!
//! Nested objects become dotted column names (`address.city`). A top-level
//! array yields one row per element, a top-level object a single row.
//! Arrays inside a record are kept whole as JSON text.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

use dash_model::Dataset;
use polars::prelude::{Column, IntoColumn, NamedFrom, Series};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Column name used for scalar array elements.
const SCALAR_COLUMN: &str = "0";

/// Reads one JSON document and flattens it into rows.
pub fn read_json<R: Read + Seek>(reader: &mut R) -> Result<Dataset> {
    reader.seek(SeekFrom::Start(0))?;
    let document: Value = serde_json::from_reader(reader)?;
    json_to_dataset(&document)
}

/// Flattens an already-parsed JSON document.
pub fn json_to_dataset(document: &Value) -> Result<Dataset> {
    let mut table = FlatTable::default();
    match document {
        Value::Array(items) => {
            for item in items {
                table.push_row(flatten_record(item));
            }
        }
        Value::Object(_) => table.push_row(flatten_record(document)),
        other => {
            return Err(IngestError::JsonShape {
                message: format!(
                    "expected an object or array at the top level, got {}",
                    type_name(other)
                ),
            });
        }
    }

    let columns = table.into_columns();
    let dataset = Dataset::from_columns(columns)?;
    debug!(rows = dataset.height(), columns = dataset.width(), "JSON flattened");
    Ok(dataset)
}

fn flatten_record(value: &Value) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    match value {
        Value::Object(map) => flatten_object("", map, &mut fields),
        scalar => fields.push((SCALAR_COLUMN.to_string(), scalar.clone())),
    }
    fields
}

fn flatten_object(prefix: &str, map: &Map<String, Value>, fields: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_object(&path, nested, fields),
            other => fields.push((path, other.clone())),
        }
    }
}

/// Column-major accumulator that keeps first-seen column order.
#[derive(Default)]
struct FlatTable {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    cells: Vec<Vec<Value>>,
    rows: usize,
}

impl FlatTable {
    fn push_row(&mut self, fields: Vec<(String, Value)>) {
        for (name, value) in fields {
            let index = self.position(name);
            let column = &mut self.cells[index];
            if column.len() > self.rows {
                // same flattened path twice in one record; last one wins
                column[self.rows] = value;
            } else {
                column.resize(self.rows, Value::Null);
                column.push(value);
            }
        }
        self.rows += 1;
    }

    fn position(&mut self, name: String) -> usize {
        if let Some(index) = self.positions.get(&name) {
            return *index;
        }
        let index = self.names.len();
        self.positions.insert(name.clone(), index);
        self.names.push(name);
        self.cells.push(Vec::new());
        index
    }

    fn into_columns(self) -> Vec<Column> {
        let rows = self.rows;
        self.names
            .into_iter()
            .zip(self.cells)
            .map(|(name, mut values)| {
                values.resize(rows, Value::Null);
                values_to_column(&name, &values)
            })
            .collect()
    }
}

/// Integers, then floats, then booleans; anything mixed becomes text.
fn values_to_column(name: &str, values: &[Value]) -> Column {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();
    let all = |check: fn(&Value) -> bool| !present.is_empty() && present.iter().all(|v| check(v));

    if all(|v| v.as_i64().is_some()) {
        let data: Vec<Option<i64>> = values.iter().map(Value::as_i64).collect();
        Series::new(name.into(), data).into_column()
    } else if all(Value::is_number) {
        let data: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
        Series::new(name.into(), data).into_column()
    } else if all(Value::is_boolean) {
        let data: Vec<Option<bool>> = values.iter().map(Value::as_bool).collect();
        Series::new(name.into(), data).into_column()
    } else {
        let data: Vec<Option<String>> = values.iter().map(value_to_text).collect();
        Series::new(name.into(), data).into_column()
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
