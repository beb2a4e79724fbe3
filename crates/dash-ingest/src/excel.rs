//! First-sheet spreadsheet reading via calamine.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Seek, SeekFrom};

use calamine::{Data, DataType as _, Reader, Xlsx};
use chrono::NaiveDateTime;
use dash_model::{Dataset, format_numeric};
use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Inferred dtype of one spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellColumnType {
    Int64,
    Float64,
    Boolean,
    Datetime,
    Utf8,
}

/// Reads the first worksheet of an XLSX workbook; row 1 holds the headers.
pub fn read_excel<R: Read + Seek>(reader: &mut R) -> Result<Dataset> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| IngestError::Workbook {
            message: e.to_string(),
        })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::Workbook {
            message: "workbook has no worksheets".to_string(),
        })?
        .map_err(|e| IngestError::Workbook {
            message: e.to_string(),
        })?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let Some((header_row, body)) = rows.split_first() else {
        debug!("first worksheet is empty");
        return Ok(Dataset::empty());
    };

    let names = unique_header_names(header_row);
    let mut columns = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(index)).collect();
        let column_type = infer_column_type(&cells);
        columns.push(cells_to_column(name, &cells, column_type)?);
    }

    let dataset = Dataset::from_columns(columns)?;
    debug!(rows = dataset.height(), columns = dataset.width(), "worksheet parsed");
    Ok(dataset)
}

fn header_name(cell: &Data, index: usize) -> String {
    let name = cell_to_string(cell).unwrap_or_default();
    if name.trim().is_empty() {
        format!("column_{}", index + 1)
    } else {
        name
    }
}

/// Header names with repeats suffixed `_duplicated_<n>`, as the CSV reader does.
fn unique_header_names(header_row: &[Data]) -> Vec<String> {
    let names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(index, cell)| header_name(cell, index))
        .collect();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut repeats: HashMap<&str, usize> = HashMap::new();

    let mut unique = Vec::with_capacity(names.len());
    for name in &names {
        if seen.insert(name.as_str()) {
            unique.push(name.clone());
            continue;
        }
        let counter = repeats.entry(name.as_str()).or_insert(0);
        let renamed = loop {
            let candidate = format!("{name}_duplicated_{counter}");
            *counter += 1;
            if taken.insert(candidate.clone()) {
                break candidate;
            }
        };
        unique.push(renamed);
    }
    unique
}

/// Any text makes the column text; whole numbers become integers.
fn infer_column_type(cells: &[Option<&Data>]) -> CellColumnType {
    let mut has_text = false;
    let mut has_number = false;
    let mut has_bool = false;
    let mut has_datetime = false;
    for cell in cells.iter().flatten() {
        match cell {
            Data::Empty => {}
            Data::Int(_) | Data::Float(_) => has_number = true,
            Data::Bool(_) => has_bool = true,
            Data::DateTime(_) | Data::DateTimeIso(_) => has_datetime = true,
            _ => has_text = true,
        }
    }

    let kinds_seen = [has_number, has_bool, has_datetime]
        .iter()
        .filter(|seen| **seen)
        .count();
    if has_text || kinds_seen > 1 {
        return CellColumnType::Utf8;
    }
    if has_datetime {
        return CellColumnType::Datetime;
    }
    if has_bool {
        return CellColumnType::Boolean;
    }
    let all_whole = cells.iter().flatten().all(|cell| match cell {
        Data::Float(f) => f.is_finite() && f.fract() == 0.0,
        _ => true,
    });
    if has_number && all_whole {
        CellColumnType::Int64
    } else {
        CellColumnType::Float64
    }
}

fn cells_to_column(
    name: &str,
    cells: &[Option<&Data>],
    column_type: CellColumnType,
) -> Result<Column> {
    let column = match column_type {
        CellColumnType::Int64 => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v),
                    Some(Data::Float(v)) => Some(*v as i64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        CellColumnType::Float64 => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v as f64),
                    Some(Data::Float(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        CellColumnType::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Bool(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values).into_column()
        }
        CellColumnType::Datetime => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| {
                    cell.and_then(cell_to_datetime)
                        .map(|dt| dt.and_utc().timestamp_micros())
                })
                .collect();
            Series::new(name.into(), values)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
                .into_column()
        }
        CellColumnType::Utf8 => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| cell.and_then(cell_to_string))
                .collect();
            Series::new(name.into(), values).into_column()
        }
    };
    Ok(column)
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        other => Some(other.to_string()),
    }
}

fn cell_to_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(_) => cell.as_datetime(),
        Data::DateTimeIso(s) => parse_iso_datetime(s),
        _ => None,
    }
}

/// Parses an ISO-style date or datetime string.
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
