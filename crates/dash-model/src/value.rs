//! Polars `AnyValue` conversions used for display and statistics.

use polars::prelude::{AnyValue, Column, DataType, TimeUnit};

/// Converts a Polars `AnyValue` to a display string.
///
/// Nulls become an empty string; floats drop redundant trailing zeros.
///
/// ```
/// use polars::prelude::AnyValue;
/// use dash_model::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(2.50)), "2.5");
/// assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            // Display wraps some values in quotes
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts `AnyValue` to `String`, returning `None` for nulls.
///
/// Unlike [`any_to_string`], an empty string value stays `Some("")`.
pub fn any_to_label(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    }
}

/// Formats a float without trailing zeros after the decimal point.
///
/// ```
/// use dash_model::format_numeric;
///
/// assert_eq!(format_numeric(40.0), "40");
/// assert_eq!(format_numeric(1.50), "1.5");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Converts a numeric `AnyValue` to `f64`. Strings are not parsed.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    }
}

/// Physical ordering key of a temporal value (days or ticks since the epoch).
pub fn any_to_ordinal(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Date(days) => Some(i64::from(days)),
        AnyValue::Datetime(ticks, _, _) => Some(ticks),
        _ => None,
    }
}

/// Numeric cells of a column in row order; non-numeric cells and NaN are `None`.
pub fn column_f64(column: &Column) -> Vec<Option<f64>> {
    (0..column.len())
        .map(|idx| {
            any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)).filter(|v| !v.is_nan())
        })
        .collect()
}

/// Stringified cells of a column in row order, `None` for nulls.
pub fn column_labels(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| any_to_label(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Temporal ordering keys of a column in row order.
pub fn column_ordinals(column: &Column) -> Vec<Option<i64>> {
    (0..column.len())
        .map(|idx| any_to_ordinal(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Temporal cells of a column as microseconds since the Unix epoch.
///
/// Dates count from midnight; non-temporal columns yield all `None`.
pub fn column_epoch_micros(column: &Column) -> Vec<Option<i64>> {
    let scale = |ticks: i64| match column.dtype() {
        DataType::Date => ticks.checked_mul(86_400_000_000),
        DataType::Datetime(TimeUnit::Nanoseconds, _) => Some(ticks / 1_000),
        DataType::Datetime(TimeUnit::Microseconds, _) => Some(ticks),
        DataType::Datetime(TimeUnit::Milliseconds, _) => ticks.checked_mul(1_000),
        _ => None,
    };
    column_ordinals(column)
        .into_iter()
        .map(|ordinal| ordinal.and_then(scale))
        .collect()
}
