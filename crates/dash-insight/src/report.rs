//! Dataset overview: dimensions, missing values and summary statistics.

use std::collections::HashMap;

use chrono::DateTime;
use dash_model::{
    ColumnKind, Dataset, column_epoch_micros, column_f64, column_labels, format_numeric,
};
use serde::Serialize;
use tracing::info;

use crate::error::{InsightError, Result};
use crate::stats::{mean, quantile_sorted, sample_std, sorted};

/// Row labels of a numeric summary, in display order.
pub const NUMERIC_STATISTICS: [&str; 8] =
    ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Row labels of a categorical summary, in display order.
pub const CATEGORICAL_STATISTICS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Everything the insights panel shows for one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub rows: usize,
    pub columns: usize,
    /// Columns with at least one missing value, in column order.
    pub missing: Vec<MissingCount>,
    pub summary: SummaryTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
}

/// Per-column descriptive statistics.
///
/// Numeric and datetime columns are summarised together when the dataset has
/// any; otherwise every column gets a frequency summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "lowercase")]
pub enum SummaryTable {
    Numeric(Vec<NumericSummary>),
    Categorical(Vec<CategoricalSummary>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    /// Values are microseconds since the Unix epoch and std is absent.
    pub temporal: bool,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: Option<usize>,
}

impl SummaryTable {
    pub fn statistics(&self) -> &'static [&'static str] {
        match self {
            Self::Numeric(_) => &NUMERIC_STATISTICS,
            Self::Categorical(_) => &CATEGORICAL_STATISTICS,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        match self {
            Self::Numeric(columns) => columns.iter().map(|c| c.column.as_str()).collect(),
            Self::Categorical(columns) => columns.iter().map(|c| c.column.as_str()).collect(),
        }
    }

    /// Formatted cells as one row per statistic, empty where undefined.
    pub fn rows(&self) -> Vec<(&'static str, Vec<String>)> {
        self.statistics()
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let cells: Vec<String> = match self {
                    Self::Numeric(columns) => columns.iter().map(|c| c.cell(index)).collect(),
                    Self::Categorical(columns) => {
                        columns.iter().map(|c| c.cell(index)).collect()
                    }
                };
                (*label, cells)
            })
            .collect()
    }
}

impl NumericSummary {
    fn of(column: &str, values: &[f64]) -> Self {
        let sorted = sorted(values);
        Self {
            column: column.to_string(),
            temporal: false,
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied(),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    fn of_temporal(column: &str, micros: &[f64]) -> Self {
        Self {
            temporal: true,
            std: None,
            ..Self::of(column, micros)
        }
    }

    fn cell(&self, index: usize) -> String {
        let value = match index {
            0 => return self.count.to_string(),
            1 => self.mean,
            2 => self.std,
            3 => self.min,
            4 => self.q25,
            5 => self.median,
            6 => self.q75,
            _ => self.max,
        };
        match value {
            Some(v) if self.temporal => format_timestamp(v),
            Some(v) => format_statistic(v),
            None => String::new(),
        }
    }
}

impl CategoricalSummary {
    fn of(column: &str, labels: Vec<Option<String>>) -> Self {
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for label in labels.into_iter().flatten() {
            match positions.get(&label) {
                Some(&index) => order[index].1 += 1,
                None => {
                    positions.insert(label.clone(), order.len());
                    order.push((label, 1));
                }
            }
        }

        let count = order.iter().map(|(_, n)| n).sum();
        // earliest-seen value wins ties
        let mut top: Option<&(String, usize)> = None;
        for entry in &order {
            if top.is_none_or(|best| entry.1 > best.1) {
                top = Some(entry);
            }
        }

        Self {
            column: column.to_string(),
            count,
            unique: order.len(),
            top: top.map(|(label, _)| label.clone()),
            freq: top.map(|(_, n)| *n),
        }
    }

    fn cell(&self, index: usize) -> String {
        match index {
            0 => self.count.to_string(),
            1 => self.unique.to_string(),
            2 => self.top.clone().unwrap_or_default(),
            _ => self.freq.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

/// Rounds to six decimals and drops trailing zeros.
pub fn format_statistic(value: f64) -> String {
    format_numeric((value * 1e6).round() / 1e6)
}

/// Formats epoch microseconds as `YYYY-MM-DD HH:MM:SS`, keeping fractions.
fn format_timestamp(micros: f64) -> String {
    match DateTime::from_timestamp_micros(micros.round() as i64) {
        Some(dt) => dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        None => String::new(),
    }
}

/// Computes the insights panel for a dataset.
pub fn build_insight_report(dataset: &Dataset) -> Result<InsightReport> {
    if dataset.width() == 0 {
        return Err(InsightError::NoColumns);
    }

    let frame = dataset.frame();
    let missing: Vec<MissingCount> = frame
        .get_columns()
        .iter()
        .filter(|column| column.null_count() > 0)
        .map(|column| MissingCount {
            column: column.name().to_string(),
            count: column.null_count(),
        })
        .collect();

    let described: Vec<(&str, bool)> = dataset
        .schema()
        .iter()
        .filter_map(|schema| match schema.kind {
            ColumnKind::Integer | ColumnKind::Float => Some((schema.name.as_str(), false)),
            ColumnKind::Datetime => Some((schema.name.as_str(), true)),
            _ => None,
        })
        .collect();

    let summary = if described.is_empty() {
        SummaryTable::Categorical(
            frame
                .get_columns()
                .iter()
                .map(|column| CategoricalSummary::of(column.name(), column_labels(column)))
                .collect(),
        )
    } else {
        SummaryTable::Numeric(
            described
                .iter()
                .filter_map(|(name, temporal)| Some((dataset.column(name)?, *temporal)))
                .map(|(column, temporal)| {
                    if temporal {
                        let micros: Vec<f64> = column_epoch_micros(column)
                            .into_iter()
                            .flatten()
                            .map(|v| v as f64)
                            .collect();
                        NumericSummary::of_temporal(column.name(), &micros)
                    } else {
                        let values: Vec<f64> =
                            column_f64(column).into_iter().flatten().collect();
                        NumericSummary::of(column.name(), &values)
                    }
                })
                .collect(),
        )
    };

    info!(
        rows = dataset.height(),
        columns = dataset.width(),
        columns_with_missing = missing.len(),
        "insight report built"
    );

    Ok(InsightReport {
        rows: dataset.height(),
        columns: dataset.width(),
        missing,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    fn render(table: &SummaryTable) -> String {
        let mut lines = vec![format!("stat | {}", table.column_names().join(" | "))];
        for (label, cells) in table.rows() {
            lines.push(format!("{label} | {}", cells.join(" | ")));
        }
        lines.join("\n")
    }

    #[test]
    fn category_value_report() {
        let dataset = Dataset::from_columns(vec![
            Series::new("Category".into(), &["A", "B", "C"]).into_column(),
            Series::new("Value".into(), &[10i64, 20, 30]).into_column(),
        ])
        .unwrap();
        let report = build_insight_report(&dataset).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.columns, 2);
        assert!(report.missing.is_empty());
        insta::assert_snapshot!(render(&report.summary), @r"
        stat | Value
        count | 3
        mean | 20
        std | 10
        min | 10
        25% | 15
        50% | 20
        75% | 25
        max | 30
        ");
    }

    #[test]
    fn text_only_report() {
        let dataset = Dataset::from_columns(vec![
            Series::new(
                "Fruit".into(),
                &[Some("pear"), Some("fig"), Some("fig"), Some("pear"), None],
            )
            .into_column(),
        ])
        .unwrap();
        let report = build_insight_report(&dataset).unwrap();
        assert_eq!(
            report.missing,
            vec![MissingCount {
                column: "Fruit".to_string(),
                count: 1
            }]
        );
        let SummaryTable::Categorical(columns) = &report.summary else {
            panic!("expected categorical summary");
        };
        assert_eq!(columns[0].count, 4);
        assert_eq!(columns[0].unique, 2);
        assert_eq!(columns[0].top.as_deref(), Some("pear"));
        assert_eq!(columns[0].freq, Some(2));
    }

    #[test]
    fn missing_counts_keep_column_order() {
        let dataset = Dataset::from_columns(vec![
            Series::new("a".into(), &[Some(1.0f64), None]).into_column(),
            Series::new("b".into(), &[Some(1i64), Some(2)]).into_column(),
            Series::new("c".into(), &[None::<&str>, None]).into_column(),
        ])
        .unwrap();
        let report = build_insight_report(&dataset).unwrap();
        let missing: Vec<(&str, usize)> = report
            .missing
            .iter()
            .map(|m| (m.column.as_str(), m.count))
            .collect();
        assert_eq!(missing, vec![("a", 1), ("c", 2)]);
        assert_eq!(report.summary.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn all_null_numeric_column_has_no_statistics() {
        let column = Series::new("x".into(), &[None::<f64>, None]).into_column();
        let dataset = Dataset::from_columns(vec![column]).unwrap();
        let report = build_insight_report(&dataset).unwrap();
        let rows = report.summary.rows();
        assert_eq!(rows[0], ("count", vec!["0".to_string()]));
        assert_eq!(rows[1], ("mean", vec![String::new()]));
    }

    #[test]
    fn datetime_columns_join_the_numeric_summary() {
        use polars::prelude::DataType;

        let day = 86_400_000_000i64;
        let when = Series::new("When".into(), &[Some(0i64), Some(2 * day), None])
            .cast(&DataType::Datetime(polars::prelude::TimeUnit::Microseconds, None))
            .unwrap()
            .into_column();
        let dataset = Dataset::from_columns(vec![
            Series::new("Label".into(), &["a", "b", "c"]).into_column(),
            when,
            Series::new("Value".into(), &[1i64, 2, 3]).into_column(),
        ])
        .unwrap();
        let report = build_insight_report(&dataset).unwrap();
        insta::assert_snapshot!(render(&report.summary), @r"
        stat | When | Value
        count | 2 | 3
        mean | 1970-01-02 00:00:00 | 2
        std |  | 1
        min | 1970-01-01 00:00:00 | 1
        25% | 1970-01-01 12:00:00 | 1.5
        50% | 1970-01-02 00:00:00 | 2
        75% | 1970-01-02 12:00:00 | 2.5
        max | 1970-01-03 00:00:00 | 3
        ");
    }

    #[test]
    fn zero_columns_cannot_be_described() {
        let result = build_insight_report(&Dataset::empty());
        assert!(matches!(result, Err(InsightError::NoColumns)));
    }

    #[test]
    fn statistic_formatting() {
        assert_eq!(format_statistic(20.0), "20");
        assert_eq!(format_statistic(1.0 / 3.0), "0.333333");
    }
}
