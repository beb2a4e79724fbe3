//! Chart data series computed from a dataset and resolved selections.

use std::collections::HashMap;

use dash_insight::FiveNumber;
use dash_model::{
    ChartKind, ColumnSets, Dataset, SelectionKey, SessionState, column_f64, column_labels,
    column_ordinals,
};
use polars::prelude::Column;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VizError};
use crate::menu::{available_charts, eligible_columns, is_available, resolve_selection};

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Whisker reach in interquartile ranges.
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub histogram_bins: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// One chart of the menu, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub title: String,
    pub selections: Vec<ResolvedSelection>,
    pub data: ChartData,
}

/// A selector as shown to the user: its prompt, choices and current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub key: SelectionKey,
    pub prompt: &'static str,
    pub column: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartData {
    Histogram { bins: Vec<HistogramBin> },
    Bar { bars: Vec<Bar> },
    Pie { slices: Vec<PieSlice> },
    Scatter { points: Vec<ScatterPoint> },
    Line { points: Vec<LinePoint> },
    Box { groups: Vec<BoxGroup> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub category: String,
    pub summary: FiveNumber,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Builds every offered chart, in menu order.
pub fn render_charts(
    dataset: &Dataset,
    sets: &ColumnSets,
    state: &SessionState,
    options: &ChartOptions,
) -> Result<Vec<RenderedChart>> {
    available_charts(sets)
        .into_iter()
        .map(|chart| build_chart(chart, dataset, sets, state, options))
        .collect()
}

/// Builds one chart from the current selections.
pub fn build_chart(
    chart: ChartKind,
    dataset: &Dataset,
    sets: &ColumnSets,
    state: &SessionState,
    options: &ChartOptions,
) -> Result<RenderedChart> {
    if !is_available(chart, sets) {
        return Err(VizError::Unavailable { chart });
    }

    let selections = chart
        .keys()
        .into_iter()
        .map(|key| -> Result<ResolvedSelection> {
            let column = resolve_selection(key, state, sets)
                .ok_or(VizError::NoEligibleColumn { key })?;
            Ok(ResolvedSelection {
                key,
                prompt: key.prompt(),
                column: column.to_string(),
                options: eligible_columns(key, sets).to_vec(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let first = column(dataset, &selections[0].column)?;
    let (title, data) = match chart {
        ChartKind::Histogram => {
            let values: Vec<f64> = column_f64(first).into_iter().flatten().collect();
            (
                format!("Distribution of {}", first.name()),
                ChartData::Histogram {
                    bins: histogram(&values, options.histogram_bins),
                },
            )
        }
        ChartKind::Pie => (
            format!("Distribution of {}", first.name()),
            ChartData::Pie {
                slices: pie(column_labels(first)),
            },
        ),
        ChartKind::Bar | ChartKind::Box => {
            let second = column(dataset, &selections[1].column)?;
            let pairs = category_pairs(first, second);
            let title = format!("{} by {}", second.name(), first.name());
            let data = if chart == ChartKind::Bar {
                ChartData::Bar {
                    bars: bar(&pairs),
                }
            } else {
                ChartData::Box {
                    groups: box_groups(&pairs),
                }
            };
            (title, data)
        }
        ChartKind::Scatter => {
            let second = column(dataset, &selections[1].column)?;
            (
                format!("{} vs {}", second.name(), first.name()),
                ChartData::Scatter {
                    points: scatter(first, second),
                },
            )
        }
        ChartKind::Line => {
            let second = column(dataset, &selections[1].column)?;
            (
                format!("{} over {}", second.name(), first.name()),
                ChartData::Line {
                    points: line(first, second),
                },
            )
        }
    };

    debug!(chart = %chart, title = %title, "chart built");
    Ok(RenderedChart {
        kind: chart,
        title,
        selections,
        data,
    })
}

fn column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column> {
    dataset
        .column(name)
        .ok_or_else(|| VizError::ColumnNotFound(name.to_string()))
}

/// Equal-width bins between the sample minimum and maximum.
///
/// The last bin is closed on the right. A constant sample gets one bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    if max == min || bins <= 1 {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            start: min + width * index as f64,
            end: if index + 1 == bins {
                max
            } else {
                min + width * (index + 1) as f64
            },
            count,
        })
        .collect()
}

/// Rows where both the category and the value are present.
fn category_pairs(categories: &Column, values: &Column) -> Vec<(String, f64)> {
    column_labels(categories)
        .into_iter()
        .zip(column_f64(values))
        .filter_map(|(category, value)| Some((category?, value?)))
        .collect()
}

/// Groups values by category, keeping first-seen category order.
fn group_by_category(pairs: &[(String, f64)]) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (category, value) in pairs {
        match positions.get(category.as_str()) {
            Some(&index) => groups[index].1.push(*value),
            None => {
                positions.insert(category.as_str(), groups.len());
                groups.push((category.clone(), vec![*value]));
            }
        }
    }
    groups
}

fn bar(pairs: &[(String, f64)]) -> Vec<Bar> {
    group_by_category(pairs)
        .into_iter()
        .map(|(category, values)| Bar {
            category,
            value: values.iter().sum(),
        })
        .collect()
}

fn pie(labels: Vec<Option<String>>) -> Vec<PieSlice> {
    let mut slices: Vec<PieSlice> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for label in labels.into_iter().flatten() {
        match positions.get(&label) {
            Some(&index) => slices[index].count += 1,
            None => {
                positions.insert(label.clone(), slices.len());
                slices.push(PieSlice {
                    label,
                    count: 1,
                    share: 0.0,
                });
            }
        }
    }
    let total: usize = slices.iter().map(|slice| slice.count).sum();
    for slice in &mut slices {
        slice.share = slice.count as f64 / total as f64;
    }
    slices
}

fn scatter(x: &Column, y: &Column) -> Vec<ScatterPoint> {
    column_f64(x)
        .into_iter()
        .zip(column_f64(y))
        .filter_map(|(x, y)| Some(ScatterPoint { x: x?, y: y? }))
        .collect()
}

fn line(time: &Column, values: &Column) -> Vec<LinePoint> {
    let mut points: Vec<(i64, LinePoint)> = column_ordinals(time)
        .into_iter()
        .zip(column_labels(time))
        .zip(column_f64(values))
        .filter_map(|((ordinal, label), value)| {
            Some((
                ordinal?,
                LinePoint {
                    time: label?,
                    value: value?,
                },
            ))
        })
        .collect();
    points.sort_by_key(|(ordinal, _)| *ordinal);
    points.into_iter().map(|(_, point)| point).collect()
}

fn box_groups(pairs: &[(String, f64)]) -> Vec<BoxGroup> {
    group_by_category(pairs)
        .into_iter()
        .filter_map(|(category, values)| {
            let summary = FiveNumber::of(&values)?;
            let low_fence = summary.q1 - WHISKER_IQR * summary.iqr();
            let high_fence = summary.q3 + WHISKER_IQR * summary.iqr();
            let fences = low_fence..=high_fence;
            let inside = || values.iter().copied().filter(|v| fences.contains(v));
            let lower_whisker = inside().fold(summary.median, f64::min);
            let upper_whisker = inside().fold(summary.median, f64::max);
            let mut outliers: Vec<f64> = values
                .iter()
                .copied()
                .filter(|v| !fences.contains(v))
                .collect();
            outliers.sort_by(f64::total_cmp);
            Some(BoxGroup {
                category,
                summary,
                lower_whisker,
                upper_whisker,
                outliers,
            })
        })
        .collect()
}
