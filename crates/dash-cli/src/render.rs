//! Terminal rendering of a dashboard.

use std::io::{self, Write};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dash_core::Dashboard;
use dash_ingest::FileFormat;
use dash_insight::{InsightReport, format_statistic};
use dash_model::format_numeric;
use dash_viz::{ChartData, RenderedChart};

/// Width in characters of the longest bar.
const BAR_WIDTH: usize = 40;

/// Rows listed for scatter and line charts before eliding.
const POINT_ROWS: usize = 20;

/// Writes preview, insights and charts, in that order.
pub fn write_dashboard<W: Write>(out: &mut W, dashboard: &Dashboard, width: u16) -> io::Result<()> {
    writeln!(
        out,
        "File: {} ({})",
        dashboard.file_name,
        dashboard.format.extension()
    )?;
    writeln!(out)?;

    writeln!(out, "Data preview")?;
    writeln!(out, "{}", preview_table(dashboard, width))?;
    writeln!(out)?;

    write_insights(out, &dashboard.insights, width)?;

    writeln!(out, "Visualizations")?;
    if dashboard.charts.is_empty() {
        writeln!(out, "No charts are available for these column types.")?;
    }
    for chart in &dashboard.charts {
        writeln!(out)?;
        write_chart(out, chart, width)?;
    }
    Ok(())
}

fn preview_table(dashboard: &Dashboard, width: u16) -> Table {
    let mut table = Table::new();
    table.set_header(
        dashboard
            .preview
            .columns
            .iter()
            .map(|column| header_cell(&format!("{}\n{}", column.name, column.kind)))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table, width);
    for row in &dashboard.preview.rows {
        table.add_row(row.clone());
    }
    table
}

/// Row/column counts, missing values and the summary statistics table.
pub fn write_insights<W: Write>(out: &mut W, report: &InsightReport, width: u16) -> io::Result<()> {
    writeln!(out, "Insights")?;
    writeln!(out, "Rows: {}  Columns: {}", report.rows, report.columns)?;

    if report.missing.is_empty() {
        writeln!(out, "Missing values: none")?;
    } else {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Column"), header_cell("Missing")]);
        apply_table_style(&mut table, width);
        align_column(&mut table, 1, CellAlignment::Right);
        for missing in &report.missing {
            table.add_row(vec![Cell::new(&missing.column), Cell::new(missing.count)]);
        }
        writeln!(out, "Missing values:")?;
        writeln!(out, "{table}")?;
    }

    let mut table = Table::new();
    let mut header = vec![header_cell("")];
    header.extend(report.summary.column_names().into_iter().map(header_cell));
    table.set_header(header);
    apply_summary_table_style(&mut table, width);
    for index in 1..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (label, cells) in report.summary.rows() {
        let mut row = vec![dim_cell(label)];
        row.extend(cells.into_iter().map(Cell::new));
        table.add_row(row);
    }
    writeln!(out, "Summary statistics:")?;
    writeln!(out, "{table}")?;
    writeln!(out)
}

/// One chart: title, its selectors and a text rendering of its data.
pub fn write_chart<W: Write>(out: &mut W, chart: &RenderedChart, width: u16) -> io::Result<()> {
    writeln!(out, "{} - {}", chart.kind.title(), chart.title)?;
    for selection in &chart.selections {
        writeln!(
            out,
            "  {} {} [{}]",
            selection.prompt,
            selection.column,
            selection.key
        )?;
    }

    match &chart.data {
        ChartData::Histogram { bins } => {
            let rows: Vec<(String, f64, String)> = bins
                .iter()
                .map(|bin| {
                    (
                        format!(
                            "{} - {}",
                            format_statistic(bin.start),
                            format_statistic(bin.end)
                        ),
                        bin.count as f64,
                        bin.count.to_string(),
                    )
                })
                .collect();
            write_bars(out, &rows)?;
        }
        ChartData::Bar { bars } => {
            let rows: Vec<(String, f64, String)> = bars
                .iter()
                .map(|bar| (bar.category.clone(), bar.value, format_numeric(bar.value)))
                .collect();
            write_bars(out, &rows)?;
        }
        ChartData::Pie { slices } => {
            let rows: Vec<(String, f64, String)> = slices
                .iter()
                .map(|slice| {
                    (
                        slice.label.clone(),
                        slice.share,
                        format!("{} ({:.1}%)", slice.count, slice.share * 100.0),
                    )
                })
                .collect();
            write_bars(out, &rows)?;
        }
        ChartData::Scatter { points } => {
            let x = chart.selections.first().map_or("x", |s| s.column.as_str());
            let y = chart.selections.get(1).map_or("y", |s| s.column.as_str());
            let rows = points
                .iter()
                .map(|p| vec![format_numeric(p.x), format_numeric(p.y)]);
            write_point_table(out, &[x, y], rows, points.len(), width)?;
        }
        ChartData::Line { points } => {
            let time = chart.selections.first().map_or("time", |s| s.column.as_str());
            let value = chart.selections.get(1).map_or("value", |s| s.column.as_str());
            let rows = points
                .iter()
                .map(|p| vec![p.time.clone(), format_numeric(p.value)]);
            write_point_table(out, &[time, value], rows, points.len(), width)?;
        }
        ChartData::Box { groups } => {
            let mut table = Table::new();
            table.set_header(
                [
                    "Category", "Min", "Q1", "Median", "Q3", "Max", "Whiskers", "Outliers",
                ]
                .into_iter()
                .map(header_cell)
                .collect::<Vec<_>>(),
            );
            apply_table_style(&mut table, width);
            for index in 1..8 {
                align_column(&mut table, index, CellAlignment::Right);
            }
            for group in groups {
                let s = &group.summary;
                table.add_row(vec![
                    Cell::new(&group.category),
                    Cell::new(format_statistic(s.min)),
                    Cell::new(format_statistic(s.q1)),
                    Cell::new(format_statistic(s.median)),
                    Cell::new(format_statistic(s.q3)),
                    Cell::new(format_statistic(s.max)),
                    Cell::new(format!(
                        "{} .. {}",
                        format_statistic(group.lower_whisker),
                        format_statistic(group.upper_whisker)
                    )),
                    count_cell(group.outliers.len()),
                ]);
            }
            writeln!(out, "{table}")?;
        }
    }
    Ok(())
}

fn write_bars<W: Write>(out: &mut W, rows: &[(String, f64, String)]) -> io::Result<()> {
    let max = rows.iter().map(|(_, value, _)| *value).fold(0.0, f64::max);
    let label_width = rows
        .iter()
        .map(|(label, _, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value, text) in rows {
        writeln!(
            out,
            "  {label:<label_width$} | {bar} {text}",
            bar = bar(*value, max, BAR_WIDTH)
        )?;
    }
    Ok(())
}

/// A bar of block characters proportional to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let length = ((value / max) * width as f64).round() as usize;
    "█".repeat(length.min(width))
}

fn write_point_table<W, I>(
    out: &mut W,
    headers: &[&str],
    rows: I,
    total: usize,
    width: u16,
) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table, width);
    for row in rows.take(POINT_ROWS) {
        table.add_row(row);
    }
    writeln!(out, "{table}")?;
    if total > POINT_ROWS {
        writeln!(out, "  ... {} more points", total - POINT_ROWS)?;
    }
    Ok(())
}

/// Lists the supported upload formats.
pub fn formats_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Extension"), header_cell("Contents")]);
    apply_table_style(&mut table, 120);
    for format in FileFormat::ALL {
        table.add_row(vec![
            Cell::new(format!(".{}", format.extension())),
            Cell::new(format.description()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table, width: u16) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
}

fn apply_summary_table_style(table: &mut Table, width: u16) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}
