use crate::error::AppError;
use crate::types::{PercentileRow, SummaryStats};
use crate::util::{format_int, format_number};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const PERCENTILE_HEADER: &str =
    "Percentile Area,Assessed Per Square Foot,Extrapolated Per Square Foot";

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    generated_at: String,
    #[serde(flatten)]
    summary: &'a SummaryStats,
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_json(
    path: &Path,
    summary: &SummaryStats,
    generated_at: DateTime<Utc>,
) -> Result<(), AppError> {
    let doc = SummaryDocument {
        generated_at: generated_at.to_rfc3339(),
        summary,
    };
    let s = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// The percentile table as CSV text, header first.
pub fn percentile_csv(rows: &[PercentileRow]) -> Result<String, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        wtr.write_record(PERCENTILE_HEADER.split(','))?;
    }
    for r in rows {
        wtr.serialize(r)?;
    }
    let bytes = wtr.into_inner().map_err(|e| AppError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Human-readable report: one `label: value` line per figure followed by
/// the percentile table.
pub fn format_report(summary: &SummaryStats, rows: &[PercentileRow]) -> Result<String, AppError> {
    let lines: [(&str, String); 13] = [
        ("Num Parcels", format_int(summary.num_parcels)),
        ("Num Sample Parcels", format_int(summary.num_sample_parcels)),
        ("Num Blocks", format_int(summary.num_blocks)),
        ("Num Sample Blocks", format_int(summary.num_sampled_blocks)),
        (
            "Average Sample Block Land Value Growth",
            format_number(summary.avg_sample_block_value_growth, 4),
        ),
        (
            "Average Assessed Land Value Per Square Foot",
            format_number(summary.avg_assessed_land_value_per_sqft, 2),
        ),
        (
            "Average Extrapolated Land Value Per Square Foot",
            format_number(summary.avg_extrapolated_land_value_per_sqft, 2),
        ),
        (
            "Total Assessed Land Area in Square Feet",
            format_number(summary.total_land_area_sqft, 0),
        ),
        (
            "Total Assessed Land Area in Square Miles",
            format_number(summary.total_land_area_sqmi, 4),
        ),
        (
            "Total Assessed Land Value",
            format_number(summary.total_assessed_land_value, 2),
        ),
        (
            "Total Extrapolated Land Value",
            format_number(summary.total_extrapolated_land_value, 2),
        ),
        (
            "Median Assessed Land Value Per Square Foot",
            format_number(summary.median_assessed_land_value_per_sqft, 2),
        ),
        (
            "Median Extrapolated Land Value Per Square Foot",
            format_number(summary.median_extrapolated_land_value_per_sqft, 2),
        ),
    ];

    let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
    let mut out = String::new();
    for (label, value) in &lines {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:<width$} {}", format!("{label}:"), value);
    }
    out.push_str("\n\n");
    out.push_str(&percentile_csv(rows)?);
    Ok(out)
}

/// Print every `step`-th row as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], step: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().step_by(step.max(1)).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
