//! CSV export for synthesized weekly load grids.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::calendar::{DAYS_OF_WEEK, QUARTERS_OF_DAY};
use crate::sim::household::Household;

/// Schema v1 fixed leading columns; one column per appliance plus the
/// household total follows.
pub const FIXED_COLUMNS: &[&str] = &["week", "day", "quarter"];

/// One exported quarter-hour slot.
#[derive(Debug, Clone)]
pub struct LoadRow {
    pub week: usize,
    pub day: usize,
    pub quarter: usize,
    /// Per-appliance load in watts, in column order.
    pub appliance_w: Vec<i64>,
    /// Household total in watts.
    pub total_w: i64,
}

/// Appliance column labels for a household, in export order.
pub fn appliance_columns(household: &Household) -> Vec<String> {
    household
        .appliances()
        .iter()
        .map(|a| a.name().to_string())
        .collect()
}

/// Flattens the household's current week into export rows.
pub fn collect_rows(week: usize, household: &Household) -> Vec<LoadRow> {
    let mut rows = Vec::with_capacity(DAYS_OF_WEEK * QUARTERS_OF_DAY);
    for day in 0..DAYS_OF_WEEK {
        for quarter in 0..QUARTERS_OF_DAY {
            let appliance_w: Vec<i64> = household
                .appliances()
                .iter()
                .map(|a| a.weekly_load()[day][quarter] as i64)
                .collect();
            let total_w = appliance_w.iter().sum();
            rows.push(LoadRow {
                week,
                day,
                quarter,
                appliance_w,
                total_w,
            });
        }
    }
    rows
}

/// Exports load rows to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(columns: &[String], rows: &[LoadRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(columns, rows, buf)
}

/// Writes load rows as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(columns: &[String], rows: &[LoadRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    let header: Vec<&str> = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(columns.iter().map(String::as_str))
        .chain(std::iter::once("total_w"))
        .collect();
    wtr.write_record(&header)?;

    // Data rows
    for r in rows {
        let mut record = vec![
            r.week.to_string(),
            r.day.to_string(),
            r.quarter.to_string(),
        ];
        record.extend(r.appliance_w.iter().map(i64::to_string));
        record.push(r.total_w.to_string());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
