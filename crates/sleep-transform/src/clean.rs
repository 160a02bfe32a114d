//! Per-source cleaning of the raw survey files.
//!
//! Cleaning keeps the native column names so that its output feeds the
//! harmonizer directly. It drops exact duplicate rows and rows failing the
//! source's quality filters, appends outlier flag columns and tags every row
//! with `dataset_source`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use sleep_ingest::{CsvTable, parse_f64};
use sleep_model::{CleaningOptions, SourceSchema};

pub const SLEEP_OUTLIER_COLUMN: &str = "sleep_outlier";
pub const STUDY_OUTLIER_COLUMN: &str = "study_outlier";
pub const DATASET_SOURCE_COLUMN: &str = "dataset_source";

/// Kaggle rows missing any of these are dropped.
pub const KAGGLE_CRITICAL_COLUMNS: [&str; 3] = ["sleep_hours", "study_hours_per_day", "exam_score"];

/// What cleaning did to one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    /// CMU rows below the minimum fraction of nights with data.
    pub low_coverage_removed: usize,
    /// Kaggle rows missing a critical column.
    pub missing_critical_removed: usize,
    /// Rows whose GPA or exam score fell outside the valid range.
    pub out_of_range_removed: usize,
    pub sleep_outliers_flagged: usize,
    pub study_outliers_flagged: usize,
    pub output_rows: usize,
    /// Blank cells per column before any row was removed.
    pub missing_values: BTreeMap<String, usize>,
}

/// Output of [`clean_source`].
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub schema: SourceSchema,
    pub table: CsvTable,
    pub report: CleaningReport,
}

/// Cleans one raw source table.
pub fn clean_source(table: CsvTable, schema: SourceSchema, options: &CleaningOptions) -> Cleaned {
    let mut report = CleaningReport {
        input_rows: table.rows.len(),
        missing_values: missing_values(&table),
        ..CleaningReport::default()
    };
    let mut table = table;

    report.duplicates_removed = dedupe_rows(&mut table);

    match schema {
        SourceSchema::Cmu => {
            report.low_coverage_removed = retain_rows(&mut table, "frac_nights_with_data", |v| {
                v >= options.min_night_fraction
            });
            report.sleep_outliers_flagged =
                flag_rows(&mut table, "TotalSleepTime", SLEEP_OUTLIER_COLUMN, |v| {
                    is_sleep_outlier(v / 60.0, options)
                });
            let (low, high) = options.gpa_range;
            report.out_of_range_removed =
                retain_rows(&mut table, "term_gpa", |v| (low..=high).contains(&v));
        }
        SourceSchema::Kaggle => {
            report.missing_critical_removed = drop_missing_critical(&mut table);
            report.sleep_outliers_flagged =
                flag_rows(&mut table, "sleep_hours", SLEEP_OUTLIER_COLUMN, |v| {
                    is_sleep_outlier(v, options)
                });
            report.study_outliers_flagged = flag_rows(
                &mut table,
                "study_hours_per_day",
                STUDY_OUTLIER_COLUMN,
                |v| v > options.max_study_hours,
            );
            let (low, high) = options.exam_score_range;
            report.out_of_range_removed =
                retain_rows(&mut table, "exam_score", |v| (low..=high).contains(&v));
        }
    }

    set_constant_column(&mut table, DATASET_SOURCE_COLUMN, schema.as_str());
    report.output_rows = table.rows.len();
    info!(
        source = %schema,
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        duplicates = report.duplicates_removed,
        "source cleaned"
    );
    Cleaned {
        schema,
        table,
        report,
    }
}

fn is_sleep_outlier(hours: f64, options: &CleaningOptions) -> bool {
    let (low, high) = options.sleep_outlier_range;
    hours < low || hours > high
}

fn missing_values(table: &CsvTable) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (idx, header) in table.headers.iter().enumerate() {
        let missing = table
            .rows
            .iter()
            .filter(|row| row.get(idx).is_none_or(|cell| cell.is_empty()))
            .count();
        if missing > 0 {
            counts.insert(header.clone(), missing);
        }
    }
    counts
}

/// Removes exact duplicate rows, keeping the first. Returns the count removed.
fn dedupe_rows(table: &mut CsvTable) -> usize {
    let before = table.rows.len();
    let mut seen = BTreeSet::new();
    table.rows.retain(|row| seen.insert(row.clone()));
    before - table.rows.len()
}

/// Keeps rows whose numeric `column` satisfies `keep`; blank or non-numeric
/// values are removed. No-op when the column is absent.
fn retain_rows(table: &mut CsvTable, column: &str, keep: impl Fn(f64) -> bool) -> usize {
    let Some(idx) = table.column_index(column) else {
        debug!(column, "filter column absent; filter skipped");
        return 0;
    };
    let before = table.rows.len();
    table
        .rows
        .retain(|row| row.get(idx).and_then(|cell| parse_f64(cell)).is_some_and(&keep));
    before - table.rows.len()
}

fn drop_missing_critical(table: &mut CsvTable) -> usize {
    let indexes: Vec<usize> = KAGGLE_CRITICAL_COLUMNS
        .iter()
        .filter_map(|column| table.column_index(column))
        .collect();
    let before = table.rows.len();
    table.rows.retain(|row| {
        indexes
            .iter()
            .all(|idx| row.get(*idx).is_some_and(|cell| !cell.is_empty()))
    });
    before - table.rows.len()
}

/// Writes a 0/1 flag column from `source`. Blank values are not flagged.
/// Returns the number of flagged rows; absent source columns add no flag.
fn flag_rows(
    table: &mut CsvTable,
    source: &str,
    flag: &str,
    is_flagged: impl Fn(f64) -> bool,
) -> usize {
    let Some(idx) = table.column_index(source) else {
        debug!(column = source, flag, "flag source column absent");
        return 0;
    };
    let flags: Vec<bool> = table
        .rows
        .iter()
        .map(|row| {
            row.get(idx)
                .and_then(|cell| parse_f64(cell))
                .is_some_and(&is_flagged)
        })
        .collect();
    let flagged = flags.iter().filter(|hit| **hit).count();
    let values = flags
        .into_iter()
        .map(|hit| String::from(if hit { "1" } else { "0" }));
    set_column(table, flag, values);
    flagged
}

fn set_constant_column(table: &mut CsvTable, name: &str, value: &str) {
    let values: Vec<String> = table.rows.iter().map(|_| value.to_string()).collect();
    set_column(table, name, values);
}

/// Replaces `name` if present, otherwise appends it.
fn set_column(table: &mut CsvTable, name: &str, values: impl IntoIterator<Item = String>) {
    let idx = match table.column_index(name) {
        Some(idx) => idx,
        None => {
            table.headers.push(name.to_string());
            table.headers.len() - 1
        }
    };
    for (row, value) in table.rows.iter_mut().zip(values) {
        if row.len() <= idx {
            row.resize(idx + 1, String::new());
        }
        row[idx] = value;
    }
}
