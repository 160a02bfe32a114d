//! Output writers for the integrated table, per-source files and JSON reports.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::{Column, CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::Serialize;
use tracing::debug;

use sleep_ingest::CsvTable;
use sleep_model::{CleaningOptions, IntegratedTable, IntegrationMetadata, SourceSchema};
use sleep_transform::{CleaningReport, integrated_frame, source_frame};

pub const INTEGRATED_FILE_NAME: &str = "integrated_data.csv";
pub const METADATA_FILE_NAME: &str = "integration_metadata.json";
pub const CLEANING_REPORT_FILE_NAME: &str = "cleaning_report.json";

/// Per-source slice of the integrated table.
pub fn enhanced_file_name(schema: SourceSchema) -> &'static str {
    match schema {
        SourceSchema::Cmu => "cmu_enhanced.csv",
        SourceSchema::Kaggle => "kaggle_enhanced.csv",
    }
}

/// Cleaned source file, also the default integration input.
pub fn cleaned_file_name(schema: SourceSchema) -> &'static str {
    match schema {
        SourceSchema::Cmu => "cleaned_cmu-sleep.csv",
        SourceSchema::Kaggle => "cleaned_student_habits.csv",
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `df` as a headed CSV file.
pub fn write_frame_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), rows = df.height(), "csv written");
    Ok(())
}

/// Writes the integrated table to `output_dir/integrated_data.csv`.
pub fn write_integrated_csv(table: &IntegratedTable, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(INTEGRATED_FILE_NAME);
    let mut df = integrated_frame(table).context("build integrated frame")?;
    write_frame_csv(&mut df, &path)?;
    Ok(path)
}

/// Writes one enhanced file per source, in [`SourceSchema::ALL`] order.
pub fn write_source_files(table: &IntegratedTable, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(SourceSchema::ALL.len());
    for schema in SourceSchema::ALL {
        let path = output_dir.join(enhanced_file_name(schema));
        let mut df = source_frame(table, schema)
            .with_context(|| format!("build {schema} frame"))?;
        write_frame_csv(&mut df, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "json written");
    Ok(())
}

/// Writes the metadata document to `output_dir/integration_metadata.json`.
pub fn write_metadata_json(metadata: &IntegrationMetadata, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(METADATA_FILE_NAME);
    write_json(metadata, &path)?;
    Ok(path)
}

/// Writes a cleaned source table with its native column names.
pub fn write_cleaned_csv(table: &CsvTable, path: &Path) -> Result<()> {
    let columns: Vec<Column> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let values: Vec<&str> = table
                .rows
                .iter()
                .map(|row| row.get(idx).map_or("", String::as_str))
                .collect();
            Series::new(header.as_str().into(), values).into()
        })
        .collect();
    let mut df = DataFrame::new(columns).context("build cleaned frame")?;
    write_frame_csv(&mut df, path)
}

#[derive(Debug, Serialize)]
struct CleaningReportPayload<'a> {
    generated_at: String,
    options: &'a CleaningOptions,
    sources: BTreeMap<String, &'a CleaningReport>,
}

/// Writes `output_dir/cleaning_report.json`.
pub fn write_cleaning_report_json(
    reports: &[(SourceSchema, &CleaningReport)],
    options: &CleaningOptions,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = output_dir.join(CLEANING_REPORT_FILE_NAME);
    let payload = CleaningReportPayload {
        generated_at: Utc::now().to_rfc3339(),
        options,
        sources: reports
            .iter()
            .map(|(schema, report)| (schema.as_str().to_string(), *report))
            .collect(),
    };
    write_json(&payload, &path)?;
    Ok(path)
}
