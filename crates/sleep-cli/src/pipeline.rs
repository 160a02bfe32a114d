//! Integration pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Check both inputs exist, read them, resolve capabilities
//! 2. **Harmonize**: Map each source onto the canonical schema
//! 3. **Integrate**: Concatenate, sort and number the rows
//! 4. **Report**: Build the integration metadata
//! 5. **Output**: Write the integrated table, per-source files and metadata
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! A missing input fails the ingest stage before anything is written.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use sleep_ingest::{LoadedSource, ensure_inputs_exist, load_source, read_csv_table};
use sleep_model::{IntegratedTable, IntegrationMetadata, SleepBins, SourceSchema};
use sleep_report::{
    ReportContext, cleaned_file_name, report_with, write_cleaned_csv, write_cleaning_report_json,
    write_integrated_csv, write_metadata_json, write_source_files,
};
use sleep_transform::{Harmonized, HarmonizeReport, clean_source, harmonize_loaded, integrate};

use crate::types::{
    CleanConfig, CleanedSource, CleaningResult, IntegrateConfig, IntegrationResult, OutputPaths,
};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub cmu: LoadedSource,
    pub kaggle: LoadedSource,
}

/// Checks both inputs exist, then loads each as its source schema.
pub fn ingest(cmu_path: &Path, kaggle_path: &Path) -> Result<IngestResult> {
    ensure_inputs_exist([cmu_path, kaggle_path])?;
    let cmu = load_source(cmu_path, SourceSchema::Cmu)?;
    let kaggle = load_source(kaggle_path, SourceSchema::Kaggle)?;
    Ok(IngestResult { cmu, kaggle })
}

// ============================================================================
// Stage 2: Harmonize
// ============================================================================

/// Result of the harmonize stage.
#[derive(Debug)]
pub struct HarmonizeResult {
    pub cmu: Harmonized,
    pub kaggle: Harmonized,
}

impl HarmonizeResult {
    pub fn reports(&self) -> Vec<HarmonizeReport> {
        vec![self.cmu.report.clone(), self.kaggle.report.clone()]
    }
}

pub fn harmonize_sources(ingest: &IngestResult, bins: &SleepBins) -> HarmonizeResult {
    HarmonizeResult {
        cmu: harmonize_loaded(&ingest.cmu, bins),
        kaggle: harmonize_loaded(&ingest.kaggle, bins),
    }
}

// ============================================================================
// Stage 3: Integrate
// ============================================================================

pub fn integrate_sources(harmonized: HarmonizeResult) -> IntegratedTable {
    integrate(harmonized.cmu.records, harmonized.kaggle.records)
}

// ============================================================================
// Stage 4: Report
// ============================================================================

pub fn build_metadata(
    table: &IntegratedTable,
    ingest: &IngestResult,
    reports: &[HarmonizeReport],
    bins: &SleepBins,
) -> IntegrationMetadata {
    let mut context = ReportContext::new(*bins)
        .with_original_file(SourceSchema::Cmu, &ingest.cmu.path)
        .with_original_file(SourceSchema::Kaggle, &ingest.kaggle.path);
    for report in reports {
        context = context.with_harmonize_report(report);
    }
    report_with(table, &context)
}

// ============================================================================
// Stage 5: Output
// ============================================================================

/// Writes the integrated table first and the metadata document last.
pub fn output(
    table: &IntegratedTable,
    metadata: &IntegrationMetadata,
    config: &IntegrateConfig,
) -> Result<OutputPaths> {
    if config.dry_run {
        info!("dry run; no files written");
        return Ok(OutputPaths::default());
    }
    let output_dir = &config.output_dir;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let integrated = write_integrated_csv(table, output_dir)?;
    let source_files = if config.write_source_files {
        write_source_files(table, output_dir)?
    } else {
        Vec::new()
    };
    let metadata = write_metadata_json(metadata, output_dir)?;
    Ok(OutputPaths {
        integrated: Some(integrated),
        metadata: Some(metadata),
        source_files,
    })
}

/// Runs every integration stage.
pub fn run_integration(config: &IntegrateConfig) -> Result<IntegrationResult> {
    let run_span = info_span!("integrate", output_dir = %config.output_dir.display());
    let _run_guard = run_span.enter();

    let ingest_span = info_span!(
        "ingest",
        cmu = %config.cmu_path.display(),
        kaggle = %config.kaggle_path.display()
    );
    let ingest_start = Instant::now();
    let ingested = ingest_span.in_scope(|| ingest(&config.cmu_path, &config.kaggle_path))?;
    info!(
        cmu_rows = ingested.cmu.table.len(),
        kaggle_rows = ingested.kaggle.table.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let harmonize_start = Instant::now();
    let harmonized =
        info_span!("harmonize").in_scope(|| harmonize_sources(&ingested, &config.bins));
    let harmonize_reports = harmonized.reports();
    info!(
        cmu_records = harmonized.cmu.records.len(),
        kaggle_records = harmonized.kaggle.records.len(),
        duration_ms = harmonize_start.elapsed().as_millis(),
        "harmonize complete"
    );

    let integrate_start = Instant::now();
    let table = info_span!("integrate_rows").in_scope(|| integrate_sources(harmonized));
    info!(
        rows = table.len(),
        duration_ms = integrate_start.elapsed().as_millis(),
        "integrate complete"
    );

    let report_start = Instant::now();
    let metadata = info_span!("report").in_scope(|| {
        build_metadata(&table, &ingested, &harmonize_reports, &config.bins)
    });
    info!(
        missing_ids = harmonize_reports
            .iter()
            .map(|report| report.dropped_missing_id)
            .sum::<usize>(),
        duration_ms = report_start.elapsed().as_millis(),
        "report complete"
    );

    let output_start = Instant::now();
    let outputs = info_span!("output").in_scope(|| output(&table, &metadata, config))?;
    info!(
        files = outputs.source_files.len() + usize::from(outputs.integrated.is_some()),
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );

    Ok(IntegrationResult {
        output_dir: config.output_dir.clone(),
        table,
        metadata,
        harmonize_reports,
        outputs,
        dry_run: config.dry_run,
    })
}

/// Cleans both raw sources and writes the cleaned files with their report.
pub fn run_cleaning(config: &CleanConfig) -> Result<CleaningResult> {
    let run_span = info_span!("clean", output_dir = %config.output_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    ensure_inputs_exist([config.cmu_path.as_path(), config.kaggle_path.as_path()])?;
    let mut cleaned = Vec::with_capacity(2);
    for (schema, path) in [
        (SourceSchema::Cmu, &config.cmu_path),
        (SourceSchema::Kaggle, &config.kaggle_path),
    ] {
        let table = read_csv_table(path)?;
        let result = info_span!("clean_source", source = %schema)
            .in_scope(|| clean_source(table, schema, &config.options));
        cleaned.push((path.clone(), result));
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("create output directory {}", config.output_dir.display()))?;
    let mut sources = Vec::with_capacity(cleaned.len());
    for (input, result) in cleaned {
        let output = config.output_dir.join(cleaned_file_name(result.schema));
        write_cleaned_csv(&result.table, &output)?;
        sources.push(CleanedSource {
            schema: result.schema,
            input,
            output,
            report: result.report,
        });
    }
    let reports: Vec<_> = sources
        .iter()
        .map(|source| (source.schema, &source.report))
        .collect();
    let report_path = write_cleaning_report_json(&reports, &config.options, &config.output_dir)?;
    info!(
        sources = sources.len(),
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );

    Ok(CleaningResult {
        output_dir: config.output_dir.clone(),
        sources,
        report_path,
    })
}
