//! Integrity reporter.
//!
//! Builds the [`IntegrationMetadata`] document from the integrated table.
//! Read-only and infallible: an empty table yields null means and zero
//! percentages.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Utc;

use sleep_model::{
    CanonicalField, DataQuality, IntegratedRecord, IntegratedTable, IntegrationMetadata,
    MappingTable, MissingCount, SleepBins, SleepCategory, SourceDatasetSummary, SourceSchema,
    Statistics, SummaryStats,
};
use sleep_transform::HarmonizeReport;

use crate::stats::{mean_std, percentage};

pub const INTEGRATION_METHOD: &str = "Vertical concatenation with source identifier";
pub const SORT_ORDER: &str =
    "sleep_hours ascending, missing values last, ties in CMU-then-Kaggle order";
/// Distribution key for rows without a sleep category.
pub const UNCATEGORIZED_LABEL: &str = "Unknown";

/// Per-source facts the integrated table itself does not carry.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    pub original_file: Option<String>,
    pub dropped_missing_id: usize,
    pub missing_columns: Vec<String>,
}

/// Optional inputs to [`report_with`].
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub bins: SleepBins,
    /// Fixed timestamp; the current time is used when absent.
    pub integration_date: Option<String>,
    pub sources: BTreeMap<SourceSchema, SourceContext>,
}

impl ReportContext {
    pub fn new(bins: SleepBins) -> Self {
        Self {
            bins,
            ..Self::default()
        }
    }

    pub fn with_integration_date(mut self, date: impl Into<String>) -> Self {
        self.integration_date = Some(date.into());
        self
    }

    pub fn with_original_file(mut self, schema: SourceSchema, path: &Path) -> Self {
        self.sources.entry(schema).or_default().original_file = Some(path.display().to_string());
        self
    }

    pub fn with_harmonize_report(mut self, report: &HarmonizeReport) -> Self {
        let source = self.sources.entry(report.schema).or_default();
        source.dropped_missing_id = report.dropped_missing_id;
        source.missing_columns = report.missing_columns.clone();
        self
    }
}

/// Metadata for `table` with default bins and the current time.
pub fn report(table: &IntegratedTable) -> IntegrationMetadata {
    report_with(table, &ReportContext::default())
}

/// Metadata for `table` enriched with per-source diagnostics.
pub fn report_with(table: &IntegratedTable, context: &ReportContext) -> IntegrationMetadata {
    let counts = table.count_by_source();
    let source_datasets = SourceSchema::ALL
        .iter()
        .map(|schema| {
            let source = context.sources.get(schema).cloned().unwrap_or_default();
            let summary = SourceDatasetSummary {
                description: schema.description().to_string(),
                n_students: counts.get(schema).copied().unwrap_or(0),
                original_file: source.original_file,
                unique_variables: MappingTable::for_schema(*schema)
                    .unique_fields()
                    .iter()
                    .map(|field| field.name().to_string())
                    .collect(),
                dropped_missing_id: source.dropped_missing_id,
                missing_columns: source.missing_columns,
            };
            (schema.as_str().to_string(), summary)
        })
        .collect();

    let common_variables = CanonicalField::ALL
        .iter()
        .filter(|field| field.is_common())
        .map(|field| (field.name().to_string(), field.description().to_string()))
        .collect();

    IntegrationMetadata {
        integration_date: context
            .integration_date
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        integration_method: INTEGRATION_METHOD.to_string(),
        sort_order: SORT_ORDER.to_string(),
        source_datasets,
        common_variables,
        transformations_applied: transformations_applied(&context.bins),
        sleep_bins: context.bins.describe(),
        data_quality: data_quality(table),
        statistics: statistics(table),
        sleep_category_distribution: category_distribution(table),
    }
}

fn transformations_applied(bins: &SleepBins) -> Vec<String> {
    let mut notes: Vec<String> = SourceSchema::ALL
        .iter()
        .flat_map(|schema| MappingTable::for_schema(*schema).notes)
        .map(|note| (*note).to_string())
        .collect();
    let prefixes: Vec<String> = SourceSchema::ALL
        .iter()
        .map(|schema| format!("{}_", schema.id_prefix()))
        .collect();
    notes.push(format!(
        "student_id: native identifier prefixed with {}",
        prefixes.join(" / ")
    ));
    notes.push(format!(
        "sleep_category: sleep_hours binned as {}",
        bins.describe().join(", ")
    ));
    notes
}

fn data_quality(table: &IntegratedTable) -> DataQuality {
    let total = table.len();
    let missing_values = CanonicalField::TRACKED
        .iter()
        .map(|field| {
            let count = table
                .iter()
                .filter(|entry| entry.record.is_missing(*field))
                .count();
            (
                field.name().to_string(),
                MissingCount {
                    count,
                    percentage: percentage(count, total),
                },
            )
        })
        .collect();

    let mut seen = BTreeSet::new();
    let duplicate_student_ids = table
        .iter()
        .filter(|entry| !seen.insert(entry.record.student_id.as_str()))
        .count();

    DataQuality {
        total_students: total,
        missing_values,
        duplicate_student_ids,
    }
}

fn summarize(entries: &[&IntegratedRecord]) -> SummaryStats {
    SummaryStats {
        n: entries.len(),
        sleep_hours: mean_std(entries.iter().map(|entry| entry.record.sleep_hours)),
        academic_score: mean_std(entries.iter().map(|entry| entry.record.academic_score)),
    }
}

fn statistics(table: &IntegratedTable) -> Statistics {
    let overall: Vec<&IntegratedRecord> = table.iter().collect();
    Statistics {
        overall: summarize(&overall),
        by_source: SourceSchema::ALL
            .iter()
            .map(|schema| {
                let entries: Vec<&IntegratedRecord> = table.source_records(*schema).collect();
                (schema.as_str().to_string(), summarize(&entries))
            })
            .collect(),
    }
}

fn category_distribution(table: &IntegratedTable) -> BTreeMap<String, usize> {
    let mut distribution: BTreeMap<String, usize> = SleepCategory::ALL
        .iter()
        .map(|category| (category.as_str().to_string(), 0))
        .collect();
    for entry in table.iter() {
        let label = entry
            .record
            .sleep_category
            .map_or(UNCATEGORIZED_LABEL, |category| category.as_str());
        *distribution.entry(label.to_string()).or_insert(0) += 1;
    }
    distribution
}
