//! Integration metadata document.
//!
//! Serialized as the JSON document written next to the integrated table.
//! Every value is derived from the integrated table and the harmonization
//! diagnostics; nothing here is mutated after the report is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of one numeric column.
///
/// Both are `None` when undefined (no values, or fewer than two for `std`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub n: usize,
    pub sleep_hours: MeanStd,
    pub academic_score: MeanStd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub overall: SummaryStats,
    /// Keyed by provenance label (`CMU`, `Kaggle`).
    pub by_source: BTreeMap<String, SummaryStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingCount {
    pub count: usize,
    /// Share of all rows in percent; 0 on an empty table.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub total_students: usize,
    /// Keyed by canonical column name.
    pub missing_values: BTreeMap<String, MissingCount>,
    /// Rows whose `student_id` repeats an earlier row.
    pub duplicate_student_ids: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDatasetSummary {
    pub description: String,
    pub n_students: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file: Option<String>,
    pub unique_variables: Vec<String>,
    /// Rows dropped because the native identifier was blank or absent.
    pub dropped_missing_id: usize,
    /// Mapped native columns the file did not provide.
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationMetadata {
    /// RFC 3339 timestamp of the run.
    pub integration_date: String,
    pub integration_method: String,
    pub sort_order: String,
    /// Keyed by provenance label (`CMU`, `Kaggle`).
    pub source_datasets: BTreeMap<String, SourceDatasetSummary>,
    /// Keyed by canonical column name.
    pub common_variables: BTreeMap<String, String>,
    pub transformations_applied: Vec<String>,
    pub sleep_bins: Vec<String>,
    pub data_quality: DataQuality,
    pub statistics: Statistics,
    /// Keyed by category label; rows without a category count as `Unknown`.
    pub sleep_category_distribution: BTreeMap<String, usize>,
}
