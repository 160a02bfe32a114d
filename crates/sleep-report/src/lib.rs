//! Integrity report and output writers for the integrated sleep table.
//!
//! - **Integrity report**: counts, missingness and descriptive statistics as
//!   an [`IntegrationMetadata`](sleep_model::IntegrationMetadata) document
//! - **CSV**: integrated table, per-source enhanced files and cleaned sources
//! - **JSON**: integration metadata and the cleaning report

mod integrity;
mod stats;
mod writer;

pub use integrity::{
    INTEGRATION_METHOD, ReportContext, SORT_ORDER, SourceContext, UNCATEGORIZED_LABEL, report,
    report_with,
};
pub use stats::{mean_std, percentage};
pub use writer::{
    CLEANING_REPORT_FILE_NAME, INTEGRATED_FILE_NAME, METADATA_FILE_NAME, cleaned_file_name,
    enhanced_file_name, write_cleaned_csv, write_cleaning_report_json, write_frame_csv,
    write_integrated_csv, write_metadata_json, write_source_files,
};
