//! Cleaning, harmonization and integration of the sleep study sources.

pub mod clean;
pub mod frame;
pub mod harmonize;
pub mod integrate;

pub use clean::{
    Cleaned, CleaningReport, DATASET_SOURCE_COLUMN, SLEEP_OUTLIER_COLUMN, STUDY_OUTLIER_COLUMN,
    clean_source,
};
pub use frame::{RECORD_ID_COLUMN, integrated_frame, output_columns, source_frame};
pub use harmonize::{HarmonizeReport, Harmonized, evaluate, harmonize, harmonize_loaded};
pub use integrate::{compare_sleep_hours, integrate};
