use std::path::PathBuf;

use sleep_model::{CleaningOptions, IntegratedTable, IntegrationMetadata, SleepBins, SourceSchema};
use sleep_transform::{CleaningReport, HarmonizeReport};

/// Inputs of one integration run.
#[derive(Debug, Clone)]
pub struct IntegrateConfig {
    pub cmu_path: PathBuf,
    pub kaggle_path: PathBuf,
    pub output_dir: PathBuf,
    pub bins: SleepBins,
    pub write_source_files: bool,
    pub dry_run: bool,
}

impl IntegrateConfig {
    pub fn new(
        cmu_path: impl Into<PathBuf>,
        kaggle_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cmu_path: cmu_path.into(),
            kaggle_path: kaggle_path.into(),
            output_dir: output_dir.into(),
            bins: SleepBins::default(),
            write_source_files: true,
            dry_run: false,
        }
    }

    pub fn with_bins(mut self, bins: SleepBins) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_source_files(mut self, enable: bool) -> Self {
        self.write_source_files = enable;
        self
    }

    pub fn with_dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }
}

/// Inputs of one cleaning run.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub cmu_path: PathBuf,
    pub kaggle_path: PathBuf,
    pub output_dir: PathBuf,
    pub options: CleaningOptions,
}

/// Files written by the output stage. Empty on a dry run.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub integrated: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub source_files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct IntegrationResult {
    pub output_dir: PathBuf,
    pub table: IntegratedTable,
    pub metadata: IntegrationMetadata,
    pub harmonize_reports: Vec<HarmonizeReport>,
    pub outputs: OutputPaths,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct CleanedSource {
    pub schema: SourceSchema,
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: CleaningReport,
}

#[derive(Debug)]
pub struct CleaningResult {
    pub output_dir: PathBuf,
    pub sources: Vec<CleanedSource>,
    pub report_path: PathBuf,
}
