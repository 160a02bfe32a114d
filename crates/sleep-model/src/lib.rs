pub mod canonical;
pub mod capability;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod options;
pub mod table;

pub use canonical::{CanonicalField, CanonicalRecord, FieldKind, IntegratedRecord, IntegratedTable};
pub use capability::{SchemaCapabilities, UnresolvedField};
pub use enums::{Gender, SleepCategory, SourceSchema};
pub use error::{ModelError, Result};
pub use mapping::{CompositeTerm, FieldMapping, FieldRule, GenderRule, MappingTable};
pub use metadata::{
    DataQuality, IntegrationMetadata, MeanStd, MissingCount, SourceDatasetSummary, Statistics,
    SummaryStats,
};
pub use options::{CleaningOptions, SleepBins};
pub use table::{CellValue, SourceRecord, SourceTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrated_table_assigns_positions() {
        let table = IntegratedTable::from_ordered(vec![
            CanonicalRecord::new(SourceSchema::Kaggle, "KGL_1"),
            CanonicalRecord::new(SourceSchema::Cmu, "CMU_1"),
        ]);
        let ids: Vec<u64> = table.iter().map(|entry| entry.record_id).collect();
        assert_eq!(ids, vec![1, 2]);
        let counts = table.count_by_source();
        assert_eq!(counts[&SourceSchema::Cmu], 1);
        assert_eq!(counts[&SourceSchema::Kaggle], 1);
    }

    #[test]
    fn metadata_serializes() {
        let metadata = IntegrationMetadata {
            integration_date: "2025-12-01T00:00:00+00:00".to_string(),
            ..IntegrationMetadata::default()
        };
        let json = serde_json::to_string(&metadata).expect("serialize metadata");
        let round: IntegrationMetadata = serde_json::from_str(&json).expect("deserialize metadata");
        assert_eq!(round.integration_date, metadata.integration_date);
    }
}
