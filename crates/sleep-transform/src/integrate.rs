//! Vertical integration of harmonized sources.

use std::cmp::Ordering;

use tracing::{debug, warn};

use sleep_model::{CanonicalRecord, IntegratedTable, SourceSchema};

/// Concatenates the CMU block before the Kaggle block, then stable-sorts by
/// `sleep_hours` ascending with nulls last.
///
/// No row is filtered, merged or rewritten here; equal sleep hours keep their
/// concatenation order and `record_id` follows the final position.
pub fn integrate(cmu: Vec<CanonicalRecord>, kaggle: Vec<CanonicalRecord>) -> IntegratedTable {
    for (schema, records) in [(SourceSchema::Cmu, &cmu), (SourceSchema::Kaggle, &kaggle)] {
        if records.is_empty() {
            warn!(source = %schema, "source contributed no rows");
        }
        if let Some(stray) = records
            .iter()
            .find(|record| record.dataset_source != schema)
        {
            warn!(
                expected = %schema,
                found = %stray.dataset_source,
                student_id = %stray.student_id,
                "record tagged with a different source"
            );
        }
    }

    let mut combined = Vec::with_capacity(cmu.len() + kaggle.len());
    combined.extend(cmu);
    combined.extend(kaggle);
    combined.sort_by(compare_sleep_hours);

    let table = IntegratedTable::from_ordered(combined);
    debug!(rows = table.len(), "sources integrated");
    table
}

/// Ascending by `sleep_hours`, nulls after every value.
pub fn compare_sleep_hours(left: &CanonicalRecord, right: &CanonicalRecord) -> Ordering {
    match (left.sleep_hours, right.sleep_hours) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(schema: SourceSchema, id: &str, hours: Option<f64>) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(schema, schema.student_id(id));
        record.sleep_hours = hours;
        record
    }

    #[test]
    fn sorts_with_nulls_last_and_ties_in_concatenation_order() {
        let cmu = vec![
            record(SourceSchema::Cmu, "a", None),
            record(SourceSchema::Cmu, "b", Some(7.0)),
        ];
        let kaggle = vec![
            record(SourceSchema::Kaggle, "c", Some(7.0)),
            record(SourceSchema::Kaggle, "d", Some(5.0)),
            record(SourceSchema::Kaggle, "e", None),
        ];
        let table = integrate(cmu, kaggle);
        let ids: Vec<(u64, &str)> = table
            .iter()
            .map(|entry| (entry.record_id, entry.record.student_id.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (1, "KGL_d"),
                (2, "CMU_b"),
                (3, "KGL_c"),
                (4, "CMU_a"),
                (5, "KGL_e"),
            ]
        );
    }

    #[test]
    fn empty_sources_give_empty_table() {
        let table = integrate(Vec::new(), Vec::new());
        assert!(table.is_empty());
    }
}
