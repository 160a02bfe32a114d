use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use sleep_model::{
    CanonicalField, CanonicalRecord, CellValue, Gender, SchemaCapabilities, SleepBins,
    SleepCategory, SourceRecord, SourceSchema, SourceTable,
};
use sleep_transform::{harmonize, integrate};

fn source_table(schema: SourceSchema, columns: &[&str], rows: &[Vec<String>]) -> SourceTable {
    let mut table = SourceTable::new(schema, columns.iter().map(|c| (*c).to_string()).collect());
    for (idx, row) in rows.iter().enumerate() {
        let cells: BTreeMap<String, CellValue> = columns
            .iter()
            .zip(row)
            .map(|(name, value)| ((*name).to_string(), CellValue::from_raw(value)))
            .collect();
        table.push_row(SourceRecord {
            line: idx as u64 + 1,
            cells,
        });
    }
    table
}

fn harmonize_all(table: &SourceTable) -> Vec<CanonicalRecord> {
    let caps = SchemaCapabilities::resolve(table.schema, &table.columns);
    harmonize(table, &caps, &SleepBins::default()).records
}

const CMU_COLUMNS: [&str; 4] = ["subject_id", "TotalSleepTime", "term_gpa", "demo_gender"];
const KAGGLE_COLUMNS: [&str; 4] = ["student_id", "sleep_hours", "exam_score", "gender"];

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn two_source_scenario() {
    let cmu = source_table(
        SourceSchema::Cmu,
        &CMU_COLUMNS,
        &[row(&["S1", "480", "3.6", "1"])],
    );
    let kaggle = source_table(
        SourceSchema::Kaggle,
        &KAGGLE_COLUMNS,
        &[row(&["42", "6.5", "78", "Male"])],
    );
    let table = integrate(harmonize_all(&cmu), harmonize_all(&kaggle));
    assert_eq!(table.len(), 2);

    let first = &table.records()[0];
    assert_eq!(first.record_id, 1);
    assert_eq!(first.record.student_id, "KGL_42");
    assert_eq!(first.record.sleep_hours, Some(6.5));
    assert_eq!(first.record.academic_score, Some(78.0));
    assert_eq!(first.record.gender, Gender::Male);
    assert_eq!(first.record.sleep_category, Some(SleepCategory::Insufficient));

    let second = &table.records()[1];
    assert_eq!(second.record_id, 2);
    assert_eq!(second.record.student_id, "CMU_S1");
    assert_eq!(second.record.dataset_source, SourceSchema::Cmu);
    assert_eq!(second.record.sleep_hours, Some(8.0));
    assert_eq!(second.record.academic_score, Some(90.0));
    assert_eq!(second.record.gender, Gender::Female);
    assert_eq!(second.record.sleep_category, Some(SleepCategory::Optimal));
    assert!(second.record.is_missing(CanonicalField::Age));
    assert!(first.record.is_missing(CanonicalField::CumulativeGpa));
}

#[test]
fn bin_boundaries_follow_half_open_partition() {
    let rows: Vec<Vec<String>> = ["6.0", "7.0", "8.0", "12.0"]
        .iter()
        .enumerate()
        .map(|(idx, hours)| {
            let id = idx.to_string();
            row(&[id.as_str(), *hours, "", ""])
        })
        .collect();
    let kaggle = source_table(SourceSchema::Kaggle, &KAGGLE_COLUMNS, &rows);
    let categories: Vec<Option<SleepCategory>> = harmonize_all(&kaggle)
        .iter()
        .map(|record| record.sleep_category)
        .collect();
    assert_eq!(
        categories,
        vec![
            Some(SleepCategory::Insufficient),
            Some(SleepCategory::Adequate),
            Some(SleepCategory::Optimal),
            None,
        ]
    );
}

#[test]
fn null_sleep_sorts_last() {
    let cmu = source_table(
        SourceSchema::Cmu,
        &CMU_COLUMNS,
        &[row(&["A", "", "3.0", "0"]), row(&["B", "300", "3.0", "0"])],
    );
    let kaggle = source_table(
        SourceSchema::Kaggle,
        &KAGGLE_COLUMNS,
        &[row(&["1", "9", "50", "Female"])],
    );
    let table = integrate(harmonize_all(&cmu), harmonize_all(&kaggle));
    let ids: Vec<&str> = table
        .iter()
        .map(|entry| entry.record.student_id.as_str())
        .collect();
    assert_eq!(ids, vec!["CMU_B", "KGL_1", "CMU_A"]);
    let last = &table.records()[2].record;
    assert_eq!(last.sleep_category, None);
    assert_eq!(last.academic_score, Some(75.0));
}

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (0u32..1000).prop_map(|v| v.to_string()),
        (0.0f64..14.0).prop_map(|v| format!("{v:.2}")),
    ]
}

fn kaggle_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        (cell(), cell(), prop_oneof![Just("Male"), Just("Female"), Just("Other")]),
        0..25,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (sleep, score, gender))| {
                vec![format!("S{idx}"), sleep, score, gender.to_string()]
            })
            .collect()
    })
}

fn cmu_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec((cell(), cell(), 0u8..3), 0..25).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (minutes, gpa, code))| vec![format!("{idx}"), minutes, gpa, code.to_string()])
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_integration_is_append_only_and_deterministic(cmu in cmu_rows(), kaggle in kaggle_rows()) {
        let cmu_table = source_table(SourceSchema::Cmu, &CMU_COLUMNS, &cmu);
        let kaggle_table = source_table(SourceSchema::Kaggle, &KAGGLE_COLUMNS, &kaggle);

        let first = integrate(harmonize_all(&cmu_table), harmonize_all(&kaggle_table));
        let second = integrate(harmonize_all(&cmu_table), harmonize_all(&kaggle_table));
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), cmu.len() + kaggle.len());

        let counts = first.count_by_source();
        prop_assert_eq!(counts[&SourceSchema::Cmu], cmu.len());
        prop_assert_eq!(counts[&SourceSchema::Kaggle], kaggle.len());

        for (idx, entry) in first.iter().enumerate() {
            prop_assert_eq!(entry.record_id, idx as u64 + 1);
            let prefix = format!("{}_", entry.record.dataset_source.id_prefix());
            prop_assert!(entry.record.student_id.starts_with(&prefix));
            prop_assert!(entry.record.student_id.len() > prefix.len());
        }

        let ids: BTreeSet<&str> = first
            .iter()
            .map(|entry| entry.record.student_id.as_str())
            .collect();
        prop_assert_eq!(ids.len(), first.len());
    }

    #[test]
    fn prop_sleep_hours_non_decreasing_with_nulls_last(cmu in cmu_rows(), kaggle in kaggle_rows()) {
        let cmu_table = source_table(SourceSchema::Cmu, &CMU_COLUMNS, &cmu);
        let kaggle_table = source_table(SourceSchema::Kaggle, &KAGGLE_COLUMNS, &kaggle);
        let table = integrate(harmonize_all(&cmu_table), harmonize_all(&kaggle_table));

        let hours: Vec<Option<f64>> = table.iter().map(|entry| entry.record.sleep_hours).collect();
        let first_null = hours.iter().position(Option::is_none).unwrap_or(hours.len());
        prop_assert!(hours[first_null..].iter().all(Option::is_none));
        for pair in hours[..first_null].windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn prop_category_matches_sleep_hours(kaggle in kaggle_rows()) {
        let kaggle_table = source_table(SourceSchema::Kaggle, &KAGGLE_COLUMNS, &kaggle);
        let bins = SleepBins::default();
        for record in harmonize_all(&kaggle_table) {
            let expected = record.sleep_hours.and_then(|hours| bins.categorize(hours));
            prop_assert_eq!(record.sleep_category, expected);
            if let Some(score) = record.academic_score {
                prop_assert!(score.is_finite());
            }
        }
    }
}
