use std::fs;

use sleep_ingest::CsvTable;
use sleep_model::{
    CanonicalRecord, CleaningOptions, Gender, IntegratedTable, SleepCategory, SourceSchema,
};
use sleep_report::{
    ReportContext, cleaned_file_name, enhanced_file_name, report_with, write_cleaned_csv,
    write_cleaning_report_json, write_integrated_csv, write_metadata_json, write_source_files,
};
use sleep_transform::CleaningReport;
use tempfile::TempDir;

fn sample_table() -> IntegratedTable {
    let mut kaggle = CanonicalRecord::new(SourceSchema::Kaggle, "KGL_42");
    kaggle.sleep_hours = Some(6.5);
    kaggle.academic_score = Some(78.0);
    kaggle.set_gender(Gender::Male);
    kaggle.sleep_category = Some(SleepCategory::Insufficient);
    let mut cmu = CanonicalRecord::new(SourceSchema::Cmu, "CMU_S1");
    cmu.sleep_hours = Some(8.0);
    cmu.academic_score = Some(90.0);
    cmu.set_gender(Gender::Female);
    cmu.sleep_category = Some(SleepCategory::Optimal);
    IntegratedTable::from_ordered(vec![kaggle, cmu])
}

#[test]
fn integrated_csv_has_canonical_header_and_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_integrated_csv(&sample_table(), dir.path()).expect("write csv");
    let contents = fs::read_to_string(&path).expect("read csv");
    let mut lines = contents.lines();
    insta::assert_snapshot!(
        lines.next().unwrap_or_default(),
        @"record_id,student_id,dataset_source,sleep_hours,academic_score,gender,sleep_category,age,bedtime_variability,bedtime_consistency,daytime_sleep_minutes,cumulative_gpa,study_hours_per_day,attendance_percentage,mental_health_rating,distraction_hours,productivity_score,study_efficiency"
    );
    let first = lines.next().expect("first row");
    assert!(first.starts_with("1,KGL_42,Kaggle,6.5,78"), "{first}");
    assert!(first.contains("Male,Insufficient"), "{first}");
    let second = lines.next().expect("second row");
    assert!(second.starts_with("2,CMU_S1,CMU,8"), "{second}");
    assert!(lines.next().is_none());
}

#[test]
fn source_files_split_rows_by_provenance() {
    let dir = TempDir::new().expect("temp dir");
    let written = write_source_files(&sample_table(), dir.path()).expect("write files");
    assert_eq!(written.len(), 2);
    let cmu = fs::read_to_string(dir.path().join(enhanced_file_name(SourceSchema::Cmu)))
        .expect("read cmu");
    assert_eq!(cmu.lines().count(), 2);
    assert!(cmu.lines().nth(1).is_some_and(|line| line.starts_with("2,CMU_S1")));
    let kaggle = fs::read_to_string(dir.path().join(enhanced_file_name(SourceSchema::Kaggle)))
        .expect("read kaggle");
    assert!(kaggle.lines().nth(1).is_some_and(|line| line.starts_with("1,KGL_42")));
}

#[test]
fn metadata_json_is_written_with_trailing_newline() {
    let dir = TempDir::new().expect("temp dir");
    let context = ReportContext::default().with_integration_date("2025-06-01T12:00:00+00:00");
    let metadata = report_with(&sample_table(), &context);
    let path = write_metadata_json(&metadata, &dir.path().join("nested")).expect("write json");
    let contents = fs::read_to_string(&path).expect("read json");
    assert!(contents.ends_with("}\n"));

    let value: serde_json::Value = serde_json::from_str(&contents).expect("parse json");
    assert_eq!(value["integration_date"], "2025-06-01T12:00:00+00:00");
    assert_eq!(value["data_quality"]["total_students"], 2);
    assert_eq!(value["source_datasets"]["CMU"]["n_students"], 1);
    assert_eq!(value["sleep_category_distribution"]["Optimal"], 1);
    assert_eq!(value["statistics"]["overall"]["sleep_hours"]["mean"], 7.25);
}

#[test]
fn cleaned_outputs_round_trip_native_columns() {
    let dir = TempDir::new().expect("temp dir");
    let table = CsvTable {
        headers: vec!["student_id".to_string(), "sleep_hours".to_string()],
        rows: vec![
            vec!["S1".to_string(), "7".to_string()],
            vec!["S2".to_string(), String::new()],
        ],
    };
    let path = dir.path().join(cleaned_file_name(SourceSchema::Kaggle));
    write_cleaned_csv(&table, &path).expect("write cleaned");
    let contents = fs::read_to_string(&path).expect("read cleaned");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "student_id,sleep_hours");
    assert_eq!(lines[1], "S1,7");
    assert!(lines[2].starts_with("S2,"));

    let report = CleaningReport {
        input_rows: 3,
        duplicates_removed: 1,
        output_rows: 2,
        ..CleaningReport::default()
    };
    let path = write_cleaning_report_json(
        &[(SourceSchema::Kaggle, &report)],
        &CleaningOptions::default(),
        dir.path(),
    )
    .expect("write report");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).expect("read report")).expect("parse");
    assert_eq!(value["sources"]["Kaggle"]["duplicates_removed"], 1);
    assert_eq!(value["options"]["min_night_fraction"], 0.5);
}
