use sleep_model::{
    CanonicalField, CanonicalRecord, FieldKind, Gender, IntegratedTable, SourceSchema,
};

#[test]
fn numeric_accessors_cover_every_numeric_field() {
    let mut record = CanonicalRecord::new(SourceSchema::Kaggle, "KGL_1");
    for field in CanonicalField::ALL {
        match field.kind() {
            FieldKind::Numeric => {
                assert!(record.set_numeric(field, Some(1.5)), "{field} not settable");
                assert_eq!(record.numeric(field), Some(1.5));
            }
            FieldKind::Text => {
                assert!(!record.set_numeric(field, Some(1.5)));
                assert_eq!(record.numeric(field), None);
            }
        }
    }
}

#[test]
fn fresh_record_is_missing_everything_but_identity() {
    let record = CanonicalRecord::new(SourceSchema::Cmu, "CMU_S1");
    assert_eq!(record.gender, Gender::Unknown);
    assert!(!record.is_missing(CanonicalField::StudentId));
    assert!(!record.is_missing(CanonicalField::DatasetSource));
    for field in CanonicalField::TRACKED {
        assert!(record.is_missing(field), "{field} should start missing");
    }
}

#[test]
fn column_names_are_unique() {
    let mut names: Vec<&str> = CanonicalField::ALL.iter().map(|field| field.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), CanonicalField::ALL.len());
}

#[test]
fn source_records_filters_by_provenance() {
    let table = IntegratedTable::from_ordered(vec![
        CanonicalRecord::new(SourceSchema::Cmu, "CMU_1"),
        CanonicalRecord::new(SourceSchema::Kaggle, "KGL_1"),
        CanonicalRecord::new(SourceSchema::Cmu, "CMU_2"),
    ]);
    let cmu: Vec<u64> = table
        .source_records(SourceSchema::Cmu)
        .map(|entry| entry.record_id)
        .collect();
    assert_eq!(cmu, vec![1, 3]);
    assert!(IntegratedTable::default().is_empty());
}
