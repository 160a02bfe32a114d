//! Schema capability check.
//!
//! Resolves a [`MappingTable`] against the header of a loaded file once, so
//! the harmonizer never re-checks column presence per row.

use serde::Serialize;

use crate::canonical::CanonicalField;
use crate::enums::SourceSchema;
use crate::mapping::{FieldMapping, GenderRule, MappingTable};

/// A mapped field that cannot be produced for this source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedField {
    pub field: CanonicalField,
    /// Native columns absent from the file.
    pub missing_columns: Vec<String>,
    /// Canonical inputs that are themselves unresolved.
    pub missing_dependencies: Vec<CanonicalField>,
}

/// The fully resolved field set of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCapabilities {
    pub mapping: MappingTable,
    /// False when the native identifier column is absent; every row will drop.
    pub has_identifier: bool,
    /// Gender rule, or `None` when its column is absent.
    pub gender: Option<GenderRule>,
    /// Mappings that can be evaluated, in table order.
    pub resolved: Vec<FieldMapping>,
    pub unresolved: Vec<UnresolvedField>,
}

impl SchemaCapabilities {
    /// Checks `columns` (the file header) against the mapping for `schema`.
    pub fn resolve(schema: SourceSchema, columns: &[String]) -> Self {
        let mapping = MappingTable::for_schema(schema);
        let present = |name: &str| columns.iter().any(|column| column == name);

        let has_identifier = present(mapping.id_column);
        let gender = present(mapping.gender.column()).then_some(mapping.gender);

        let mut resolved: Vec<FieldMapping> = Vec::new();
        let mut unresolved = Vec::new();
        for field_mapping in mapping.fields {
            let missing_columns: Vec<String> = field_mapping
                .rule
                .source_columns()
                .into_iter()
                .filter(|column| !present(*column))
                .map(str::to_string)
                .collect();
            let missing_dependencies: Vec<CanonicalField> = field_mapping
                .rule
                .dependencies()
                .into_iter()
                .filter(|dependency| !resolved.iter().any(|done| done.field == *dependency))
                .collect();
            if missing_columns.is_empty() && missing_dependencies.is_empty() {
                resolved.push(*field_mapping);
            } else {
                unresolved.push(UnresolvedField {
                    field: field_mapping.field,
                    missing_columns,
                    missing_dependencies,
                });
            }
        }

        Self {
            mapping,
            has_identifier,
            gender,
            resolved,
            unresolved,
        }
    }

    pub fn schema(&self) -> SourceSchema {
        self.mapping.schema
    }

    pub fn is_resolved(&self, field: CanonicalField) -> bool {
        self.resolved.iter().any(|mapping| mapping.field == field)
    }

    /// Every referenced native column absent from the file, sorted and deduplicated.
    pub fn missing_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .unresolved
            .iter()
            .flat_map(|field| field.missing_columns.iter().cloned())
            .collect();
        if !self.has_identifier {
            columns.push(self.mapping.id_column.to_string());
        }
        if self.gender.is_none() {
            columns.push(self.mapping.gender.column().to_string());
        }
        columns.sort();
        columns.dedup();
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn full_cmu_header_resolves_everything() {
        let columns = header(&[
            "subject_id",
            "TotalSleepTime",
            "term_gpa",
            "demo_gender",
            "bedtime_mssd",
            "daytime_sleep",
            "cum_gpa",
        ]);
        let caps = SchemaCapabilities::resolve(SourceSchema::Cmu, &columns);
        assert!(caps.has_identifier);
        assert!(caps.gender.is_some());
        assert!(caps.unresolved.is_empty());
        assert!(caps.missing_columns().is_empty());
    }

    #[test]
    fn missing_input_cascades_to_derived_fields() {
        let columns = header(&[
            "student_id",
            "sleep_hours",
            "exam_score",
            "study_hours_per_day",
            "attendance_percentage",
            "mental_health_rating",
            "social_media_hours",
        ]);
        let caps = SchemaCapabilities::resolve(SourceSchema::Kaggle, &columns);
        assert!(!caps.is_resolved(CanonicalField::DistractionHours));
        assert!(!caps.is_resolved(CanonicalField::ProductivityScore));
        assert!(caps.is_resolved(CanonicalField::StudyEfficiency));
        let productivity = caps
            .unresolved
            .iter()
            .find(|field| field.field == CanonicalField::ProductivityScore)
            .unwrap();
        assert_eq!(
            productivity.missing_dependencies,
            vec![CanonicalField::DistractionHours]
        );
        assert_eq!(
            caps.missing_columns(),
            vec!["age".to_string(), "gender".to_string(), "netflix_hours".to_string()]
        );
    }
}
