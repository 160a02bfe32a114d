//! Declarative per-source mapping tables.
//!
//! Each source schema owns one static [`MappingTable`]: an ordered list of
//! canonical fields paired with the [`FieldRule`] that extracts them. A single
//! generic harmonizer walks the table; no per-source code paths exist.
//!
//! Rules that read other canonical fields (composites and ratios) must be
//! listed after the fields they depend on.

use crate::canonical::CanonicalField;
use crate::enums::SourceSchema;

/// One weighted input of a [`FieldRule::Composite`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeTerm {
    pub field: CanonicalField,
    /// The value is divided by this before weighting.
    pub scale: f64,
    /// Use `1 - value / scale` instead of `value / scale`.
    pub inverted: bool,
}

/// How a canonical numeric field is extracted from a source row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// Copy a native numeric column unchanged.
    Copy(&'static str),
    /// `column / divisor * multiplier`.
    Scale {
        column: &'static str,
        divisor: f64,
        multiplier: f64,
    },
    /// Sum of native numeric columns; null if any input is null.
    Sum(&'static [&'static str]),
    /// `-ln(1 + column)`.
    NegLog1p(&'static str),
    /// `numerator / (denominator + offset)` over canonical fields.
    Ratio {
        numerator: CanonicalField,
        denominator: CanonicalField,
        offset: f64,
    },
    /// `(sum of term * weight) * multiplier` over canonical fields.
    Composite {
        terms: &'static [CompositeTerm],
        weight: f64,
        multiplier: f64,
    },
}

impl FieldRule {
    /// Native columns read by the rule.
    pub fn source_columns(&self) -> Vec<&'static str> {
        match self {
            FieldRule::Copy(column) | FieldRule::NegLog1p(column) => vec![*column],
            FieldRule::Scale { column, .. } => vec![*column],
            FieldRule::Sum(columns) => columns.to_vec(),
            FieldRule::Ratio { .. } | FieldRule::Composite { .. } => Vec::new(),
        }
    }

    /// Canonical fields read by the rule.
    pub fn dependencies(&self) -> Vec<CanonicalField> {
        match self {
            FieldRule::Ratio {
                numerator,
                denominator,
                ..
            } => vec![*numerator, *denominator],
            FieldRule::Composite { terms, .. } => terms.iter().map(|term| term.field).collect(),
            _ => Vec::new(),
        }
    }

    /// Short human readable form used in logs and the schema listing.
    pub fn describe(&self) -> String {
        match self {
            FieldRule::Copy(column) => format!("{column} (identity)"),
            FieldRule::Scale {
                column,
                divisor,
                multiplier,
            } => {
                if *multiplier == 1.0 {
                    format!("{column} / {divisor}")
                } else {
                    format!("{column} / {divisor} * {multiplier}")
                }
            }
            FieldRule::Sum(columns) => columns.join(" + "),
            FieldRule::NegLog1p(column) => format!("-ln(1 + {column})"),
            FieldRule::Ratio {
                numerator,
                denominator,
                offset,
            } => format!("{numerator} / ({denominator} + {offset})"),
            FieldRule::Composite {
                terms,
                weight,
                multiplier,
            } => {
                let parts: Vec<String> = terms
                    .iter()
                    .map(|term| {
                        if term.inverted {
                            format!("(1 - {}/{})*{weight}", term.field, term.scale)
                        } else {
                            format!("({}/{})*{weight}", term.field, term.scale)
                        }
                    })
                    .collect();
                format!("({}) * {multiplier}", parts.join(" + "))
            }
        }
    }
}

/// How the gender label is read from a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderRule {
    /// Numeric coding: 0 = Male, 1 = Female.
    Coded(&'static str),
    /// Text label copied as-is.
    Label(&'static str),
}

impl GenderRule {
    pub fn column(&self) -> &'static str {
        match self {
            GenderRule::Coded(column) | GenderRule::Label(column) => *column,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            GenderRule::Coded(column) => format!("{column} {{0: Male, 1: Female}}"),
            GenderRule::Label(column) => format!("{column} (identity)"),
        }
    }
}

/// A canonical field paired with its extraction rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMapping {
    pub field: CanonicalField,
    pub rule: FieldRule,
}

/// Static mapping of one source schema onto the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingTable {
    pub schema: SourceSchema,
    pub id_column: &'static str,
    pub gender: GenderRule,
    pub fields: &'static [FieldMapping],
    /// Human readable transformation notes recorded in the metadata.
    pub notes: &'static [&'static str],
}

impl MappingTable {
    pub fn for_schema(schema: SourceSchema) -> Self {
        match schema {
            SourceSchema::Cmu => CMU_MAPPING,
            SourceSchema::Kaggle => KAGGLE_MAPPING,
        }
    }

    /// Rule for a canonical field, if this source populates it.
    pub fn rule_for(&self, field: CanonicalField) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|mapping| mapping.field == field)
            .map(|mapping| &mapping.rule)
    }

    /// Source-specific canonical fields this table populates.
    pub fn unique_fields(&self) -> Vec<CanonicalField> {
        self.fields
            .iter()
            .map(|mapping| mapping.field)
            .filter(|field| !field.is_common())
            .collect()
    }
}

const PRODUCTIVITY_TERMS: [CompositeTerm; 4] = [
    CompositeTerm {
        field: CanonicalField::StudyHoursPerDay,
        scale: 12.0,
        inverted: false,
    },
    CompositeTerm {
        field: CanonicalField::AttendancePercentage,
        scale: 100.0,
        inverted: false,
    },
    CompositeTerm {
        field: CanonicalField::DistractionHours,
        scale: 24.0,
        inverted: true,
    },
    CompositeTerm {
        field: CanonicalField::MentalHealthRating,
        scale: 10.0,
        inverted: false,
    },
];

const CMU_FIELDS: [FieldMapping; 6] = [
    FieldMapping {
        field: CanonicalField::SleepHours,
        rule: FieldRule::Scale {
            column: "TotalSleepTime",
            divisor: 60.0,
            multiplier: 1.0,
        },
    },
    FieldMapping {
        field: CanonicalField::AcademicScore,
        rule: FieldRule::Scale {
            column: "term_gpa",
            divisor: 4.0,
            multiplier: 100.0,
        },
    },
    FieldMapping {
        field: CanonicalField::BedtimeVariability,
        rule: FieldRule::Copy("bedtime_mssd"),
    },
    FieldMapping {
        field: CanonicalField::BedtimeConsistency,
        rule: FieldRule::NegLog1p("bedtime_mssd"),
    },
    FieldMapping {
        field: CanonicalField::DaytimeSleepMinutes,
        rule: FieldRule::Copy("daytime_sleep"),
    },
    FieldMapping {
        field: CanonicalField::CumulativeGpa,
        rule: FieldRule::Copy("cum_gpa"),
    },
];

const KAGGLE_FIELDS: [FieldMapping; 9] = [
    FieldMapping {
        field: CanonicalField::SleepHours,
        rule: FieldRule::Copy("sleep_hours"),
    },
    FieldMapping {
        field: CanonicalField::AcademicScore,
        rule: FieldRule::Copy("exam_score"),
    },
    FieldMapping {
        field: CanonicalField::Age,
        rule: FieldRule::Copy("age"),
    },
    FieldMapping {
        field: CanonicalField::StudyHoursPerDay,
        rule: FieldRule::Copy("study_hours_per_day"),
    },
    FieldMapping {
        field: CanonicalField::AttendancePercentage,
        rule: FieldRule::Copy("attendance_percentage"),
    },
    FieldMapping {
        field: CanonicalField::MentalHealthRating,
        rule: FieldRule::Copy("mental_health_rating"),
    },
    FieldMapping {
        field: CanonicalField::DistractionHours,
        rule: FieldRule::Sum(&["social_media_hours", "netflix_hours"]),
    },
    // The trailing * 100 puts the score on a 0-10000 scale even though the
    // four 0-25 terms already sum to 0-100. Kept as observed in the source data.
    FieldMapping {
        field: CanonicalField::ProductivityScore,
        rule: FieldRule::Composite {
            terms: &PRODUCTIVITY_TERMS,
            weight: 25.0,
            multiplier: 100.0,
        },
    },
    FieldMapping {
        field: CanonicalField::StudyEfficiency,
        rule: FieldRule::Ratio {
            numerator: CanonicalField::AcademicScore,
            denominator: CanonicalField::StudyHoursPerDay,
            offset: 0.1,
        },
    },
];

const CMU_NOTES: [&str; 5] = [
    "CMU: TotalSleepTime (minutes) -> sleep_hours (divided by 60)",
    "CMU: term_gpa (0-4) -> academic_score (divided by 4, multiplied by 100)",
    "CMU: demo_gender (0/1) -> gender (Male/Female)",
    "CMU: bedtime_mssd -> bedtime_variability, bedtime_consistency = -ln(1 + bedtime_mssd)",
    "CMU: cum_gpa -> cumulative_gpa, daytime_sleep -> daytime_sleep_minutes",
];

const KAGGLE_NOTES: [&str; 4] = [
    "Kaggle: exam_score -> academic_score (direct copy)",
    "Kaggle: social_media_hours + netflix_hours -> distraction_hours",
    "Kaggle: productivity_score composite of study, attendance, distraction and mental health (x100)",
    "Kaggle: study_efficiency = exam_score / (study_hours_per_day + 0.1)",
];

const CMU_MAPPING: MappingTable = MappingTable {
    schema: SourceSchema::Cmu,
    id_column: "subject_id",
    gender: GenderRule::Coded("demo_gender"),
    fields: &CMU_FIELDS,
    notes: &CMU_NOTES,
};

const KAGGLE_MAPPING: MappingTable = MappingTable {
    schema: SourceSchema::Kaggle,
    id_column: "student_id",
    gender: GenderRule::Label("gender"),
    fields: &KAGGLE_FIELDS,
    notes: &KAGGLE_NOTES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_columns_match_schema() {
        for schema in SourceSchema::ALL {
            let table = MappingTable::for_schema(schema);
            assert_eq!(table.id_column, schema.id_column());
            assert_eq!(table.schema, schema);
        }
    }

    #[test]
    fn tables_only_populate_their_native_fields() {
        for schema in SourceSchema::ALL {
            let table = MappingTable::for_schema(schema);
            for mapping in table.fields {
                if let Some(native) = mapping.field.native_source() {
                    assert_eq!(native, schema, "{} mapped by {schema}", mapping.field);
                }
            }
        }
    }

    #[test]
    fn derived_rules_follow_their_dependencies() {
        for schema in SourceSchema::ALL {
            let table = MappingTable::for_schema(schema);
            for (idx, mapping) in table.fields.iter().enumerate() {
                for dependency in mapping.rule.dependencies() {
                    let position = table
                        .fields
                        .iter()
                        .position(|candidate| candidate.field == dependency)
                        .expect("dependency mapped");
                    assert!(position < idx, "{dependency} must precede {}", mapping.field);
                }
            }
        }
    }

    #[test]
    fn describe_renders_scale_rules() {
        let table = MappingTable::for_schema(SourceSchema::Cmu);
        let sleep = table.rule_for(CanonicalField::SleepHours).unwrap();
        assert_eq!(sleep.describe(), "TotalSleepTime / 60");
        let score = table.rule_for(CanonicalField::AcademicScore).unwrap();
        assert_eq!(score.describe(), "term_gpa / 4 * 100");
    }
}
