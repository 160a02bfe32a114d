//! Canonical schema shared by every integrated record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{Gender, SleepCategory, SourceSchema};

/// Value kind of a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
}

/// Columns of the canonical schema in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    StudentId,
    DatasetSource,
    SleepHours,
    AcademicScore,
    Gender,
    SleepCategory,
    Age,
    BedtimeVariability,
    BedtimeConsistency,
    DaytimeSleepMinutes,
    CumulativeGpa,
    StudyHoursPerDay,
    AttendancePercentage,
    MentalHealthRating,
    DistractionHours,
    ProductivityScore,
    StudyEfficiency,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 17] = [
        CanonicalField::StudentId,
        CanonicalField::DatasetSource,
        CanonicalField::SleepHours,
        CanonicalField::AcademicScore,
        CanonicalField::Gender,
        CanonicalField::SleepCategory,
        CanonicalField::Age,
        CanonicalField::BedtimeVariability,
        CanonicalField::BedtimeConsistency,
        CanonicalField::DaytimeSleepMinutes,
        CanonicalField::CumulativeGpa,
        CanonicalField::StudyHoursPerDay,
        CanonicalField::AttendancePercentage,
        CanonicalField::MentalHealthRating,
        CanonicalField::DistractionHours,
        CanonicalField::ProductivityScore,
        CanonicalField::StudyEfficiency,
    ];

    /// Fields whose missing values are tracked by the integrity report.
    ///
    /// `Age` is only populated by Kaggle but is tracked across both sources,
    /// so every CMU row counts as missing it.
    pub const TRACKED: [CanonicalField; 5] = [
        CanonicalField::SleepHours,
        CanonicalField::AcademicScore,
        CanonicalField::Gender,
        CanonicalField::Age,
        CanonicalField::SleepCategory,
    ];

    /// Column name in the integrated table.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::StudentId => "student_id",
            CanonicalField::DatasetSource => "dataset_source",
            CanonicalField::SleepHours => "sleep_hours",
            CanonicalField::AcademicScore => "academic_score",
            CanonicalField::Gender => "gender",
            CanonicalField::SleepCategory => "sleep_category",
            CanonicalField::Age => "age",
            CanonicalField::BedtimeVariability => "bedtime_variability",
            CanonicalField::BedtimeConsistency => "bedtime_consistency",
            CanonicalField::DaytimeSleepMinutes => "daytime_sleep_minutes",
            CanonicalField::CumulativeGpa => "cumulative_gpa",
            CanonicalField::StudyHoursPerDay => "study_hours_per_day",
            CanonicalField::AttendancePercentage => "attendance_percentage",
            CanonicalField::MentalHealthRating => "mental_health_rating",
            CanonicalField::DistractionHours => "distraction_hours",
            CanonicalField::ProductivityScore => "productivity_score",
            CanonicalField::StudyEfficiency => "study_efficiency",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CanonicalField::StudentId
            | CanonicalField::DatasetSource
            | CanonicalField::Gender
            | CanonicalField::SleepCategory => FieldKind::Text,
            _ => FieldKind::Numeric,
        }
    }

    /// The only source that can populate this field, or `None` for common fields.
    pub fn native_source(&self) -> Option<SourceSchema> {
        match self {
            CanonicalField::BedtimeVariability
            | CanonicalField::BedtimeConsistency
            | CanonicalField::DaytimeSleepMinutes
            | CanonicalField::CumulativeGpa => Some(SourceSchema::Cmu),
            CanonicalField::Age
            | CanonicalField::StudyHoursPerDay
            | CanonicalField::AttendancePercentage
            | CanonicalField::MentalHealthRating
            | CanonicalField::DistractionHours
            | CanonicalField::ProductivityScore
            | CanonicalField::StudyEfficiency => Some(SourceSchema::Kaggle),
            _ => None,
        }
    }

    pub fn is_common(&self) -> bool {
        self.native_source().is_none()
    }

    pub fn description(&self) -> &'static str {
        match self {
            CanonicalField::StudentId => "Globally unique identifier with source prefix",
            CanonicalField::DatasetSource => "Provenance tag (CMU or Kaggle)",
            CanonicalField::SleepHours => {
                "Sleep duration in hours (harmonized from CMU minutes and Kaggle hours)"
            }
            CanonicalField::AcademicScore => {
                "Academic performance on 0-100 scale (CMU GPA / 4 * 100, Kaggle exam_score)"
            }
            CanonicalField::Gender => "Student gender (Male/Female/Unknown)",
            CanonicalField::SleepCategory => {
                "Categorical sleep quality (Poor/Insufficient/Adequate/Optimal)"
            }
            CanonicalField::Age => "Student age in years",
            CanonicalField::BedtimeVariability => "Mean successive squared difference of bedtime",
            CanonicalField::BedtimeConsistency => {
                "Negated log1p of bedtime variability (higher = more consistent)"
            }
            CanonicalField::DaytimeSleepMinutes => "Daytime sleep in minutes",
            CanonicalField::CumulativeGpa => "Cumulative GPA on the 0-4 scale",
            CanonicalField::StudyHoursPerDay => "Self-reported study hours per day",
            CanonicalField::AttendancePercentage => "Class attendance percentage",
            CanonicalField::MentalHealthRating => "Self-reported mental health rating (1-10)",
            CanonicalField::DistractionHours => "Social media plus streaming hours per day",
            CanonicalField::ProductivityScore => {
                "Composite of study, attendance, distraction and mental health"
            }
            CanonicalField::StudyEfficiency => "Exam score per study hour",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One harmonized row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub student_id: String,
    pub dataset_source: SourceSchema,
    pub sleep_hours: Option<f64>,
    pub academic_score: Option<f64>,
    pub gender: Gender,
    /// False when the source gender cell was absent or blank.
    #[serde(default)]
    pub gender_reported: bool,
    pub sleep_category: Option<SleepCategory>,
    pub age: Option<f64>,
    pub bedtime_variability: Option<f64>,
    pub bedtime_consistency: Option<f64>,
    pub daytime_sleep_minutes: Option<f64>,
    pub cumulative_gpa: Option<f64>,
    pub study_hours_per_day: Option<f64>,
    pub attendance_percentage: Option<f64>,
    pub mental_health_rating: Option<f64>,
    pub distraction_hours: Option<f64>,
    pub productivity_score: Option<f64>,
    pub study_efficiency: Option<f64>,
}

impl CanonicalRecord {
    /// Creates a record with every optional attribute null.
    pub fn new(dataset_source: SourceSchema, student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            dataset_source,
            sleep_hours: None,
            academic_score: None,
            gender: Gender::Unknown,
            gender_reported: false,
            sleep_category: None,
            age: None,
            bedtime_variability: None,
            bedtime_consistency: None,
            daytime_sleep_minutes: None,
            cumulative_gpa: None,
            study_hours_per_day: None,
            attendance_percentage: None,
            mental_health_rating: None,
            distraction_hours: None,
            productivity_score: None,
            study_efficiency: None,
        }
    }

    fn numeric_slot(&mut self, field: CanonicalField) -> Option<&mut Option<f64>> {
        match field {
            CanonicalField::SleepHours => Some(&mut self.sleep_hours),
            CanonicalField::AcademicScore => Some(&mut self.academic_score),
            CanonicalField::Age => Some(&mut self.age),
            CanonicalField::BedtimeVariability => Some(&mut self.bedtime_variability),
            CanonicalField::BedtimeConsistency => Some(&mut self.bedtime_consistency),
            CanonicalField::DaytimeSleepMinutes => Some(&mut self.daytime_sleep_minutes),
            CanonicalField::CumulativeGpa => Some(&mut self.cumulative_gpa),
            CanonicalField::StudyHoursPerDay => Some(&mut self.study_hours_per_day),
            CanonicalField::AttendancePercentage => Some(&mut self.attendance_percentage),
            CanonicalField::MentalHealthRating => Some(&mut self.mental_health_rating),
            CanonicalField::DistractionHours => Some(&mut self.distraction_hours),
            CanonicalField::ProductivityScore => Some(&mut self.productivity_score),
            CanonicalField::StudyEfficiency => Some(&mut self.study_efficiency),
            CanonicalField::StudentId
            | CanonicalField::DatasetSource
            | CanonicalField::Gender
            | CanonicalField::SleepCategory => None,
        }
    }

    /// Reads a numeric attribute. Text fields always read as `None`.
    pub fn numeric(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::SleepHours => self.sleep_hours,
            CanonicalField::AcademicScore => self.academic_score,
            CanonicalField::Age => self.age,
            CanonicalField::BedtimeVariability => self.bedtime_variability,
            CanonicalField::BedtimeConsistency => self.bedtime_consistency,
            CanonicalField::DaytimeSleepMinutes => self.daytime_sleep_minutes,
            CanonicalField::CumulativeGpa => self.cumulative_gpa,
            CanonicalField::StudyHoursPerDay => self.study_hours_per_day,
            CanonicalField::AttendancePercentage => self.attendance_percentage,
            CanonicalField::MentalHealthRating => self.mental_health_rating,
            CanonicalField::DistractionHours => self.distraction_hours,
            CanonicalField::ProductivityScore => self.productivity_score,
            CanonicalField::StudyEfficiency => self.study_efficiency,
            CanonicalField::StudentId
            | CanonicalField::DatasetSource
            | CanonicalField::Gender
            | CanonicalField::SleepCategory => None,
        }
    }

    /// Records a gender read from the source, recognized or not.
    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
        self.gender_reported = true;
    }

    /// Writes a numeric attribute. Returns false when `field` is not numeric.
    pub fn set_numeric(&mut self, field: CanonicalField, value: Option<f64>) -> bool {
        match self.numeric_slot(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// True when the attribute holds no value.
    ///
    /// Gender is missing only when the source cell was absent or blank; an
    /// unrecognized label such as `Other` is reported as `Unknown` but present.
    pub fn is_missing(&self, field: CanonicalField) -> bool {
        match field {
            CanonicalField::StudentId => self.student_id.is_empty(),
            CanonicalField::DatasetSource => false,
            CanonicalField::Gender => !self.gender_reported,
            CanonicalField::SleepCategory => self.sleep_category.is_none(),
            numeric => self.numeric(numeric).is_none(),
        }
    }
}

/// A canonical record with its position in the integrated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedRecord {
    /// 1-based position after the integration sort.
    pub record_id: u64,
    pub record: CanonicalRecord,
}

/// The final analytic table. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegratedTable {
    records: Vec<IntegratedRecord>,
}

impl IntegratedTable {
    /// Builds the table from records already in their final order,
    /// assigning `record_id` from each position.
    pub fn from_ordered(records: Vec<CanonicalRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| IntegratedRecord {
                record_id: idx as u64 + 1,
                record,
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[IntegratedRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntegratedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records contributed by one source, in table order.
    pub fn source_records(&self, schema: SourceSchema) -> impl Iterator<Item = &IntegratedRecord> {
        self.records
            .iter()
            .filter(move |entry| entry.record.dataset_source == schema)
    }

    /// Row count per source. Every schema is present, even with zero rows.
    pub fn count_by_source(&self) -> BTreeMap<SourceSchema, usize> {
        let mut counts: BTreeMap<SourceSchema, usize> =
            SourceSchema::ALL.iter().map(|schema| (*schema, 0)).collect();
        for entry in &self.records {
            *counts.entry(entry.record.dataset_source).or_insert(0) += 1;
        }
        counts
    }
}
