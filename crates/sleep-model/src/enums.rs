//! Type-safe enumerations for the integrated schema.
//!
//! These enums replace the string labels used by the source datasets so that
//! provenance, gender, and sleep quality are checked at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The native schema a record was loaded from.
///
/// Declaration order is the append order used by the integrator
/// (CMU block before Kaggle block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceSchema {
    /// CMU sleep and GPA study (Fitbit-tracked first-year students).
    #[serde(rename = "CMU")]
    Cmu,
    /// Self-reported student habits survey published on Kaggle.
    Kaggle,
}

impl SourceSchema {
    /// All schemas in append order.
    pub const ALL: [SourceSchema; 2] = [SourceSchema::Cmu, SourceSchema::Kaggle];

    /// Provenance label written to the `dataset_source` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSchema::Cmu => "CMU",
            SourceSchema::Kaggle => "Kaggle",
        }
    }

    /// Short code prepended to native identifiers to form `student_id`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceSchema::Cmu => "CMU",
            SourceSchema::Kaggle => "KGL",
        }
    }

    /// Native identifier column of the source file.
    pub fn id_column(&self) -> &'static str {
        match self {
            SourceSchema::Cmu => "subject_id",
            SourceSchema::Kaggle => "student_id",
        }
    }

    /// Human readable dataset description.
    pub fn description(&self) -> &'static str {
        match self {
            SourceSchema::Cmu => "CMU Sleep and GPA study",
            SourceSchema::Kaggle => "Kaggle Student Habits survey",
        }
    }

    /// Builds the globally unique identifier for a native id.
    pub fn student_id(&self, native_id: &str) -> String {
        format!("{}_{}", self.id_prefix(), native_id)
    }
}

impl fmt::Display for SourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Harmonized gender label.
///
/// Never null: any value that cannot be mapped, including a missing cell,
/// becomes [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }

    /// Maps the CMU numeric coding (0 = male, 1 = female).
    pub fn from_code(code: f64) -> Self {
        if code == 0.0 {
            Gender::Male
        } else if code == 1.0 {
            Gender::Female
        } else {
            Gender::Unknown
        }
    }

    /// Maps a free-text label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("male") {
            Gender::Male
        } else if trimmed.eq_ignore_ascii_case("female") {
            Gender::Female
        } else {
            Gender::Unknown
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordinal sleep quality bucket derived from `sleep_hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SleepCategory {
    Poor,
    Insufficient,
    Adequate,
    Optimal,
}

impl SleepCategory {
    /// All categories in ascending bin order.
    pub const ALL: [SleepCategory; 4] = [
        SleepCategory::Poor,
        SleepCategory::Insufficient,
        SleepCategory::Adequate,
        SleepCategory::Optimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepCategory::Poor => "Poor",
            SleepCategory::Insufficient => "Insufficient",
            SleepCategory::Adequate => "Adequate",
            SleepCategory::Optimal => "Optimal",
        }
    }
}

impl fmt::Display for SleepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_uses_source_prefix() {
        assert_eq!(SourceSchema::Cmu.student_id("S1"), "CMU_S1");
        assert_eq!(SourceSchema::Kaggle.student_id("42"), "KGL_42");
    }

    #[test]
    fn gender_code_mapping_never_fails() {
        assert_eq!(Gender::from_code(0.0), Gender::Male);
        assert_eq!(Gender::from_code(1.0), Gender::Female);
        assert_eq!(Gender::from_code(2.0), Gender::Unknown);
        assert_eq!(Gender::from_label(" female "), Gender::Female);
        assert_eq!(Gender::from_label("Other"), Gender::Unknown);
    }
}
