//! Configuration options for cleaning and harmonization.

use serde::{Deserialize, Serialize};

use crate::enums::SleepCategory;
use crate::error::{ModelError, Result};

/// Bin edges for the sleep-category partition.
///
/// Five strictly increasing edges define four half-open bins
/// `[e0,e1) [e1,e2) [e2,e3) [e3,e4)`, labelled in [`SleepCategory::ALL`] order.
/// Values outside `[e0,e4)` have no category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepBins {
    edges: [f64; 5],
}

impl SleepBins {
    pub const DEFAULT_EDGES: [f64; 5] = [0.0, 6.0, 7.0, 8.0, 12.0];

    pub fn new(edges: &[f64]) -> Result<Self> {
        let edges: [f64; 5] = edges.try_into().map_err(|_| ModelError::BinEdgeCount {
            expected: 5,
            actual: edges.len(),
        })?;
        let ordered = edges.iter().all(|edge| edge.is_finite())
            && edges.windows(2).all(|pair| pair[0] < pair[1]);
        if !ordered {
            return Err(ModelError::BinEdgeOrder {
                edges: edges.to_vec(),
            });
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64; 5] {
        &self.edges
    }

    /// Category for a sleep duration in hours; `None` when out of range.
    pub fn categorize(&self, hours: f64) -> Option<SleepCategory> {
        if !hours.is_finite() {
            return None;
        }
        self.edges
            .windows(2)
            .zip(SleepCategory::ALL)
            .find(|(bounds, _)| hours >= bounds[0] && hours < bounds[1])
            .map(|(_, category)| category)
    }

    /// Human readable bin ranges, e.g. `Poor [0, 6)`.
    pub fn describe(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .zip(SleepCategory::ALL)
            .map(|(bounds, category)| format!("{category} [{}, {})", bounds[0], bounds[1]))
            .collect()
    }
}

impl Default for SleepBins {
    fn default() -> Self {
        Self {
            edges: Self::DEFAULT_EDGES,
        }
    }
}

/// Thresholds used by the cleaning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// CMU rows with a smaller `frac_nights_with_data` are dropped.
    pub min_night_fraction: f64,
    /// Valid inclusive `term_gpa` range for CMU rows.
    pub gpa_range: (f64, f64),
    /// Valid inclusive `exam_score` range for Kaggle rows.
    pub exam_score_range: (f64, f64),
    /// Sleep hours outside this inclusive range are flagged as outliers.
    pub sleep_outlier_range: (f64, f64),
    /// Study hours above this are flagged as outliers.
    pub max_study_hours: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            min_night_fraction: 0.5,
            gpa_range: (0.0, 4.0),
            exam_score_range: (0.0, 100.0),
            sleep_outlier_range: (2.0, 16.0),
            max_study_hours: 18.0,
        }
    }
}

impl CleaningOptions {
    pub fn with_min_night_fraction(mut self, fraction: f64) -> Self {
        self.min_night_fraction = fraction;
        self
    }
}
