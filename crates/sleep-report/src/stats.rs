//! Descriptive statistics over optional numeric columns.

use sleep_model::MeanStd;

/// Mean and sample standard deviation (n - 1) of the present values.
///
/// The mean needs one value and the deviation two; otherwise they are `None`.
pub fn mean_std(values: impl IntoIterator<Item = Option<f64>>) -> MeanStd {
    let present: Vec<f64> = values.into_iter().flatten().collect();
    if present.is_empty() {
        return MeanStd::default();
    }
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let std = if present.len() < 2 {
        None
    } else {
        let sum_sq: f64 = present.iter().map(|value| (value - mean).powi(2)).sum();
        Some((sum_sq / (n - 1.0)).sqrt())
    };
    MeanStd {
        mean: Some(mean),
        std,
    }
}

/// `count / total` in percent; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
