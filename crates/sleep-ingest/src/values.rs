//! Cell value parsing and formatting helpers.

/// Parses a string as f64, returning None for blank, invalid, or non-finite values.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Parses an optional cell as f64.
pub fn parse_opt_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(parse_f64)
}

/// Formats an optional number with fixed precision, `-` when absent.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}
