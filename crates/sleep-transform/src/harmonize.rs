//! Schema harmonization.
//!
//! One generic routine maps any source onto the canonical schema by walking
//! the source's resolved [`MappingTable`](sleep_model::MappingTable). Rules are
//! evaluated in table order, so derived rules see the canonical fields listed
//! before them.

use serde::Serialize;
use tracing::{debug, warn};

use sleep_ingest::{LoadedSource, parse_f64, parse_opt_f64};
use sleep_model::{
    CanonicalRecord, FieldRule, Gender, GenderRule, SchemaCapabilities, SleepBins, SourceRecord,
    SourceSchema, SourceTable,
};

/// Row-level diagnostics of one harmonization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarmonizeReport {
    pub schema: SourceSchema,
    pub input_rows: usize,
    pub output_rows: usize,
    /// Rows dropped because the native identifier was blank or absent.
    pub dropped_missing_id: usize,
    /// 1-based record numbers of the dropped rows.
    pub dropped_lines: Vec<u64>,
    /// Mapped native columns absent from the source file.
    pub missing_columns: Vec<String>,
    /// Rows with `sleep_hours` outside every sleep bin.
    pub uncategorized: usize,
}

/// Output of [`harmonize`].
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub records: Vec<CanonicalRecord>,
    pub report: HarmonizeReport,
}

/// Harmonizes a loaded source using the capabilities resolved at load time.
pub fn harmonize_loaded(source: &LoadedSource, bins: &SleepBins) -> Harmonized {
    harmonize(&source.table, &source.capabilities, bins)
}

/// Maps every row of `table` onto the canonical schema.
///
/// Pure: the only effects are log events. Rows without a native identifier
/// are dropped and counted; any other missing input leaves the attribute null.
pub fn harmonize(
    table: &SourceTable,
    capabilities: &SchemaCapabilities,
    bins: &SleepBins,
) -> Harmonized {
    let schema = table.schema;
    let resolved;
    let capabilities = if capabilities.schema() == schema {
        capabilities
    } else {
        warn!(
            source = %schema,
            capabilities = %capabilities.schema(),
            "capabilities resolved for another schema; re-resolving"
        );
        resolved = SchemaCapabilities::resolve(schema, &table.columns);
        &resolved
    };

    let mut report = HarmonizeReport {
        schema,
        input_rows: table.len(),
        output_rows: 0,
        dropped_missing_id: 0,
        dropped_lines: Vec::new(),
        missing_columns: capabilities.missing_columns(),
        uncategorized: 0,
    };
    let mut records = Vec::with_capacity(table.len());

    for row in &table.rows {
        let Some(native_id) = row.text(capabilities.mapping.id_column) else {
            debug!(source = %schema, line = row.line, "row dropped: missing identifier");
            report.dropped_missing_id += 1;
            report.dropped_lines.push(row.line);
            continue;
        };
        let record = harmonize_row(schema, native_id, row, capabilities, bins);
        if record.sleep_hours.is_some() && record.sleep_category.is_none() {
            debug!(
                source = %schema,
                student_id = %record.student_id,
                sleep_hours = record.sleep_hours,
                "sleep hours outside category bins"
            );
            report.uncategorized += 1;
        }
        records.push(record);
    }

    report.output_rows = records.len();
    if report.dropped_missing_id > 0 {
        warn!(
            source = %schema,
            dropped = report.dropped_missing_id,
            "rows dropped for missing identifier"
        );
    }
    debug!(
        source = %schema,
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        uncategorized = report.uncategorized,
        "harmonization complete"
    );
    Harmonized { records, report }
}

fn harmonize_row(
    schema: SourceSchema,
    native_id: &str,
    row: &SourceRecord,
    capabilities: &SchemaCapabilities,
    bins: &SleepBins,
) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(schema, schema.student_id(native_id));
    for mapping in &capabilities.resolved {
        let value = evaluate(&mapping.rule, row, &record);
        record.set_numeric(mapping.field, value);
    }
    let gender = match capabilities.gender {
        Some(GenderRule::Coded(column)) => row
            .text(column)
            .map(|code| parse_f64(code).map_or(Gender::Unknown, Gender::from_code)),
        Some(GenderRule::Label(column)) => row.text(column).map(Gender::from_label),
        None => None,
    };
    if let Some(gender) = gender {
        record.set_gender(gender);
    }
    record.sleep_category = record.sleep_hours.and_then(|hours| bins.categorize(hours));
    record
}

/// Evaluates one rule; `None` when any input is missing or the result is not finite.
pub fn evaluate(rule: &FieldRule, row: &SourceRecord, record: &CanonicalRecord) -> Option<f64> {
    let value = match rule {
        FieldRule::Copy(column) => parse_opt_f64(row.text(column)),
        FieldRule::Scale {
            column,
            divisor,
            multiplier,
        } => parse_opt_f64(row.text(column)).map(|value| value / divisor * multiplier),
        FieldRule::Sum(columns) => columns
            .iter()
            .map(|column| parse_opt_f64(row.text(column)))
            .sum::<Option<f64>>(),
        FieldRule::NegLog1p(column) => parse_opt_f64(row.text(column)).map(|value| -value.ln_1p()),
        FieldRule::Ratio {
            numerator,
            denominator,
            offset,
        } => {
            let numerator = record.numeric(*numerator)?;
            let denominator = record.numeric(*denominator)? + offset;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        FieldRule::Composite {
            terms,
            weight,
            multiplier,
        } => {
            let mut total = 0.0;
            for term in terms.iter() {
                let scaled = record.numeric(term.field)? / term.scale;
                let contribution = if term.inverted { 1.0 - scaled } else { scaled };
                total += contribution * weight;
            }
            Some(total * multiplier)
        }
    };
    value.filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sleep_model::{CellValue, SleepCategory};

    use super::*;

    fn source_table(schema: SourceSchema, rows: &[&[(&str, &str)]]) -> SourceTable {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for (name, _) in row.iter() {
                if !columns.iter().any(|column| column == name) {
                    columns.push((*name).to_string());
                }
            }
        }
        let mut table = SourceTable::new(schema, columns);
        for (idx, row) in rows.iter().enumerate() {
            let cells: BTreeMap<String, CellValue> = row
                .iter()
                .map(|(name, value)| ((*name).to_string(), CellValue::from_raw(value)))
                .collect();
            table.push_row(SourceRecord {
                line: idx as u64 + 1,
                cells,
            });
        }
        table
    }

    fn run(table: &SourceTable) -> Harmonized {
        let caps = SchemaCapabilities::resolve(table.schema, &table.columns);
        harmonize(table, &caps, &SleepBins::default())
    }

    #[test]
    fn cmu_units_and_scales_are_converted() {
        let table = source_table(
            SourceSchema::Cmu,
            &[&[
                ("subject_id", "7"),
                ("TotalSleepTime", "420"),
                ("term_gpa", "3.2"),
                ("demo_gender", "0"),
            ]],
        );
        let out = run(&table);
        let record = &out.records[0];
        assert_eq!(record.student_id, "CMU_7");
        assert_eq!(record.sleep_hours, Some(7.0));
        assert_eq!(record.academic_score, Some(80.0));
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.sleep_category, Some(SleepCategory::Adequate));
    }

    #[test]
    fn missing_identifier_drops_row() {
        let table = source_table(
            SourceSchema::Kaggle,
            &[
                &[("student_id", ""), ("sleep_hours", "7")],
                &[("student_id", "S2"), ("sleep_hours", "")],
            ],
        );
        let out = run(&table);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.report.dropped_missing_id, 1);
        assert_eq!(out.report.dropped_lines, vec![1]);
        assert_eq!(out.records[0].student_id, "KGL_S2");
        assert_eq!(out.records[0].sleep_hours, None);
        assert_eq!(out.records[0].sleep_category, None);
    }

    #[test]
    fn productivity_keeps_hundredfold_scale() {
        let table = source_table(
            SourceSchema::Kaggle,
            &[&[
                ("student_id", "1"),
                ("study_hours_per_day", "6"),
                ("attendance_percentage", "80"),
                ("social_media_hours", "2"),
                ("netflix_hours", "4"),
                ("mental_health_rating", "5"),
            ]],
        );
        let out = run(&table);
        let record = &out.records[0];
        assert_eq!(record.distraction_hours, Some(6.0));
        // (0.5 + 0.8 + 0.75 + 0.5) * 25 * 100
        let score = record.productivity_score.unwrap();
        assert!((score - 6375.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn unmapped_gender_codes_become_unknown() {
        let table = source_table(
            SourceSchema::Cmu,
            &[
                &[("subject_id", "1"), ("demo_gender", "2")],
                &[("subject_id", "2"), ("demo_gender", "")],
                &[("subject_id", "3"), ("demo_gender", "1.0")],
            ],
        );
        let out = run(&table);
        let genders: Vec<Gender> = out.records.iter().map(|record| record.gender).collect();
        assert_eq!(genders, vec![Gender::Unknown, Gender::Unknown, Gender::Female]);
        let reported: Vec<bool> = out
            .records
            .iter()
            .map(|record| record.gender_reported)
            .collect();
        assert_eq!(reported, vec![true, false, true]);
    }

    #[test]
    fn out_of_range_sleep_is_kept_without_category() {
        let table = source_table(
            SourceSchema::Kaggle,
            &[&[("student_id", "1"), ("sleep_hours", "13.5")]],
        );
        let out = run(&table);
        assert_eq!(out.records[0].sleep_hours, Some(13.5));
        assert_eq!(out.records[0].sleep_category, None);
        assert_eq!(out.report.uncategorized, 1);
    }

    #[test]
    fn bedtime_consistency_is_negated_log1p() {
        let table = source_table(
            SourceSchema::Cmu,
            &[&[("subject_id", "1"), ("bedtime_mssd", "0")]],
        );
        let out = run(&table);
        assert_eq!(out.records[0].bedtime_variability, Some(0.0));
        assert_eq!(out.records[0].bedtime_consistency, Some(-0.0));
    }
}
