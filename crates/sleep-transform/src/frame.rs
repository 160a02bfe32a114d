//! Polars views of the integrated table.

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};

use sleep_model::{CanonicalField, IntegratedRecord, IntegratedTable, SourceSchema};

/// Name of the sequential identifier column written first in every frame.
pub const RECORD_ID_COLUMN: &str = "record_id";

/// Output column order: `record_id` then every canonical field.
pub fn output_columns() -> Vec<&'static str> {
    std::iter::once(RECORD_ID_COLUMN)
        .chain(CanonicalField::ALL.iter().map(|field| field.name()))
        .collect()
}

/// The whole integrated table in row order.
pub fn integrated_frame(table: &IntegratedTable) -> PolarsResult<DataFrame> {
    build_frame(table.iter().collect())
}

/// Rows of one source, keeping their integrated `record_id`.
pub fn source_frame(table: &IntegratedTable, schema: SourceSchema) -> PolarsResult<DataFrame> {
    build_frame(table.source_records(schema).collect())
}

fn build_frame(entries: Vec<&IntegratedRecord>) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(CanonicalField::ALL.len() + 1);
    let ids: Vec<u64> = entries.iter().map(|entry| entry.record_id).collect();
    columns.push(Series::new(RECORD_ID_COLUMN.into(), ids).into());

    for field in CanonicalField::ALL {
        let name = field.name().into();
        let series = match field {
            CanonicalField::StudentId => {
                let values: Vec<&str> = entries
                    .iter()
                    .map(|entry| entry.record.student_id.as_str())
                    .collect();
                Series::new(name, values)
            }
            CanonicalField::DatasetSource => {
                let values: Vec<&str> = entries
                    .iter()
                    .map(|entry| entry.record.dataset_source.as_str())
                    .collect();
                Series::new(name, values)
            }
            CanonicalField::Gender => {
                let values: Vec<&str> = entries
                    .iter()
                    .map(|entry| entry.record.gender.as_str())
                    .collect();
                Series::new(name, values)
            }
            CanonicalField::SleepCategory => {
                let values: Vec<Option<&str>> = entries
                    .iter()
                    .map(|entry| entry.record.sleep_category.map(|category| category.as_str()))
                    .collect();
                Series::new(name, values)
            }
            numeric => {
                let values: Vec<Option<f64>> = entries
                    .iter()
                    .map(|entry| entry.record.numeric(numeric))
                    .collect();
                Series::new(name, values)
            }
        };
        columns.push(series.into());
    }

    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use polars::prelude::AnyValue;
    use sleep_model::{CanonicalRecord, Gender, SleepCategory};

    use super::*;

    fn sample_table() -> IntegratedTable {
        let mut kaggle = CanonicalRecord::new(SourceSchema::Kaggle, "KGL_42");
        kaggle.sleep_hours = Some(5.5);
        kaggle.set_gender(Gender::Male);
        kaggle.sleep_category = Some(SleepCategory::Poor);
        let mut cmu = CanonicalRecord::new(SourceSchema::Cmu, "CMU_S1");
        cmu.sleep_hours = Some(8.0);
        cmu.cumulative_gpa = Some(3.5);
        IntegratedTable::from_ordered(vec![kaggle, cmu])
    }

    #[test]
    fn frame_has_every_output_column_in_order() {
        let df = integrated_frame(&sample_table()).unwrap();
        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, output_columns());
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn source_frame_keeps_record_ids() {
        let df = source_frame(&sample_table(), SourceSchema::Cmu).unwrap();
        assert_eq!(df.height(), 1);
        let id = df.column(RECORD_ID_COLUMN).unwrap().get(0).unwrap();
        assert_eq!(id, AnyValue::UInt64(2));
        let age = df.column("age").unwrap().get(0).unwrap();
        assert_eq!(age, AnyValue::Null);
    }
}
