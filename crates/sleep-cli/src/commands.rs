use anyhow::{Result, anyhow};
use comfy_table::{Cell, CellAlignment, Table};

use sleep_cli::pipeline::{run_cleaning, run_integration};
use sleep_cli::types::{CleanConfig, CleaningResult, IntegrateConfig, IntegrationResult};
use sleep_model::{
    CanonicalField, CleaningOptions, FieldKind, MappingTable, SleepBins, SourceSchema,
};

use crate::cli::{CleanArgs, IntegrateArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_integrate(args: &IntegrateArgs) -> Result<IntegrationResult> {
    let bins = SleepBins::new(&args.bin_edges)
        .map_err(|error| anyhow!("invalid --bin-edges: {error}"))?;
    let config = IntegrateConfig::new(&args.cmu, &args.kaggle, &args.output_dir)
        .with_bins(bins)
        .with_source_files(!args.no_source_files)
        .with_dry_run(args.dry_run);
    run_integration(&config)
}

pub fn run_clean(args: &CleanArgs) -> Result<CleaningResult> {
    let config = CleanConfig {
        cmu_path: args.cmu.clone(),
        kaggle_path: args.kaggle.clone(),
        output_dir: args.output_dir.clone(),
        options: CleaningOptions::default().with_min_night_fraction(args.min_night_fraction),
    };
    run_cleaning(&config)
}

pub fn run_schema() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Source"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for field in CanonicalField::ALL {
        let kind = match field.kind() {
            FieldKind::Text => "text",
            FieldKind::Numeric => "numeric",
        };
        let source = match field.native_source() {
            Some(schema) => Cell::new(schema.as_str()),
            None => dim_cell("all"),
        };
        table.add_row(vec![
            Cell::new(field.name()),
            Cell::new(kind),
            source,
            Cell::new(field.description()),
        ]);
    }
    println!("Canonical schema:");
    println!("{table}");

    for schema in SourceSchema::ALL {
        let mapping = MappingTable::for_schema(schema);
        let mut table = Table::new();
        table.set_header(vec![header_cell("Canonical field"), header_cell("Rule")]);
        apply_table_style(&mut table);
        table.add_row(vec![
            "student_id".to_string(),
            format!("\"{}_\" + {}", schema.id_prefix(), mapping.id_column),
        ]);
        table.add_row(vec!["gender".to_string(), mapping.gender.describe()]);
        for field in mapping.fields {
            table.add_row(vec![field.field.name().to_string(), field.rule.describe()]);
        }
        println!();
        println!("{} ({}):", schema.as_str(), schema.description());
        println!("{table}");
    }
    Ok(())
}
