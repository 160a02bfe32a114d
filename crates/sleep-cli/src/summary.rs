use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sleep_ingest::format_optional;
use sleep_model::{MeanStd, SleepCategory, SummaryStats};
use sleep_report::UNCATEGORIZED_LABEL;

use sleep_cli::types::{CleaningResult, IntegrationResult};

pub fn print_integration_summary(result: &IntegrationResult) {
    let metadata = &result.metadata;
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", result.output_dir.display());
        if let Some(path) = &result.outputs.integrated {
            println!("Integrated table: {}", path.display());
        }
        for path in &result.outputs.source_files {
            println!("Source file: {}", path.display());
        }
        if let Some(path) = &result.outputs.metadata {
            println!("Metadata: {}", path.display());
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Rows"),
        header_cell("Dropped (no id)"),
        header_cell("Mean sleep (h)"),
        header_cell("Mean score"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_dropped = 0usize;
    for report in &result.harmonize_reports {
        let label = report.schema.as_str();
        total_dropped += report.dropped_missing_id;
        let stats = metadata
            .statistics
            .by_source
            .get(label)
            .cloned()
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(stats.n),
            count_cell(report.dropped_missing_id, Color::Yellow),
            mean_cell(stats.sleep_hours),
            mean_cell(stats.academic_score),
        ]);
    }
    let overall: &SummaryStats = &metadata.statistics.overall;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(overall.n).add_attribute(Attribute::Bold),
        count_cell(total_dropped, Color::Yellow).add_attribute(Attribute::Bold),
        mean_cell(overall.sleep_hours).add_attribute(Attribute::Bold),
        mean_cell(overall.academic_score).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_category_table(result);
    print_missing_table(result);
}

fn print_category_table(result: &IntegrationResult) {
    let distribution = &result.metadata.sleep_category_distribution;
    let total = result.metadata.data_quality.total_students;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sleep category"),
        header_cell("Rows"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let labels = SleepCategory::ALL
        .iter()
        .map(|category| category.as_str())
        .chain(std::iter::once(UNCATEGORIZED_LABEL));
    for label in labels {
        let Some(count) = distribution.get(label).copied() else {
            continue;
        };
        let label_cell = if label == UNCATEGORIZED_LABEL {
            dim_cell(label)
        } else {
            Cell::new(label)
        };
        table.add_row(vec![
            label_cell,
            Cell::new(count),
            Cell::new(format!("{:.1}%", sleep_report::percentage(count, total))),
        ]);
    }
    println!();
    println!("Sleep categories:");
    println!("{table}");
}

fn print_missing_table(result: &IntegrationResult) {
    let quality = &result.metadata.data_quality;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Missing"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (column, missing) in &quality.missing_values {
        table.add_row(vec![
            Cell::new(column),
            count_cell(missing.count, Color::Yellow),
            Cell::new(format!("{:.1}%", missing.percentage)),
        ]);
    }
    println!();
    println!("Missing values:");
    println!("{table}");
    if quality.duplicate_student_ids > 0 {
        eprintln!(
            "warning: {} duplicate student_id values",
            quality.duplicate_student_ids
        );
    }
}

pub fn print_cleaning_summary(result: &CleaningResult) {
    println!("Output: {}", result.output_dir.display());
    println!("Cleaning report: {}", result.report_path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Input"),
        header_cell("Duplicates"),
        header_cell("Low coverage"),
        header_cell("Missing critical"),
        header_cell("Out of range"),
        header_cell("Sleep outliers"),
        header_cell("Study outliers"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for source in &result.sources {
        let report = &source.report;
        table.add_row(vec![
            Cell::new(source.schema.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(report.input_rows),
            count_cell(report.duplicates_removed, Color::Yellow),
            count_cell(report.low_coverage_removed, Color::Yellow),
            count_cell(report.missing_critical_removed, Color::Yellow),
            count_cell(report.out_of_range_removed, Color::Yellow),
            count_cell(report.sleep_outliers_flagged, Color::Magenta),
            count_cell(report.study_outliers_flagged, Color::Magenta),
            Cell::new(report.output_rows).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
    for source in &result.sources {
        println!("{}: {}", source.schema.as_str(), source.output.display());
    }
}

fn mean_cell(stats: MeanStd) -> Cell {
    match stats.mean {
        Some(_) => Cell::new(format!(
            "{} ± {}",
            format_optional(stats.mean, 2),
            format_optional(stats.std, 2)
        )),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
