use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use inca_db::ColumnComparison;
use inca_model::ResolutionSource;
use inca_transform::SampleResolutions;

use inca_cli::types::ImportResult;

pub fn print_import_summary(result: &ImportResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Report"),
        header_cell("Sample"),
        header_cell("Panel"),
        header_cell("Evaluations"),
        header_cell("Records"),
        header_cell("Issues"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_evaluations = 0usize;
    let mut total_records = 0usize;
    let mut total_issues = 0usize;
    for report in &result.reports {
        total_evaluations += report.evaluations;
        total_records += report.records;
        total_issues += report.issues;
        table.add_row(vec![
            Cell::new(&report.name),
            report
                .sample_number
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            source_cell(report.source),
            Cell::new(report.evaluations),
            Cell::new(report.records),
            count_cell(report.issues, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_evaluations).add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(total_issues, Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(path) = &result.dump {
        println!("Dump: {}", path.display());
    }
    if let Some(count) = result.inserted {
        println!("Inserted rows: {count}");
    }
    if !result.skipped.is_empty() {
        println!("Skipped reports without data:");
        for path in &result.skipped {
            println!("- {}", path.display());
        }
    }
    let conflicts: Vec<_> = result
        .overlaps
        .iter()
        .filter(|overlap| overlap.is_conflict())
        .collect();
    if !conflicts.is_empty() {
        println!("Manual overrides shadowed by a different mapped code:");
        for overlap in conflicts {
            println!(
                "- {}: mapped {}, manual {}",
                overlap.panel_id, overlap.mapped_code, overlap.manual_code
            );
        }
    }
    if !result.unresolved_panels.is_empty() {
        println!("Panels without a clinical code:");
        for panel in &result.unresolved_panels {
            println!("- {panel}");
        }
    }
    if !result.missing_samples.is_empty() {
        println!("Samples not in the manifest:");
        for sample in &result.missing_samples {
            println!("- {sample}");
        }
    }
    if !result.panel_errors.is_empty() {
        eprintln!("Samples without a panel selection:");
        for (sample, error) in &result.panel_errors {
            eprintln!("- {sample}: {error}");
        }
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_resolutions(resolutions: &SampleResolutions) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Panel"),
        header_cell("Code"),
        header_cell("Source"),
        header_cell("Condition"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for (sample, resolution) in resolutions.iter() {
        let result = resolution.resolution.as_ref();
        table.add_row(vec![
            Cell::new(sample),
            Cell::new(&resolution.panel_label),
            result
                .and_then(|result| result.code.as_deref())
                .map_or_else(|| dim_cell("-"), Cell::new),
            source_cell(result.map(|result| result.source)),
            result
                .and_then(|result| result.condition.as_deref())
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
    if !resolutions.errors().is_empty() {
        eprintln!("Samples without a panel selection:");
        for (sample, error) in resolutions.errors() {
            eprintln!("- {sample}: {error}");
        }
    }
}

pub fn print_comparison(comparisons: &[ColumnComparison]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Shared"),
        header_cell("Dev only"),
        header_cell("Prod only"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for comparison in comparisons {
        let column = if comparison.is_identical() {
            Cell::new(&comparison.column)
        } else {
            Cell::new(&comparison.column)
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            column,
            Cell::new(comparison.shared.len()),
            count_cell(comparison.dev_only.len(), Color::Yellow),
            count_cell(comparison.prod_only.len(), Color::Yellow),
        ]);
    }
    println!("{table}");
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

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn source_cell(source: Option<ResolutionSource>) -> Cell {
    match source {
        Some(ResolutionSource::Mapped) => Cell::new("mapped").fg(Color::Green),
        Some(ResolutionSource::Manual) => Cell::new("manual").fg(Color::Blue),
        Some(ResolutionSource::Unresolved) => Cell::new("unresolved")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
