use crate::core::TabularPlantParser;
use crate::error::{InventoryError, InventoryResult};
use crate::types::{AnalysisReport, CellValue, GridSummary, LookupResult, ReportConfig};
use crate::writer;
use colored::Colorize;
use std::io;
use std::path::PathBuf;

const RULE_WIDTH: usize = 70;
const RESULT_RULE_WIDTH: usize = 60;

/// Print a diagnostic for errors that should not fail the process; pass the
/// rest through.
fn soft_fail<T>(result: InventoryResult<T>) -> InventoryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_reportable() => {
            println!("{} {}", "❌ Error:".bold().red(), e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Title for the analysis banner, from the domain tag in the first header cell
fn report_title(parser: &TabularPlantParser) -> String {
    match parser.grid().header().first().map(|s| s.trim()) {
        Some(tag) if !tag.is_empty() => format!("{} DOMAIN PLANT ANALYSIS", tag.to_uppercase()),
        _ => "PLANT INVENTORY ANALYSIS".to_string(),
    }
}

/// Comma-separated plot numbers, cut at `limit`; returns the overflow count
fn format_plot_list(plots: &[u32], limit: usize) -> (String, usize) {
    let shown = plots
        .iter()
        .take(limit)
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    (shown, plots.len().saturating_sub(limit))
}

/// Execute the analyze command
pub fn analyze(input: PathBuf, config: ReportConfig, json: bool) -> InventoryResult<()> {
    let Some(parser) = soft_fail(TabularPlantParser::from_path(&input))? else {
        return Ok(());
    };
    let Some(report) = soft_fail(parser.analyze())? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_analysis(&report_title(&parser), &report, config);
    Ok(())
}

fn print_analysis(title: &str, report: &AnalysisReport, config: ReportConfig) {
    let rule = "=".repeat(RULE_WIDTH);

    match (
        report.plot_columns.min_plot(),
        report.plot_columns.max_plot(),
    ) {
        (Some(first), Some(last)) => println!(
            "Found {} plot columns ({} to {})",
            report.total_plots, first, last
        ),
        _ => println!("{}", "⚠️  No plot columns found in header".yellow()),
    }

    println!("\n{}", rule);
    println!("{}", title.bold().green());
    println!("{}", rule);

    println!("\n{}", "📊 SUMMARY:".bold().cyan());
    println!(
        "   Total plots with plants: {}",
        report.plots_with_plants.to_string().bold()
    );
    println!("   Total plots in CSV: {}", report.total_plots);
    println!("   Empty plots: {}", report.empty_plots());
    println!(
        "   Total number of plants: {}",
        report.total_plants.to_string().bold().green()
    );

    println!("\n{}", "📋 PLOTS WITH PLANTS:".bold().cyan());
    let (shown, more) = format_plot_list(&report.plots_list, config.plot_list_limit);
    println!("   Plot numbers: {}", shown);
    if more > 0 {
        println!("   ... and {} more plots", more);
    }

    println!(
        "\n{}",
        format!("🌳 TOP {} PLANTS BY TOTAL COUNT:", config.top_n)
            .bold()
            .cyan()
    );
    for (i, (plant, count)) in report.top_plants(config.top_n).into_iter().enumerate() {
        println!("   {:2}. {:25}: {:4} plants", i + 1, plant, count);
    }

    println!(
        "\n{}",
        format!("📈 TOP {} PLOTS BY PLANT COUNT:", config.top_n)
            .bold()
            .cyan()
    );
    for (i, (plot, count)) in report.top_plots(config.top_n).into_iter().enumerate() {
        println!("   {:2}. Plot {:3}: {:4} plants", i + 1, plot, count);
    }

    if !report.unparseable.is_empty() {
        println!(
            "\n{}",
            format!(
                "⚠️  UNREADABLE CELLS ({}, counted as not planted):",
                report.unparseable.len()
            )
            .yellow()
        );
        for cell in report.unparseable.iter().take(config.plot_list_limit) {
            println!(
                "   Row {:4}, Plot {:3}, {:25}: '{}'",
                cell.row + 1,
                cell.plot,
                cell.plant,
                cell.raw
            );
        }
        if report.unparseable.len() > config.plot_list_limit {
            println!(
                "   ... and {} more cells",
                report.unparseable.len() - config.plot_list_limit
            );
        }
    }

    println!("\n{}", rule);
}

/// Execute the lookup command
pub fn lookup(input: PathBuf, plant: String, plot: u32) -> InventoryResult<()> {
    let outcome = TabularPlantParser::from_path(&input).and_then(|parser| {
        let result = parser.lookup(&plant, plot)?;
        println!("Plot {} is at column index {}", plot, result.column);
        println!("Column header: '{}'", parser.grid().header()[result.column]);
        Ok(result)
    });

    match soft_fail(outcome)? {
        Some(result) => print_lookup(&result),
        None => println!("\n{}", "Could not find the data".red()),
    }
    Ok(())
}

fn print_lookup(result: &LookupResult) {
    println!(
        "\nFound {} (Category: {})",
        result.matched_name.bright_blue().bold(),
        result.category
    );
    println!("Value in plot {}: '{}'", result.plot, result.raw_value);

    if result.is_ambiguous() {
        println!(
            "{} '{}' also matches: {} (showing first match)",
            "⚠️ ".yellow(),
            result.plant,
            result.other_matches.join(", ")
        );
    }

    let rule = "=".repeat(RESULT_RULE_WIDTH);
    let count = match &result.count {
        CellValue::Count(n) => n.to_string().bold().green(),
        CellValue::Text(s) => s.as_str().yellow(),
    };
    println!("\n{}", rule);
    println!(
        "Result: {} {} plant(s) in plot {}",
        count, result.matched_name, result.plot
    );
    println!("{}", rule);
}

/// Execute the inspect command
pub fn inspect(input: PathBuf) -> InventoryResult<()> {
    let summary = TabularPlantParser::from_path(&input).and_then(|parser| parser.summary());
    if let Some(summary) = soft_fail(summary)? {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &GridSummary) {
    println!("{}", "CSV Analysis:".bold().cyan());
    println!("  Total rows: {}", summary.total_rows);
    println!("  Total columns: {}", summary.total_columns);
    println!(
        "  Headers: {:?}... (showing first {})",
        summary.header_preview,
        summary.header_preview.len()
    );

    println!("\n{}", "Cell Statistics:".bold().cyan());
    println!("  Cells with value '0': {}", summary.zero_cells);
    println!("  Empty cells: {}", summary.empty_cells);
    println!("  Cells with data: {}", summary.data_cells);

    println!("\n{}", "Plant Categories found:".bold().cyan());
    for category in &summary.categories {
        println!("  - {}", category);
    }
}

/// Execute the normalize command.
///
/// With an output path the structure summary is printed first and the
/// normalized CSV is saved; without one only the CSV goes to stdout.
pub fn normalize(input: PathBuf, output: Option<PathBuf>) -> InventoryResult<()> {
    let Some(parser) = soft_fail(TabularPlantParser::from_path(&input))? else {
        return Ok(());
    };
    let normalized = parser.grid().normalized();

    let Some(output) = output else {
        writer::write_grid_to_writer(io::stdout().lock(), &normalized)?;
        return Ok(());
    };

    let rule = "=".repeat(RESULT_RULE_WIDTH);
    println!("{}", rule);
    match parser.summary() {
        Ok(summary) => print_summary(&summary),
        Err(InventoryError::InvalidGrid { .. }) => println!("CSV file is empty"),
        Err(e) => return Err(e),
    }
    println!("{}", rule);

    println!("\n{}", "Processing CSV (treating 0 as empty)...".cyan());
    let rows = writer::write_grid(&output, &normalized)?;
    println!(
        "{} {}",
        "✅ Processed CSV saved to:".bold().green(),
        output.display()
    );
    println!("Total rows processed: {}", rows);
    println!("{}", rule);

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
