//! Library-level tests for grid parsing, analysis, lookup and normalization

use plot_inventory::core::{analyze_file, find_plant_in_plot, TabularPlantParser};
use plot_inventory::parser::{classify_cell, read_grid, scan_plot_columns};
use plot_inventory::types::{CellValue, Grid};
use plot_inventory::writer::{normalize_grid, write_grid};
use plot_inventory::InventoryError;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test-data");
    path.push(filename);
    path
}

fn sample_parser() -> TabularPlantParser {
    TabularPlantParser::from_path(&test_data_path("sf1_sample.csv")).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKED EXAMPLE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_worked_example() {
    let grid = Grid::from(vec![
        vec!["SF1", "Plot No -->", "1", "2"],
        vec!["", "date"],
        vec!["Trees", "Mango", "0", "5"],
    ]);

    let plots = scan_plot_columns(grid.header()).unwrap();
    assert_eq!(plots.iter().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
    assert!(!classify_cell(grid.cell(2, 2).unwrap()).is_planted());
    assert_eq!(classify_cell(grid.cell(2, 3).unwrap()).planted_count(), Some(5));

    let parser = TabularPlantParser::new(grid);
    let report = parser.analyze().unwrap();
    assert_eq!(report.total_plants, 5);
    assert_eq!(report.plant_totals.iter().collect::<Vec<_>>(), vec![(&"Mango".to_string(), 5)]);
    assert_eq!(report.plots_list, vec![2]);

    let hit = parser.lookup("mAnGo", 2).unwrap();
    assert_eq!(hit.count, CellValue::Count(5));
    assert!(matches!(
        parser.lookup("mango", 99),
        Err(InventoryError::PlotNotFound(99))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// ANALYSIS OF THE SAMPLE EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sample_summary_counts() {
    let report = sample_parser().analyze().unwrap();

    assert_eq!(report.total_plots, 25);
    assert_eq!(report.plots_with_plants, 23);
    assert_eq!(report.empty_plots(), 2);
    assert_eq!(report.total_plants, 37);
    assert!(!report.plots_list.contains(&7));
    assert!(!report.plots_list.contains(&24));
}

#[test]
fn test_sample_totals_agree() {
    let report = sample_parser().analyze().unwrap();

    assert_eq!(report.plot_totals.total(), report.total_plants);
    assert_eq!(report.plant_totals.total(), report.total_plants);
    assert_eq!(report.plot_totals.len(), report.plots_with_plants);
}

#[test]
fn test_sample_plots_list_sorted() {
    let report = sample_parser().analyze().unwrap();
    let mut sorted = report.plots_list.clone();
    sorted.sort_unstable();
    assert_eq!(report.plots_list, sorted);
}

#[test]
fn test_sample_plant_totals() {
    let report = sample_parser().analyze().unwrap();

    assert_eq!(report.plant_totals.get("Mango"), Some(7));
    assert_eq!(report.plant_totals.get("Neem"), Some(6));
    assert_eq!(report.plant_totals.get("Mango Alphonso"), Some(2));
    assert_eq!(report.plant_totals.get("Guava"), Some(17));
    assert_eq!(report.plant_totals.get("Hibiscus"), Some(5));
    // All zeros
    assert_eq!(report.plant_totals.get("Tulsi"), None);
}

#[test]
fn test_sample_rankings() {
    let report = sample_parser().analyze().unwrap();

    let top_plant = report.top_plants(1);
    assert_eq!(top_plant[0].0, "Guava");

    let plots: Vec<(u32, u64)> = report
        .top_plots(4)
        .into_iter()
        .map(|(p, c)| (*p, c))
        .collect();
    // 8 and 25 tie at 4; plot 8 was counted first.
    assert_eq!(plots, vec![(6, 5), (8, 4), (25, 4), (1, 3)]);
}

#[test]
fn test_sample_unparseable_cell_is_listed() {
    let report = sample_parser().analyze().unwrap();

    assert_eq!(report.unparseable.len(), 1);
    let cell = &report.unparseable[0];
    assert_eq!(cell.plant, "Hibiscus");
    assert_eq!(cell.plot, 7);
    assert_eq!(cell.raw, "n/a");
    assert_eq!(cell.row, 6);
}

#[test]
fn test_report_json_shape() {
    let grid = Grid::from(vec![
        vec!["SF1", "Plot No -->", "1", "2"],
        vec!["", "date"],
        vec!["Trees", "Mango", "0", "5"],
    ]);
    let report = TabularPlantParser::new(grid).analyze().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "plots_with_plants": 1,
            "total_plots": 2,
            "total_plants": 5,
            "plot_totals": { "2": 5 },
            "plant_totals": { "Mango": 5 },
            "plots_list": [2]
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// LOOKUP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_lookup_sample_first_match() {
    let result = sample_parser().lookup("MANGO", 8).unwrap();
    assert_eq!(result.matched_name, "Mango");
    assert_eq!(result.category, "Trees");
    assert_eq!(result.count, CellValue::Count(3));
    assert_eq!(result.other_matches, vec!["Mango Alphonso".to_string()]);
}

#[test]
fn test_lookup_sample_zero_and_text() {
    let parser = sample_parser();
    assert_eq!(parser.lookup("tulsi", 1).unwrap().count, CellValue::Count(0));
    assert_eq!(
        parser.lookup("hibiscus", 7).unwrap().count,
        CellValue::Text("n/a".to_string())
    );
}

#[test]
fn test_find_plant_in_plot_facade() {
    let path = test_data_path("sf1_sample.csv");
    assert!(find_plant_in_plot(&path, "neem", 25).is_some());
    assert!(find_plant_in_plot(&path, "neem", 99).is_none());
    assert!(find_plant_in_plot(&path, "baobab", 1).is_none());
    assert!(find_plant_in_plot(Path::new("nonexistent.csv"), "neem", 1).is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// DEGRADED INPUTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_analyze_file_missing_returns_none() {
    assert!(analyze_file(Path::new("nonexistent.csv")).is_none());
}

#[test]
fn test_analyze_file_header_only_returns_none() {
    assert!(analyze_file(&test_data_path("header_only.csv")).is_none());
}

#[test]
fn test_analyze_file_minimal() {
    let report = analyze_file(&test_data_path("minimal.csv")).unwrap();
    assert_eq!(report.total_plants, 5);
    assert_eq!(report.plots_list, vec![2]);
}

#[test]
fn test_from_path_missing_is_file_not_found() {
    let err = TabularPlantParser::from_path(Path::new("nonexistent.csv")).unwrap_err();
    assert!(matches!(err, InventoryError::FileNotFound(_)));
    assert!(err.is_reportable());
}

// ═══════════════════════════════════════════════════════════════════════════
// NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_normalize_sample_removes_every_zero() {
    let grid = read_grid(&test_data_path("sf1_sample.csv")).unwrap();
    let normalized = normalize_grid(&grid);

    assert_eq!(normalized.len(), grid.len());
    for (before, after) in grid.rows().iter().zip(normalized.rows()) {
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after) {
            if b.trim() == "0" {
                assert_eq!(a, "");
            } else {
                assert_eq!(a, b);
            }
        }
    }
    assert_eq!(normalize_grid(&normalized), normalized);
}

#[test]
fn test_normalize_does_not_change_analysis() {
    let grid = read_grid(&test_data_path("sf1_sample.csv")).unwrap();
    let before = TabularPlantParser::new(grid.clone()).analyze().unwrap();
    let after = TabularPlantParser::new(grid.normalized()).analyze().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_normalized_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("processed.csv");

    let grid = read_grid(&test_data_path("sf1_sample.csv")).unwrap();
    let normalized = grid.normalized();
    assert_eq!(write_grid(&output, &normalized).unwrap(), grid.len());
    assert_eq!(read_grid(&output).unwrap(), normalized);
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sample_grid_summary() {
    let summary = sample_parser().summary().unwrap();

    assert_eq!(summary.total_rows, 9);
    assert_eq!(summary.total_columns, 27);
    assert_eq!(
        summary.header_preview,
        vec!["SF1", "Plot No -->", "1", "2", "3"]
    );
    assert_eq!(
        summary.categories,
        vec!["Fruit Plants", "Herbs", "Shrubs", "Trees"]
    );
    assert_eq!(
        summary.zero_cells + summary.empty_cells + summary.data_cells,
        8 * 27
    );
}
