//! Plot inventory - plant counts from spreadsheet CSV exports
//!
//! Reads a two-header-row inventory export (plots as columns, plants as rows),
//! counts planted cells per plot and per plant, and rewrites the export with
//! zero cells blanked out.
//!
//! # Input layout
//!
//! - Row 0: a domain tag, a label, then one numeric header per plot
//! - Row 1: dates, ignored
//! - Rows 2+: category, plant name, then one count per plot
//!
//! A cell is planted when its trimmed text is an integer greater than zero.
//!
//! # Example
//!
//! ```no_run
//! use plot_inventory::core::TabularPlantParser;
//! use std::path::Path;
//!
//! let parser = TabularPlantParser::from_path(Path::new("plants.csv"))?;
//! let report = parser.analyze()?;
//!
//! println!("Plots with plants: {}", report.plots_with_plants);
//! println!("Total plants: {}", report.total_plants);
//! # Ok::<(), plot_inventory::error::InventoryError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use crate::core::{analyze_file, find_plant_in_plot, TabularPlantParser};
pub use error::{InventoryError, InventoryResult};
pub use types::{AnalysisReport, CellClass, CellValue, Grid, LookupResult, PlotColumns};
