//! Plant inventory analysis engine

pub mod plant_parser;

pub use plant_parser::TabularPlantParser;

use crate::types::{AnalysisReport, LookupResult};
use std::path::Path;
use tracing::warn;

/// Analyze the CSV at `path`, degrading every failure to `None`.
///
/// Missing files and grids too short to analyze are logged, never raised.
pub fn analyze_file(path: &Path) -> Option<AnalysisReport> {
    match TabularPlantParser::from_path(path).and_then(|parser| parser.analyze()) {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "analysis skipped");
            None
        }
    }
}

/// Look up `plant` in `plot` of the CSV at `path`; `None` when not found
pub fn find_plant_in_plot(path: &Path, plant: &str, plot: u32) -> Option<LookupResult> {
    match TabularPlantParser::from_path(path).and_then(|parser| parser.lookup(plant, plot)) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(path = %path.display(), plant, plot, error = %e, "lookup failed");
            None
        }
    }
}
