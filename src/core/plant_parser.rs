//! Plant inventory analysis over a parsed [`Grid`]

use crate::error::{InventoryError, InventoryResult};
use crate::parser::{
    classify_cell, first_plot_column, is_zero_or_blank, read_grid, scan_plot_columns,
};
use crate::types::{
    AnalysisReport, CellClass, CellValue, Grid, GridSummary, LookupResult, PlantRecord,
    UnparseableCell,
};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Number of header cells kept in [`GridSummary::header_preview`]
const HEADER_PREVIEW_LEN: usize = 5;

/// Interprets a two-header-row plant inventory grid.
///
/// Every call works on local accumulators, so one parser can be queried any
/// number of times.
#[derive(Debug, Clone)]
pub struct TabularPlantParser {
    grid: Grid,
}

impl TabularPlantParser {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Read `path` and wrap the resulting grid
    pub fn from_path(path: &Path) -> InventoryResult<Self> {
        Ok(Self::new(read_grid(path)?))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Count planted cells per plot and per plant.
    ///
    /// Plant rows with an empty name are skipped, and so are plot cells past
    /// the end of a short row. Cells that are not planted never contribute to
    /// a total; non-numeric ones are listed in
    /// [`AnalysisReport::unparseable`].
    ///
    /// Fails with [`InventoryError::CountOverflow`] when a total no longer
    /// fits in a `u64`.
    pub fn analyze(&self) -> InventoryResult<AnalysisReport> {
        if self.grid.len() < Grid::MIN_ANALYSIS_ROWS {
            return Err(InventoryError::InvalidGrid {
                expected: Grid::MIN_ANALYSIS_ROWS,
                found: self.grid.len(),
            });
        }

        let plot_columns = scan_plot_columns(self.grid.header())?;
        debug!(
            plots = plot_columns.len(),
            first = ?plot_columns.min_plot(),
            last = ?plot_columns.max_plot(),
            "found plot columns"
        );

        let mut report = AnalysisReport {
            total_plots: plot_columns.len(),
            ..Default::default()
        };
        let mut planted_plots = BTreeSet::new();

        for (row_index, row) in self.grid.data_rows() {
            if row.len() < 2 {
                continue;
            }
            let category = row[0].trim();
            let plant = row[1].trim();
            if plant.is_empty() {
                continue;
            }

            for (plot, col) in plot_columns.iter() {
                let Some(raw) = row.get(col) else {
                    continue;
                };

                match classify_cell(raw) {
                    CellClass::Planted(count) => {
                        let overflow = || InventoryError::CountOverflow {
                            plant: plant.to_string(),
                            plot,
                        };
                        planted_plots.insert(plot);
                        report.total_plants = report
                            .total_plants
                            .checked_add(count)
                            .ok_or_else(overflow)?;
                        report.plot_totals.add(plot, count).ok_or_else(overflow)?;
                        report
                            .plant_totals
                            .add(plant.to_string(), count)
                            .ok_or_else(overflow)?;
                        report.records.push(PlantRecord {
                            category: category.to_string(),
                            plant: plant.to_string(),
                            plot,
                            count,
                        });
                    }
                    CellClass::Unparseable => report.unparseable.push(UnparseableCell {
                        row: row_index,
                        plot,
                        plant: plant.to_string(),
                        raw: raw.trim().to_string(),
                    }),
                    CellClass::Empty | CellClass::Zero | CellClass::NonPositive(_) => {}
                }
            }
        }

        report.plots_with_plants = planted_plots.len();
        report.plots_list = planted_plots.into_iter().collect();
        report.plot_columns = plot_columns;

        debug!(
            records = report.records.len(),
            total_plants = report.total_plants,
            unparseable = report.unparseable.len(),
            "analysis complete"
        );
        Ok(report)
    }

    /// Value of the first plant row whose name contains `plant`
    /// (case-insensitive) at the first header column naming `plot`.
    ///
    /// Blank and "0" cells read as a count of 0; other non-numeric text comes
    /// back as [`CellValue::Text`]. Later rows matching the same text are
    /// listed in [`LookupResult::other_matches`].
    pub fn lookup(&self, plant: &str, plot: u32) -> InventoryResult<LookupResult> {
        if self.grid.len() < Grid::MIN_LOOKUP_ROWS {
            return Err(InventoryError::InvalidGrid {
                expected: Grid::MIN_LOOKUP_ROWS,
                found: self.grid.len(),
            });
        }

        let column = first_plot_column(self.grid.header(), plot)?
            .ok_or(InventoryError::PlotNotFound(plot))?;

        let needle = plant.to_lowercase();
        let mut matches = self
            .grid
            .data_rows()
            .filter(|(_, row)| row.len() > 1 && row[1].to_lowercase().contains(&needle));

        let (row_index, row) = matches
            .next()
            .ok_or_else(|| InventoryError::PlantNotFound(plant.to_string()))?;
        let other_matches: Vec<String> = matches.map(|(_, other)| other[1].clone()).collect();

        let raw_value = row
            .get(column)
            .ok_or_else(|| InventoryError::ColumnOutOfRange {
                plant: row[1].clone(),
                column,
            })?
            .trim()
            .to_string();

        let count = if is_zero_or_blank(&raw_value) {
            CellValue::Count(0)
        } else {
            match raw_value.parse::<i64>() {
                Ok(n) => CellValue::Count(n),
                Err(_) => CellValue::Text(raw_value.clone()),
            }
        };

        let category = if row[0].is_empty() {
            "Unknown".to_string()
        } else {
            row[0].clone()
        };

        debug!(row = row_index, column, others = other_matches.len(), "lookup hit");
        Ok(LookupResult {
            plant: plant.to_string(),
            matched_name: row[1].clone(),
            category,
            plot,
            column,
            count,
            raw_value,
            other_matches,
        })
    }

    /// Shape of the grid and a zero/empty/data breakdown of its cells.
    ///
    /// Only a cell whose text is exactly "0" counts as zero here; `" 0 "` is a
    /// data cell. Blank and whitespace-only cells count as empty.
    pub fn summary(&self) -> InventoryResult<GridSummary> {
        if self.grid.is_empty() {
            return Err(InventoryError::InvalidGrid {
                expected: 1,
                found: 0,
            });
        }

        let header = self.grid.header();
        let mut summary = GridSummary {
            total_rows: self.grid.len(),
            total_columns: header.len(),
            header_preview: header.iter().take(HEADER_PREVIEW_LEN).cloned().collect(),
            ..Default::default()
        };

        for row in self.grid.rows().iter().skip(1) {
            for cell in row {
                if cell == "0" {
                    summary.zero_cells += 1;
                } else if cell.trim().is_empty() {
                    summary.empty_cells += 1;
                } else {
                    summary.data_cells += 1;
                }
            }
        }

        let categories: BTreeSet<&str> = self
            .grid
            .data_rows()
            .filter_map(|(_, row)| row.first())
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect();
        summary.categories = categories.into_iter().map(str::to_string).collect();

        Ok(summary)
    }
}
