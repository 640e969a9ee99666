use crate::error::InventoryResult;
use crate::types::Grid;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Blank out every cell whose trimmed text is "0".
///
/// Returns a new grid of the same shape; the source is untouched and running
/// the transform twice gives the same result as running it once.
///
/// The match is trimmed, so `" 0 "` is blanked too. This keeps the output in
/// line with [`classify_cell`](crate::parser::classify_cell), which never
/// counts such a cell as planted. [`GridSummary::zero_cells`] counts only
/// exact "0" cells, so it can be lower than the number of cells blanked here.
///
/// [`GridSummary::zero_cells`]: crate::types::GridSummary::zero_cells
pub fn normalize_grid(grid: &Grid) -> Grid {
    Grid::new(
        grid.rows()
            .iter()
            .map(|row| row.iter().map(|cell| normalize_cell(cell)).collect())
            .collect(),
    )
}

fn normalize_cell(cell: &str) -> String {
    if cell.trim() == "0" {
        String::new()
    } else {
        cell.to_string()
    }
}

/// Write `grid` as CSV to `path`, returning the number of rows written
pub fn write_grid(path: &Path, grid: &Grid) -> InventoryResult<usize> {
    let file = File::create(path)?;
    let rows = write_grid_to_writer(file, grid)?;
    debug!(path = %path.display(), rows, "wrote grid");
    Ok(rows)
}

/// Write `grid` as CSV: comma-delimited, minimal quoting, CRLF line endings.
///
/// An empty row is written as a bare line break.
pub fn write_grid_to_writer<W: Write>(writer: W, grid: &Grid) -> InventoryResult<usize> {
    let mut builder = csv::WriterBuilder::new();
    // Rows keep their own width, like the export they came from.
    builder.flexible(true).terminator(csv::Terminator::CRLF);
    let mut csv_writer = builder.from_writer(writer);

    for row in grid.rows() {
        if row.is_empty() {
            csv_writer.flush()?;
            // csv::Writer has no get_mut; take the inner writer out and back.
            let mut inner = csv_writer.into_inner().map_err(|e| e.into_error())?;
            inner.write_all(b"\r\n")?;
            csv_writer = builder.from_writer(inner);
        } else {
            csv_writer.write_record(row)?;
        }
    }
    csv_writer.flush()?;

    Ok(grid.len())
}
