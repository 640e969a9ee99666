use crate::error::{InventoryError, InventoryResult};
use crate::types::{CellClass, Grid, PlotColumns};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a plant inventory CSV export into a [`Grid`].
///
/// The whole file is loaded at once. Rows keep their own length, so a short
/// date row or a truncated plant row is not an error.
///
/// # Returns
/// * `Ok(Grid)` - Every record of the file, header included
/// * `Err(InventoryError::FileNotFound)` - `path` does not exist
/// * `Err(InventoryError::Csv)` - Malformed quoting or invalid UTF-8
///
/// # Example
/// ```no_run
/// use plot_inventory::parser::read_grid;
/// use std::path::Path;
///
/// let grid = read_grid(Path::new("plants.csv"))?;
/// println!("Rows: {}", grid.len());
/// # Ok::<(), plot_inventory::error::InventoryError>(())
/// ```
pub fn read_grid(path: &Path) -> InventoryResult<Grid> {
    if !path.exists() {
        return Err(InventoryError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let grid = read_grid_from_reader(file)?;
    debug!(path = %path.display(), rows = grid.len(), "read grid");
    Ok(grid)
}

/// Read CSV records from any reader into a [`Grid`].
///
/// Blank lines are kept as empty rows so row positions and the shape of a
/// rewritten file match the input line for line.
pub fn read_grid_from_reader<R: Read>(mut reader: R) -> InventoryResult<Grid> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        // Header and date rows are interpreted by position, not by the csv crate.
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_slice());

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut consumed = 0;
    loop {
        let has_record = csv_reader.read_record(&mut record)?;
        let end = if has_record {
            csv_reader.position().byte() as usize
        } else {
            input.len()
        };

        // The csv reader skips blank lines before a record without reporting
        // them; they show up as line breaks at the start of the consumed span.
        let blank = skipped_blank_lines(&input, consumed, end);
        rows.extend(std::iter::repeat_with(Vec::new).take(blank));
        consumed = end;

        if !has_record {
            break;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Grid::new(rows))
}

/// Count blank lines at the start of `input[start..end]`.
///
/// A `\n` left over from the previous record's `\r\n` terminator is not a
/// blank line.
fn skipped_blank_lines(input: &[u8], start: usize, end: usize) -> usize {
    let span = &input[start..end];
    let run_len = span
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .count();
    let mut run = &span[..run_len];

    if start > 0 && input[start - 1] == b'\r' && run.first() == Some(&b'\n') {
        run = &run[1..];
    }

    let mut lines = 0;
    while let Some((&first, rest)) = run.split_first() {
        run = match (first, rest.first()) {
            (b'\r', Some(b'\n')) => &rest[1..],
            _ => rest,
        };
        lines += 1;
    }
    lines
}

/// Find plot columns: header cells whose trimmed text is all digits.
///
/// Digit runs too large for a plot number are skipped.
pub fn scan_plot_columns(header: &[String]) -> InventoryResult<PlotColumns> {
    let plot_pattern = Regex::new(r"^\d+$")
        .map_err(|e| InventoryError::Parse(format!("Regex error: {}", e)))?;

    let mut plots = PlotColumns::new();
    for (col, cell) in header.iter().enumerate() {
        let text = cell.trim();
        if !plot_pattern.is_match(text) {
            continue;
        }
        match text.parse::<u32>() {
            Ok(plot) => plots.insert(plot, col),
            Err(e) => debug!(column = col, header = text, error = %e, "skipping plot header"),
        }
    }

    Ok(plots)
}

/// Column of the first header cell naming `plot`.
///
/// Unlike [`scan_plot_columns`], a plot number repeated in the header resolves
/// to its first column.
pub fn first_plot_column(header: &[String], plot: u32) -> InventoryResult<Option<usize>> {
    let plot_pattern = Regex::new(r"^\d+$")
        .map_err(|e| InventoryError::Parse(format!("Regex error: {}", e)))?;

    Ok(header.iter().position(|cell| {
        let text = cell.trim();
        plot_pattern.is_match(text) && text.parse::<u32>() == Ok(plot)
    }))
}

/// Classify one plot cell.
///
/// A cell is planted when its trimmed text is an integer strictly greater than
/// zero. Anything else is not planted; the variant says why.
pub fn classify_cell(raw: &str) -> CellClass {
    let text = raw.trim();
    if text.is_empty() {
        return CellClass::Empty;
    }
    if text == "0" {
        return CellClass::Zero;
    }

    match text.parse::<i64>() {
        Ok(n) if n > 0 => CellClass::Planted(n as u64),
        Ok(n) => CellClass::NonPositive(n),
        // Positive counts past i64::MAX still fit a u64.
        Err(_) => text
            .parse::<u64>()
            .map_or(CellClass::Unparseable, CellClass::Planted),
    }
}

/// True when a cell reads as zero plants for display: blank or "0"
pub fn is_zero_or_blank(raw: &str) -> bool {
    let text = raw.trim();
    text.is_empty() || text == "0"
}
