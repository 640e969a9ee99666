use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

//==============================================================================
// Grid
//==============================================================================

/// Raw rows × columns of text cells, as read from the CSV export.
///
/// Row 0 is the header row (category tag, label, then plot numbers), row 1 is
/// the date row and rows 2+ are plant rows. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Index of the header row
    pub const HEADER_ROW: usize = 0;
    /// Index of the first plant row (row 1 is the date row)
    pub const DATA_START: usize = 2;
    /// Header + date + at least one plant row
    pub const MIN_ANALYSIS_ROWS: usize = 3;
    /// Header + date
    pub const MIN_LOOKUP_ROWS: usize = 2;

    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row, or an empty slice for an empty grid
    pub fn header(&self) -> &[String] {
        self.rows
            .get(Self::HEADER_ROW)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Plant rows with their grid index, skipping header and date rows
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(Self::DATA_START)
            .map(|(i, row)| (i, row.as_slice()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Copy of this grid with zero cells blanked out
    pub fn normalized(&self) -> Grid {
        crate::writer::normalize_grid(self)
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for Grid {
    fn from(rows: Vec<Vec<S>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

//==============================================================================
// Plot columns
//==============================================================================

/// Plot number → column index, in header order.
///
/// A plot number repeated in the header keeps its first position but points
/// at the last column carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotColumns {
    entries: Vec<(u32, usize)>,
}

impl PlotColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, plot: u32, column: usize) {
        match self.entries.iter_mut().find(|(p, _)| *p == plot) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((plot, column)),
        }
    }

    pub fn get(&self, plot: u32) -> Option<usize> {
        self.entries
            .iter()
            .find(|(p, _)| *p == plot)
            .map(|(_, col)| *col)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (plot, column) pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn min_plot(&self) -> Option<u32> {
        self.entries.iter().map(|(p, _)| *p).min()
    }

    pub fn max_plot(&self) -> Option<u32> {
        self.entries.iter().map(|(p, _)| *p).max()
    }
}

impl Serialize for PlotColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (plot, col) in &self.entries {
            map.serialize_entry(plot, col)?;
        }
        map.end()
    }
}

//==============================================================================
// Cell classification
//==============================================================================

/// How a single plot cell is read.
///
/// Only `Planted` contributes to totals; the other variants are kept apart so
/// callers can audit data quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    /// Blank or whitespace-only
    Empty,
    /// Literal "0"
    Zero,
    /// Integer strictly greater than zero, up to `u64::MAX`
    Planted(u64),
    /// Integer that is zero or negative but not the literal "0" (e.g. "00", "-2")
    NonPositive(i64),
    /// Non-empty text that is not an integer, or one too large to count
    Unparseable,
}

impl CellClass {
    pub fn is_planted(&self) -> bool {
        matches!(self, CellClass::Planted(_))
    }

    pub fn planted_count(&self) -> Option<u64> {
        match self {
            CellClass::Planted(n) => Some(*n),
            _ => None,
        }
    }
}

//==============================================================================
// Records and tallies
//==============================================================================

/// One planted cell: `count` plants of `plant` in `plot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantRecord {
    pub category: String,
    pub plant: String,
    pub plot: u32,
    pub count: u64,
}

/// A plot cell holding text that could not be read as a count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparseableCell {
    pub row: usize,
    pub plot: u32,
    pub plant: String,
    pub raw: String,
}

/// Running sums keyed by `K`, remembering first-encounter order.
///
/// Ranking is a stable sort on that order, so equal counts stay in the order
/// they were first seen.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` under `key` and return the new sum for that key.
    ///
    /// Returns `None` and leaves the tally unchanged when the sum would
    /// overflow.
    pub fn add(&mut self, key: K, amount: u64) -> Option<u64> {
        match self.index.get(&key) {
            Some(&i) => {
                let sum = self.entries[i].1.checked_add(amount)?;
                self.entries[i].1 = sum;
                Some(sum)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
                Some(amount)
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all values
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Entries in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// All entries by descending value, ties in encounter order
    pub fn ranked(&self) -> Vec<(&K, u64)> {
        let mut ranked: Vec<(&K, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<(&K, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl<K: PartialEq> PartialEq for Tally<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq> Eq for Tally<K> {}

impl<K: Serialize> Serialize for Tally<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

//==============================================================================
// Analysis results
//==============================================================================

/// Aggregates for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// Number of plots with at least one planted cell
    pub plots_with_plants: usize,
    /// Number of plot columns found in the header
    pub total_plots: usize,
    /// Sum of every planted count
    pub total_plants: u64,
    pub plot_totals: Tally<u32>,
    pub plant_totals: Tally<String>,
    /// Plots with plants, ascending
    pub plots_list: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unparseable: Vec<UnparseableCell>,
    #[serde(skip)]
    pub plot_columns: PlotColumns,
    #[serde(skip)]
    pub records: Vec<PlantRecord>,
}

impl AnalysisReport {
    pub fn empty_plots(&self) -> usize {
        self.total_plots.saturating_sub(self.plots_with_plants)
    }

    pub fn top_plants(&self, n: usize) -> Vec<(&String, u64)> {
        self.plant_totals.top(n)
    }

    pub fn top_plots(&self, n: usize) -> Vec<(&u32, u64)> {
        self.plot_totals.top(n)
    }
}

/// Value found by a plant/plot lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Integer value; blank and "0" cells read as 0
    Count(i64),
    /// Non-numeric text, returned as-is
    Text(String),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Count(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Result of looking up one plant in one plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    /// The search text as given
    pub plant: String,
    /// Plant name of the matched row
    pub matched_name: String,
    pub category: String,
    pub plot: u32,
    pub column: usize,
    pub count: CellValue,
    pub raw_value: String,
    /// Plant names of later rows that also match the search text
    pub other_matches: Vec<String>,
}

impl LookupResult {
    pub fn is_ambiguous(&self) -> bool {
        !self.other_matches.is_empty()
    }
}

/// Shape and cell statistics of a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridSummary {
    pub total_rows: usize,
    /// Width of the header row
    pub total_columns: usize,
    /// First few header cells
    pub header_preview: Vec<String>,
    /// Cells whose exact text is "0" (rows 1+)
    pub zero_cells: usize,
    /// Blank or whitespace-only cells (rows 1+)
    pub empty_cells: usize,
    /// Everything else (rows 1+)
    pub data_cells: usize,
    /// Distinct non-empty categories of plant rows, sorted
    pub categories: Vec<String>,
}

//==============================================================================
// Report configuration
//==============================================================================

/// Display limits for the console summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Plot numbers listed before "... and N more plots"
    pub plot_list_limit: usize,
    /// Length of the top plants / top plots rankings
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            plot_list_limit: 20,
            top_n: 10,
        }
    }
}
