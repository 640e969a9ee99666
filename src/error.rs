use std::path::PathBuf;
use thiserror::Error;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file is empty or invalid: expected at least {expected} rows, found {found}")]
    InvalidGrid { expected: usize, found: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Plot {0} not found in headers")]
    PlotNotFound(u32),

    #[error("Plant '{0}' not found in CSV")]
    PlantNotFound(String),

    #[error("Column index {column} is out of range for plant '{plant}'")]
    ColumnOutOfRange { plant: String, column: usize },

    #[error("Plant count overflow for '{plant}' in plot {plot}")]
    CountOverflow { plant: String, plot: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InventoryError {
    /// Errors that degrade to a console diagnostic and an empty result
    /// instead of failing the process: unreadable input and lookup misses.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            InventoryError::FileNotFound(_)
                | InventoryError::Csv(_)
                | InventoryError::InvalidGrid { .. }
                | InventoryError::PlotNotFound(_)
                | InventoryError::PlantNotFound(_)
                | InventoryError::ColumnOutOfRange { .. }
                | InventoryError::CountOverflow { .. }
        )
    }
}
