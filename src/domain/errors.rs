use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid column width: {0}")]
    InvalidColumnWidth(String),
    #[error("A sheet needs at least one column")]
    NoColumns,
    #[error("Row {row} has {cells} cells but the sheet has {columns} columns")]
    ShortRow {
        row: usize,
        cells: usize,
        columns: usize,
    },
    #[error("Could not read config: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("Invalid config format - {0}")]
    ConfigFormat(#[from] serde_json::Error),
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("Could not parse pasted data: {0}")]
    Paste(#[from] csv::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
