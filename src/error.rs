use std::path::PathBuf;

/// Problems with a single roll row.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    /// A required column is absent from the row.
    #[error("missing field {field}")]
    MissingField { field: &'static str },

    /// A numeric column holds something that is not a number.
    #[error("field {field} is not numeric: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised only when rows are configured to abort the batch.
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: ParseError,
    },

    #[error("geometry file {}: {message}", .path.display())]
    Geometry { path: PathBuf, message: String },
}
