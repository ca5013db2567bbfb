use thiserror::Error;

/// Error type shared by frame, decomposition and plotting operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[source] std::io::Error),

    #[error("csv error")]
    Csv(#[source] csv::Error),

    #[error("json error")]
    Json(#[source] serde_json::Error),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("column type mismatch: column {name}, expected {expected:?}, found {found:?}")]
    ColumnTypeMismatch {
        name: String,
        expected: crate::frame::ColumnType,
        found: crate::frame::ColumnType,
    },

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("missing values: {0}")]
    MissingValues(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty data: {0}")]
    Empty(String),

    #[error("data format error: {0}")]
    Format(String),

    #[error("visualization error: {0}")]
    Visualization(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

#[cfg(feature = "visualization")]
impl<E: std::error::Error + Send + Sync + 'static>
    From<plotters::drawing::DrawingAreaErrorKind<E>> for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("plot rendering failed: {}", err))
    }
}
