/// Errors that can occur while reading, transforming or classifying event tables
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Required column absent from the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column present but with a type that cannot be interpreted
    #[error("Column {column} cannot be read as {expected}")]
    InvalidColumnType {
        /// Column name
        column: String,
        /// Expected logical type
        expected: &'static str,
    },

    /// Text that is not one of the classification labels
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Malformed cut specification
    #[error("Invalid cut: {0}")]
    InvalidCut(String),

    /// Tables that were expected to share a schema do not
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Smearing could not produce a physical value
    #[error("Smearing error: {0}")]
    SmearingError(String),
}
