//! Error types for the candidates ETL.
//!
//! - [`ConfigError`] - Missing or invalid connection settings
//! - [`CsvError`] - CSV reading and writing errors
//! - [`TransformError`] - Column transformation errors
//! - [`DatabaseError`] - Connection and query errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading the database settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is absent or empty.
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    /// Variable is present but cannot be used.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Dialect is not one of postgresql, mysql or sqlite.
    #[error("Unsupported database dialect: {0}")]
    UnsupportedDialect(String),
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors during CSV reading and writing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to open, read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// File has no header row.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Row cannot be converted into a typed record.
    #[error("Line {line}: cannot read record: {message}")]
    Deserialize { line: u64, message: String },

    /// Failed to serialize the table.
    #[error("Failed to write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.kind() {
            csv::ErrorKind::Deserialize { err: de, .. } => CsvError::Deserialize {
                line,
                message: de.to_string(),
            },
            _ => CsvError::Parse {
                line,
                message: err.to_string(),
            },
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during column transformations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column required by the step is not in the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be interpreted.
    #[error("Row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

// =============================================================================
// Database Errors
// =============================================================================

/// Errors from the database layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Settings cannot be turned into a connection url.
    #[error("Invalid connection settings: {0}")]
    Config(#[from] ConfigError),

    /// Could not open a connection.
    #[error("Failed to connect to the database: {0}")]
    Connect(String),

    /// Statement execution failed.
    #[error("Query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::Query(err.to_string())
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Records failed the NOT NULL checks.
    #[error("{} record(s) failed validation: {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let transform_err = TransformError::MissingColumn("Technology".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("Technology"));

        let config_err = ConfigError::MissingVar("PGHOST".into());
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("PGHOST"));
    }

    #[test]
    fn test_invalid_value_format() {
        let err = TransformError::InvalidValue {
            row: 3,
            column: "YOE".into(),
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 3"));
        assert!(msg.contains("'YOE'"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_validation_error_lists_rows() {
        let err = PipelineError::Validation(vec!["row 1: Email is empty".into(), "row 4: YOE is negative".into()]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 record(s)"));
        assert!(msg.contains("row 4"));
    }
}
