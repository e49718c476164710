//! # Candidates ETL - recruitment CSV to relational tables
//!
//! Reads a `;`-delimited candidate export, standardizes its headers, numbers
//! the rows, flags hired candidates, groups technologies into categories,
//! and loads both the raw and the enriched rows into a database.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│ CandidatesTransformed │
//! │   (UTF-8)   │     │   (Table)   │     │ (4 columns) │     │   + output CSV        │
//! └─────────────┘     └──────┬──────┘     └─────────────┘     └──────────────────────┘
//!                            │ renamed headers
//!                            ▼
//!                     ┌─────────────┐
//!                     │CandidatesRaw│
//!                     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Connection settings from the environment
//! - [`db`] - Connection factory, dialects and table loading
//! - [`models`] - Candidate records and table schemas
//! - [`parser`] - CSV ⇄ in-memory table
//! - [`transform`] - Column operations and the pipeline
//! - [`validation`] - Insert-time NOT NULL checks
//! - [`logs`] - Status lines

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Settings and storage
pub mod config;
pub mod db;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, CsvError, DatabaseError, PipelineError, TransformError};

pub use config::DatabaseConfig;
pub use db::{Database, Dialect, LoadMode};

pub use models::{
    CandidateRaw, CandidateTransformed, ColumnDef, SqlType, TableSchema, CANDIDATES_RAW,
    CANDIDATES_TRANSFORMED,
};

pub use parser::{read_table, read_table_file, write_table, write_table_file, Table, DEFAULT_DELIMITER};

pub use transform::{
    categorize, is_hired, mapping_description, run_pipeline, transform_file, CandidateTransformer,
    PipelineOptions, PipelineSummary, TransformStats, COLUMN_RENAMES, HIRING_THRESHOLD,
    OTHER_CATEGORY, TECHNOLOGY_CATEGORIES,
};

pub use validation::{validate_raw, validate_transformed};
