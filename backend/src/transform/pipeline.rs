//! End-to-end batch run: CSV → raw table, CSV → transform → output CSV and
//! transformed table.
//!
//! # Example
//!
//! ```rust,ignore
//! use candidates_etl::{run_pipeline, Database, DatabaseConfig, PipelineOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect(&DatabaseConfig::from_env()?).await?;
//!     let summary = run_pipeline(
//!         Path::new("candidates.csv"),
//!         &PipelineOptions::default(),
//!         Some(&db),
//!     ).await?;
//!
//!     println!("Hired {} of {} candidates", summary.hired, summary.rows);
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::transformer::CandidateTransformer;
use crate::db::{Database, LoadMode};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::COL_TECHNOLOGY;
use crate::parser::{format_delimiter, DEFAULT_DELIMITER};
use crate::validation::{validate_batch, validate_raw, validate_transformed};

/// Failing rows reported in a validation error.
const MAX_REPORTED_ROWS: usize = 10;

/// Options for a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOptions {
    /// Where to write the transformed CSV, if anywhere
    pub output: Option<PathBuf>,

    /// Load the renamed input into `CandidatesRaw`
    pub load_raw: bool,

    /// Load the enriched rows into `CandidatesTransformed`
    pub load_transformed: bool,

    /// Keep or delete existing rows before loading
    #[serde(skip)]
    pub mode: LoadMode,

    /// Field delimiter for input and output
    pub delimiter: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output: None,
            load_raw: true,
            load_transformed: true,
            mode: LoadMode::Append,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineSummary {
    /// Data rows read from the input
    pub rows: usize,

    /// Input column headers, as found in the file
    pub headers: Vec<String>,

    /// Candidates with Hired = 1
    pub hired: usize,

    /// Rows whose technology fell back to "Other"
    pub unmapped_technologies: usize,

    /// Row count per technology category
    pub categories: BTreeMap<String, usize>,

    /// Rows inserted into `CandidatesRaw`
    pub raw_loaded: Option<u64>,

    /// Rows inserted into `CandidatesTransformed`
    pub transformed_loaded: Option<u64>,

    /// Transformed CSV path, if written
    pub output: Option<PathBuf>,
}

impl PipelineSummary {
    /// Pretty-printed JSON, as written by `--json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Transform a CSV file into another CSV file, without touching a database.
pub fn transform_file(input: &Path, output: &Path) -> PipelineResult<PipelineSummary> {
    let mut transformer = read_input(input, DEFAULT_DELIMITER)?;
    let mut summary = PipelineSummary {
        rows: transformer.data().row_count(),
        headers: transformer.data().headers().to_vec(),
        ..Default::default()
    };

    transform(&mut transformer, &mut summary)?;
    save(&transformer, output, &mut summary)?;
    Ok(summary)
}

/// Run the whole batch.
///
/// Steps:
/// 1. Read the CSV
/// 2. Standardize headers and load the raw rows (if `db` and `load_raw`)
/// 3. Generate IDs, compute Hired, categorize Technology
/// 4. Save the output CSV (if `output`)
/// 5. Load the transformed rows (if `db` and `load_transformed`)
pub async fn run_pipeline(
    input: &Path,
    options: &PipelineOptions,
    db: Option<&Database>,
) -> PipelineResult<PipelineSummary> {
    let mut transformer = read_input(input, options.delimiter)?;
    let mut summary = PipelineSummary {
        rows: transformer.data().row_count(),
        headers: transformer.data().headers().to_vec(),
        ..Default::default()
    };

    if let Some(db) = db {
        db.create_tables().await?;
    }

    let renamed = transformer.standardize_column_names();
    log_success(format!("Standardized {} column names", renamed));

    if let (Some(db), true) = (db, options.load_raw) {
        log_info("🗄️  Loading raw candidates...");
        let records = transformer.raw_records()?;
        validate_batch(&records, validate_raw, MAX_REPORTED_ROWS).map_err(PipelineError::Validation)?;
        let loaded = db.insert_raw(&records, options.mode).await?;
        log_success(format!("{} rows loaded into CandidatesRaw", loaded));
        summary.raw_loaded = Some(loaded);
    }

    transform(&mut transformer, &mut summary)?;

    if let Some(ref output) = options.output {
        save(&transformer, output, &mut summary)?;
    }

    if let (Some(db), true) = (db, options.load_transformed) {
        log_info("🗄️  Loading transformed candidates...");
        let records = transformer.transformed_records()?;
        validate_batch(&records, validate_transformed, MAX_REPORTED_ROWS)
            .map_err(PipelineError::Validation)?;
        let loaded = db.insert_transformed(&records, options.mode).await?;
        log_success(format!("{} rows loaded into CandidatesTransformed", loaded));
        summary.transformed_loaded = Some(loaded);
    }

    log_success("Pipeline finished");
    Ok(summary)
}

fn read_input(input: &Path, delimiter: u8) -> PipelineResult<CandidateTransformer> {
    log_info(format!("📖 Reading CSV file {}...", input.display()));
    let transformer = CandidateTransformer::from_path_with_delimiter(input, delimiter)?;
    let table = transformer.data();

    log_success(format!("Separator: '{}'", format_delimiter(delimiter)));
    log_success(format!("Read {} rows", table.row_count()));
    log_info(format!("📋 CSV has {} columns:", table.headers().len()));
    for (i, col) in table.headers().iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }
    if table.is_empty() {
        log_warning("CSV file has no data rows");
    }
    Ok(transformer)
}

/// ID, Hired and Technology steps; column names must already be standard.
fn transform(transformer: &mut CandidateTransformer, summary: &mut PipelineSummary) -> PipelineResult<()> {
    log_info("⚙️  Transforming...");
    transformer.standardize_column_names();
    transformer.generate_ids();
    log_success(format!("Assigned IDs 1..{}", transformer.data().row_count()));

    summary.hired = transformer.calculate_hiring_status()?;
    log_success(format!("{} of {} candidates hired", summary.hired, summary.rows));

    summary.unmapped_technologies = transformer.categorize_technology()?;
    if summary.unmapped_technologies > 0 {
        log_warning(format!(
            "{} technology labels not in the mapping, set to Other",
            summary.unmapped_technologies
        ));
    }

    summary.categories = category_counts(transformer);
    for (category, count) in &summary.categories {
        log_info_indent(format!("{}: {}", category, count), 1);
    }
    Ok(())
}

fn save(transformer: &CandidateTransformer, output: &Path, summary: &mut PipelineSummary) -> PipelineResult<()> {
    transformer.save_transformed_data(output)?;
    log_success(format!("💾 Output written to: {}", output.display()));
    summary.output = Some(output.to_path_buf());
    Ok(())
}

fn category_counts(transformer: &CandidateTransformer) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if let Some(values) = transformer.data().column(COL_TECHNOLOGY) {
        for value in values {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CANDIDATES_RAW, CANDIDATES_TRANSFORMED};
    use crate::parser::read_table_file;
    use std::fs;

    const SAMPLE: &str = "\
First Name;Last Name;Email;Application Date;Country;YOE;Seniority;Technology;Code Challenge Score;Technical Interview Score
Bobby;Bartell;bobby@example.com;2021-02-26;Norway;2;Intern;Data Engineer;3;3
Cedric;Wiza;cedric@example.com;2021-09-09;Panama;10;Intern;Data Engineer;7;7
Treva;Kuhlman;treva@example.com;2020-04-14;Belarus;4;Mid-Level;Client Success;9;8
";

    fn write_sample(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("candidates.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::default();
        assert!(opts.output.is_none());
        assert!(opts.load_raw && opts.load_transformed);
        assert_eq!(opts.mode, LoadMode::Append);
        assert_eq!(opts.delimiter, b';');
    }

    #[test]
    fn test_transform_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir, SAMPLE);
        let output = dir.path().join("out.csv");

        let summary = transform_file(&input, &output).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.hired, 2);
        assert_eq!(summary.categories["Data Engineering"], 2);
        assert_eq!(summary.categories["Customer Support"], 1);

        let table = read_table_file(&output, b';').unwrap();
        assert_eq!(table.column("ID").unwrap(), vec!["1", "2", "3"]);
        assert_eq!(table.column("Hired").unwrap(), vec!["0", "1", "1"]);
        assert!(table.column("First Name").is_none());
    }

    #[test]
    fn test_transform_file_blank_score() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{}Ann;Lee;ann@example.com;2022-05-01;Peru;3;Junior;DevOps;;9\n",
            SAMPLE
        );
        let input = write_sample(&dir, &content);
        let output = dir.path().join("out.csv");

        let summary = transform_file(&input, &output).unwrap();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.hired, 2);

        let table = read_table_file(&output, b';').unwrap();
        assert_eq!(table.column("Hired").unwrap(), vec!["0", "1", "1", "0"]);
    }

    #[test]
    fn test_summary_json_parses() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir, SAMPLE);
        let output = dir.path().join("out.csv");

        let summary = transform_file(&input, &output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["rows"], 3);
        assert_eq!(value["hired"], 2);
        assert_eq!(value["categories"]["Data Engineering"], 2);
        assert!(value["raw_loaded"].is_null());
    }

    #[test]
    fn test_missing_input_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let err = transform_file(&dir.path().join("nope.csv"), &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[tokio::test]
    async fn test_run_without_database() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir, SAMPLE);

        let summary = run_pipeline(&input, &PipelineOptions::default(), None).await.unwrap();
        assert_eq!(summary.rows, 3);
        assert!(summary.raw_loaded.is_none());
        assert!(summary.transformed_loaded.is_none());
        assert!(summary.output.is_none());
    }

    #[tokio::test]
    async fn test_run_loads_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(&dir, SAMPLE);
        let db = Database::connect_url("sqlite::memory:").await.unwrap();

        let options = PipelineOptions {
            output: Some(dir.path().join("out.csv")),
            ..Default::default()
        };
        let summary = run_pipeline(&input, &options, Some(&db)).await.unwrap();

        assert_eq!(summary.raw_loaded, Some(3));
        assert_eq!(summary.transformed_loaded, Some(3));
        assert_eq!(db.count(&CANDIDATES_RAW).await.unwrap(), 3);
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 3);

        let raw_tech: Vec<String> =
            sqlx::query_scalar(r#"SELECT "Technology" FROM "CandidatesRaw" ORDER BY "ID""#)
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(raw_tech[2], "Client Success");

        let categories: Vec<String> =
            sqlx::query_scalar(r#"SELECT "Technology" FROM "CandidatesTransformed" ORDER BY "ID""#)
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(categories[2], "Customer Support");

        // a second run in replace mode keeps one batch per table
        let options = PipelineOptions { mode: LoadMode::Replace, ..Default::default() };
        run_pipeline(&input, &options, Some(&db)).await.unwrap();
        assert_eq!(db.count(&CANDIDATES_RAW).await.unwrap(), 3);
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_blank_required_field_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let content = SAMPLE.replace("cedric@example.com", "");
        let input = write_sample(&dir, &content);
        let db = Database::connect_url("sqlite::memory:").await.unwrap();

        let err = run_pipeline(&input, &PipelineOptions::default(), Some(&db)).await.unwrap_err();
        match err {
            PipelineError::Validation(rows) => {
                assert_eq!(rows.len(), 1);
                assert!(rows[0].starts_with("row 2:"));
                assert!(rows[0].contains("Email"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(db.count(&CANDIDATES_RAW).await.unwrap(), 0);
    }
}
