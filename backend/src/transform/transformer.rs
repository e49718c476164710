//! Column-level transformations of a candidate export.
//!
//! Steps must run in order: the hiring and category steps address columns
//! by their standardized names.
//!
//! ```rust,ignore
//! use candidates_etl::CandidateTransformer;
//!
//! let mut transformer = CandidateTransformer::from_path("candidates.csv")?;
//! transformer.apply_all()?;
//! transformer.save_transformed_data("candidates_transformed.csv")?;
//! ```

use serde::Serialize;
use std::path::Path;

use super::categories::{categorize, is_mapped};
use crate::error::{CsvResult, TransformError, TransformResult};
use crate::models::{
    CandidateRaw, CandidateTransformed, COL_CODE_CHALLENGE_SCORE, COL_HIRED, COL_ID,
    COL_TECHNICAL_INTERVIEW_SCORE, COL_TECHNOLOGY,
};
use crate::parser::{read_table_file, write_table_file, Table, DEFAULT_DELIMITER};

/// Export headers and their identifier-safe replacements.
pub const COLUMN_RENAMES: [(&str, &str); 5] = [
    ("First Name", "First_Name"),
    ("Last Name", "Last_Name"),
    ("Application Date", "Application_Date"),
    ("Code Challenge Score", "Code_Challenge_Score"),
    ("Technical Interview Score", "Technical_Interview_Score"),
];

/// Minimum score, on both evaluations, for a candidate to count as hired.
pub const HIRING_THRESHOLD: i64 = 7;

/// Hiring rule: both scores at or above the threshold.
pub fn is_hired(code_challenge_score: i64, technical_interview_score: i64) -> bool {
    code_challenge_score >= HIRING_THRESHOLD && technical_interview_score >= HIRING_THRESHOLD
}

/// Counters gathered while applying the transformations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub rows: usize,
    pub renamed_columns: usize,
    pub hired: usize,
    /// Rows whose technology label fell back to "Other"
    pub unmapped_technologies: usize,
}

/// In-memory candidate table plus the operations that enrich it.
#[derive(Debug, Clone)]
pub struct CandidateTransformer {
    data: Table,
}

impl CandidateTransformer {
    pub fn new(data: Table) -> Self {
        Self { data }
    }

    /// Load a `;`-delimited UTF-8 file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CsvResult<Self> {
        Self::from_path_with_delimiter(path, DEFAULT_DELIMITER)
    }

    pub fn from_path_with_delimiter<P: AsRef<Path>>(path: P, delimiter: u8) -> CsvResult<Self> {
        Ok(Self::new(read_table_file(path, delimiter)?))
    }

    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Rename the five human-readable headers. Other columns are untouched.
    ///
    /// Returns how many headers were renamed.
    pub fn standardize_column_names(&mut self) -> usize {
        COLUMN_RENAMES
            .iter()
            .filter(|(from, to)| self.data.rename_column(from, to))
            .count()
    }

    /// Set `ID` to 1..=N in current row order.
    pub fn generate_ids(&mut self) {
        let ids = (1..=self.data.row_count()).map(|i| i.to_string()).collect();
        self.data.set_column(COL_ID, ids);
    }

    /// Set `Hired` to `1`/`0` from the two score columns.
    ///
    /// A blank score counts as below the threshold. Returns the number of hired candidates.
    pub fn calculate_hiring_status(&mut self) -> TransformResult<usize> {
        let code = self.score_column(COL_CODE_CHALLENGE_SCORE)?;
        let interview = self.score_column(COL_TECHNICAL_INTERVIEW_SCORE)?;

        let flags: Vec<bool> = code
            .iter()
            .zip(&interview)
            .map(|(c, t)| matches!((c, t), (Some(c), Some(t)) if is_hired(*c, *t)))
            .collect();
        let hired = flags.iter().filter(|&&h| h).count();

        self.data.set_column(
            COL_HIRED,
            flags.into_iter().map(|h| if h { "1" } else { "0" }.to_string()).collect(),
        );
        Ok(hired)
    }

    /// Replace each `Technology` label with its category.
    ///
    /// Returns the number of rows that fell back to "Other".
    pub fn categorize_technology(&mut self) -> TransformResult<usize> {
        let mut unmapped = 0;
        let found = self.data.map_column(COL_TECHNOLOGY, |label| {
            if !is_mapped(label) {
                unmapped += 1;
            }
            categorize(label).to_string()
        });
        if !found {
            return Err(TransformError::MissingColumn(COL_TECHNOLOGY.to_string()));
        }
        Ok(unmapped)
    }

    /// Rename, number, flag and categorize, in that order.
    pub fn apply_all(&mut self) -> TransformResult<TransformStats> {
        let renamed_columns = self.standardize_column_names();
        self.generate_ids();
        let hired = self.calculate_hiring_status()?;
        let unmapped_technologies = self.categorize_technology()?;

        Ok(TransformStats {
            rows: self.data.row_count(),
            renamed_columns,
            hired,
            unmapped_technologies,
        })
    }

    /// Write the table as `;`-delimited UTF-8, without an index column.
    pub fn save_transformed_data<P: AsRef<Path>>(&self, output_path: P) -> CsvResult<()> {
        write_table_file(&self.data, output_path, DEFAULT_DELIMITER)
    }

    /// Typed view for the raw table.
    ///
    /// Call after [`Self::standardize_column_names`] and before
    /// [`Self::categorize_technology`], while `Technology` still holds labels.
    pub fn raw_records(&self) -> CsvResult<Vec<CandidateRaw>> {
        self.data.records()
    }

    /// Typed view for the transformed table. Call after [`Self::apply_all`].
    pub fn transformed_records(&self) -> CsvResult<Vec<CandidateTransformed>> {
        self.data.records()
    }

    /// Parse a score column; blank cells become `None`.
    fn score_column(&self, name: &str) -> TransformResult<Vec<Option<i64>>> {
        let values = self
            .data
            .column(name)
            .ok_or_else(|| TransformError::MissingColumn(name.to_string()))?;

        values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse::<i64>().map(Some).map_err(|_| TransformError::InvalidValue {
                    row: row + 1,
                    column: name.to_string(),
                    value: value.to_string(),
                })
            })
            .collect()
    }
}
