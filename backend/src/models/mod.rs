//! Domain models for the candidates ETL.
//!
//! - [`CandidateRaw`] - A candidate as ingested, mapped to `CandidatesRaw`
//! - [`CandidateTransformed`] - The enriched record, mapped to `CandidatesTransformed`
//! - [`TableSchema`] / [`ColumnDef`] - Declarative table layouts used to render DDL
//!
//! Records deserialize from a [`crate::parser::Table`] whose headers have
//! already been standardized (`First_Name`, not `First Name`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Dialect;

// =============================================================================
// Column names
// =============================================================================

pub const COL_ID: &str = "ID";
pub const COL_FIRST_NAME: &str = "First_Name";
pub const COL_LAST_NAME: &str = "Last_Name";
pub const COL_EMAIL: &str = "Email";
pub const COL_APPLICATION_DATE: &str = "Application_Date";
pub const COL_COUNTRY: &str = "Country";
pub const COL_YOE: &str = "YOE";
pub const COL_SENIORITY: &str = "Seniority";
pub const COL_TECHNOLOGY: &str = "Technology";
pub const COL_CODE_CHALLENGE_SCORE: &str = "Code_Challenge_Score";
pub const COL_TECHNICAL_INTERVIEW_SCORE: &str = "Technical_Interview_Score";
pub const COL_HIRED: &str = "Hired";

// =============================================================================
// Records
// =============================================================================

/// A candidate exactly as it appears in the export.
///
/// `ID` is assigned by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRaw {
    #[serde(rename = "First_Name")]
    pub first_name: String,
    #[serde(rename = "Last_Name")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Application_Date")]
    pub application_date: NaiveDate,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "YOE")]
    pub yoe: i32,
    #[serde(rename = "Seniority")]
    pub seniority: String,
    /// Raw technology label
    #[serde(rename = "Technology")]
    pub technology: String,
    #[serde(rename = "Code_Challenge_Score")]
    pub code_challenge_score: i32,
    #[serde(rename = "Technical_Interview_Score")]
    pub technical_interview_score: i32,
}

/// A candidate after enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTransformed {
    /// Sequential batch ID, starting at 1.
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "First_Name")]
    pub first_name: String,
    #[serde(rename = "Last_Name")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Application_Date")]
    pub application_date: NaiveDate,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "YOE")]
    pub yoe: i32,
    #[serde(rename = "Seniority")]
    pub seniority: String,
    /// Technology category, not the raw label
    #[serde(rename = "Technology")]
    pub technology: String,
    #[serde(rename = "Code_Challenge_Score")]
    pub code_challenge_score: i32,
    #[serde(rename = "Technical_Interview_Score")]
    pub technical_interview_score: i32,
    /// 1 if hired, 0 otherwise
    #[serde(rename = "Hired")]
    pub hired: i32,
}

impl CandidateTransformed {
    pub fn is_hired(&self) -> bool {
        self.hired == 1
    }
}

// =============================================================================
// Table schemas
// =============================================================================

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// `VARCHAR(n)`
    Varchar(u16),
    Date,
    Integer,
}

impl SqlType {
    pub fn to_sql(&self) -> String {
        match self {
            SqlType::Varchar(n) => format!("VARCHAR({})", n),
            SqlType::Date => "DATE".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
        }
    }
}

/// One column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    const fn required(name: &'static str, sql_type: SqlType) -> Self {
        Self { name, sql_type, nullable: false, primary_key: false, auto_increment: false }
    }

    const fn surrogate_key(name: &'static str) -> Self {
        Self { name, sql_type: SqlType::Integer, nullable: false, primary_key: true, auto_increment: true }
    }

    fn to_sql(&self, dialect: Dialect) -> String {
        let name = dialect.quote(self.name);
        if self.primary_key && self.auto_increment {
            return format!("{} {}", name, dialect.auto_increment_key());
        }
        let mut sql = format!("{} {}", name, self.sql_type.to_sql());
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        sql
    }
}

/// Declarative layout of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

const NAME: SqlType = SqlType::Varchar(100);

/// Candidates as ingested.
pub const CANDIDATES_RAW: TableSchema = TableSchema {
    name: "CandidatesRaw",
    columns: &[
        ColumnDef::surrogate_key(COL_ID),
        ColumnDef::required(COL_FIRST_NAME, NAME),
        ColumnDef::required(COL_LAST_NAME, NAME),
        ColumnDef::required(COL_EMAIL, NAME),
        ColumnDef::required(COL_APPLICATION_DATE, SqlType::Date),
        ColumnDef::required(COL_COUNTRY, NAME),
        ColumnDef::required(COL_YOE, SqlType::Integer),
        ColumnDef::required(COL_SENIORITY, NAME),
        ColumnDef::required(COL_TECHNOLOGY, NAME),
        ColumnDef::required(COL_CODE_CHALLENGE_SCORE, SqlType::Integer),
        ColumnDef::required(COL_TECHNICAL_INTERVIEW_SCORE, SqlType::Integer),
    ],
};

/// Candidates with the hiring flag and technology category.
pub const CANDIDATES_TRANSFORMED: TableSchema = TableSchema {
    name: "CandidatesTransformed",
    columns: &[
        ColumnDef::surrogate_key(COL_ID),
        ColumnDef::required(COL_FIRST_NAME, NAME),
        ColumnDef::required(COL_LAST_NAME, NAME),
        ColumnDef::required(COL_EMAIL, NAME),
        ColumnDef::required(COL_APPLICATION_DATE, SqlType::Date),
        ColumnDef::required(COL_COUNTRY, NAME),
        ColumnDef::required(COL_YOE, SqlType::Integer),
        ColumnDef::required(COL_SENIORITY, NAME),
        ColumnDef::required(COL_TECHNOLOGY, NAME),
        ColumnDef::required(COL_CODE_CHALLENGE_SCORE, SqlType::Integer),
        ColumnDef::required(COL_TECHNICAL_INTERVIEW_SCORE, SqlType::Integer),
        ColumnDef::required(COL_HIRED, SqlType::Integer),
    ],
};

impl TableSchema {
    /// `CREATE TABLE IF NOT EXISTS` statement for the dialect.
    pub fn create_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.to_sql(dialect)).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            dialect.quote(self.name),
            columns.join(",\n    ")
        )
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns written on insert. Auto-assigned keys are skipped unless
    /// `with_key` is set.
    pub fn insert_columns(&self, with_key: bool) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| with_key || !(c.primary_key && c.auto_increment))
            .collect()
    }

    /// Parameterized `INSERT` statement for the dialect.
    pub fn insert_sql(&self, dialect: Dialect, with_key: bool) -> String {
        let columns = self.insert_columns(with_key);
        let names: Vec<String> = columns.iter().map(|c| dialect.quote(c.name)).collect();
        let params: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| match c.sql_type {
                SqlType::Date => dialect.date_placeholder(i + 1),
                _ => dialect.placeholder(i + 1),
            })
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            dialect.quote(self.name),
            names.join(", "),
            params.join(", ")
        )
    }
}
