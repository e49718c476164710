//! Database handle and table loading.
//!
//! One `sqlx` `any` pool with a single connection; the dialect decides the
//! SQL text. Each table load runs in its own transaction.
//!
//! ```rust,ignore
//! use candidates_etl::{Database, DatabaseConfig, LoadMode};
//!
//! let db = Database::connect(&DatabaseConfig::from_env()?).await?;
//! db.create_tables().await?;
//! db.insert_transformed(&records, LoadMode::Replace).await?;
//! ```

pub mod dialect;

pub use dialect::Dialect;

use sqlx::any::{AnyPoolOptions, AnyQueryResult};
use sqlx::{Any, AnyPool, Transaction};

use crate::config::DatabaseConfig;
use crate::error::{DatabaseError, DatabaseResult};
use crate::logs::{log_error, log_success};
use crate::models::{
    CandidateRaw, CandidateTransformed, TableSchema, CANDIDATES_RAW, CANDIDATES_TRANSFORMED,
};

/// What to do with rows already in a table before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Keep existing rows.
    #[default]
    Append,
    /// Delete existing rows first, in the same transaction.
    Replace,
}

/// Open connection plus the dialect used to render statements.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
}

impl Database {
    /// Connect with settings read from the environment.
    ///
    /// Prints a status line on success and on failure; failures are returned.
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let url = config.connection_url()?;
        Self::open(&url, config.dialect, &config.database).await
    }

    /// Connect to an explicit URL, taking the dialect from its scheme.
    pub async fn connect_url(url: &str) -> DatabaseResult<Self> {
        let dialect = Dialect::from_url(url)?;
        let label = url.rsplit('/').next().unwrap_or(url);
        Self::open(url, dialect, label).await
    }

    async fn open(url: &str, dialect: Dialect, label: &str) -> DatabaseResult<Self> {
        sqlx::any::install_default_drivers();

        match AnyPoolOptions::new().max_connections(1).connect(url).await {
            Ok(pool) => {
                log_success(format!("Successfully connected to the database {}!", label));
                Ok(Self { pool, dialect })
            }
            Err(e) => {
                log_error(format!("Failed to connect to the database: {}", e));
                Err(DatabaseError::Connect(e.to_string()))
            }
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Create a table if it does not exist.
    pub async fn create_table(&self, schema: &TableSchema) -> DatabaseResult<()> {
        sqlx::query(&schema.create_sql(self.dialect))
            .execute(&self.pool)
            .await?;
        tracing::debug!(table = schema.name, "table ensured");
        Ok(())
    }

    /// Create `CandidatesRaw` and `CandidatesTransformed` if absent.
    pub async fn create_tables(&self) -> DatabaseResult<()> {
        self.create_table(&CANDIDATES_RAW).await?;
        self.create_table(&CANDIDATES_TRANSFORMED).await
    }

    /// Delete every row of a table. Returns the number of rows removed.
    pub async fn clear_table(&self, schema: &TableSchema) -> DatabaseResult<u64> {
        let result = sqlx::query(&self.delete_sql(schema))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of rows in a table.
    pub async fn count(&self, schema: &TableSchema) -> DatabaseResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.dialect.quote(schema.name));
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert raw candidates; the database assigns `ID`.
    pub async fn insert_raw(&self, records: &[CandidateRaw], mode: LoadMode) -> DatabaseResult<u64> {
        let sql = CANDIDATES_RAW.insert_sql(self.dialect, false);
        let mut tx = self.begin(&CANDIDATES_RAW, mode).await?;

        let mut inserted = 0;
        for record in records {
            let result: AnyQueryResult = sqlx::query(&sql)
                .bind(record.first_name.as_str())
                .bind(record.last_name.as_str())
                .bind(record.email.as_str())
                .bind(record.application_date.format("%Y-%m-%d").to_string())
                .bind(record.country.as_str())
                .bind(record.yoe)
                .bind(record.seniority.as_str())
                .bind(record.technology.as_str())
                .bind(record.code_challenge_score)
                .bind(record.technical_interview_score)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(table = CANDIDATES_RAW.name, inserted, "batch committed");
        Ok(inserted)
    }

    /// Insert transformed candidates with their batch `ID`.
    pub async fn insert_transformed(
        &self,
        records: &[CandidateTransformed],
        mode: LoadMode,
    ) -> DatabaseResult<u64> {
        let sql = CANDIDATES_TRANSFORMED.insert_sql(self.dialect, true);
        let mut tx = self.begin(&CANDIDATES_TRANSFORMED, mode).await?;

        let mut inserted = 0;
        for record in records {
            let result: AnyQueryResult = sqlx::query(&sql)
                .bind(record.id)
                .bind(record.first_name.as_str())
                .bind(record.last_name.as_str())
                .bind(record.email.as_str())
                .bind(record.application_date.format("%Y-%m-%d").to_string())
                .bind(record.country.as_str())
                .bind(record.yoe)
                .bind(record.seniority.as_str())
                .bind(record.technology.as_str())
                .bind(record.code_challenge_score)
                .bind(record.technical_interview_score)
                .bind(record.hired)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(table = CANDIDATES_TRANSFORMED.name, inserted, "batch committed");
        Ok(inserted)
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn begin(&self, schema: &TableSchema, mode: LoadMode) -> DatabaseResult<Transaction<'static, Any>> {
        let mut tx = self.pool.begin().await?;
        if mode == LoadMode::Replace {
            let removed = sqlx::query(&self.delete_sql(schema))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(table = schema.name, removed, "existing rows deleted");
        }
        Ok(tx)
    }

    fn delete_sql(&self, schema: &TableSchema) -> String {
        format!("DELETE FROM {}", self.dialect.quote(schema.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn memory_db() -> Database {
        let db = Database::connect_url("sqlite::memory:").await.unwrap();
        db.create_tables().await.unwrap();
        db
    }

    fn raw(first_name: &str, technology: &str) -> CandidateRaw {
        CandidateRaw {
            first_name: first_name.into(),
            last_name: "Doe".into(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            application_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
            country: "Chile".into(),
            yoe: 5,
            seniority: "Senior".into(),
            technology: technology.into(),
            code_challenge_score: 8,
            technical_interview_score: 9,
        }
    }

    fn transformed(id: i32, hired: i32) -> CandidateTransformed {
        let r = raw("Jane", "DevOps");
        CandidateTransformed {
            id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            application_date: r.application_date,
            country: r.country,
            yoe: r.yoe,
            seniority: r.seniority,
            technology: "Infrastructure".into(),
            code_challenge_score: r.code_challenge_score,
            technical_interview_score: r.technical_interview_score,
            hired,
        }
    }

    #[tokio::test]
    async fn test_connect_url_detects_dialect() {
        let db = memory_db().await;
        assert_eq!(db.dialect(), Dialect::Sqlite);
        assert_eq!(db.count(&CANDIDATES_RAW).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connect_failure_is_returned() {
        let err = Database::connect_url("sqlite:///definitely/missing/dir/candidates.db")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Connect(_)));
    }

    #[tokio::test]
    async fn test_unknown_scheme() {
        let err = Database::connect_url("oracle://host/db").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Config(_)));
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() {
        let db = memory_db().await;
        db.create_tables().await.unwrap();
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_raw_assigns_ids() {
        let db = memory_db().await;
        let records = vec![raw("Ann", "DevOps"), raw("Ben", "Security")];

        assert_eq!(db.insert_raw(&records, LoadMode::Append).await.unwrap(), 2);

        let ids: Vec<i64> = sqlx::query_scalar(r#"SELECT "ID" FROM "CandidatesRaw" ORDER BY "ID""#)
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 2]);

        let labels: Vec<String> =
            sqlx::query_scalar(r#"SELECT "Technology" FROM "CandidatesRaw" ORDER BY "ID""#)
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(labels, vec!["DevOps", "Security"]);
    }

    #[tokio::test]
    async fn test_append_then_replace() {
        let db = memory_db().await;
        let batch = vec![transformed(1, 1), transformed(2, 0)];

        db.insert_transformed(&batch, LoadMode::Append).await.unwrap();
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 2);

        // same IDs again would collide with the primary key
        assert!(db.insert_transformed(&batch, LoadMode::Append).await.is_err());
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 2);

        db.insert_transformed(&batch, LoadMode::Replace).await.unwrap();
        assert_eq!(db.count(&CANDIDATES_TRANSFORMED).await.unwrap(), 2);

        let hired: Vec<i64> =
            sqlx::query_scalar(r#"SELECT "Hired" FROM "CandidatesTransformed" ORDER BY "ID""#)
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(hired, vec![1, 0]);
    }

    #[tokio::test]
    async fn test_clear_table() {
        let db = memory_db().await;
        db.insert_raw(&[raw("Ann", "Design")], LoadMode::Append).await.unwrap();
        assert_eq!(db.clear_table(&CANDIDATES_RAW).await.unwrap(), 1);
        assert_eq!(db.count(&CANDIDATES_RAW).await.unwrap(), 0);
    }
}
