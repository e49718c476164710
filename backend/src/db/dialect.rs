//! SQL dialect differences between the supported database families.
//!
//! The `any` driver passes SQL through untouched, so placeholders, identifier
//! quoting and auto-increment keys have to be rendered per dialect.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Database family selected by `PGDIALECT` or by a URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Infer the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "database url".to_string(),
                message: format!("no scheme in '{}'", url),
            })?;
        scheme.parse()
    }

    /// URL scheme understood by sqlx.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Bind parameter marker for the 1-based position `n`.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Self::Postgres => format!("${}", n),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }

    /// Bind parameter for a `DATE` column fed an ISO `YYYY-MM-DD` string.
    pub fn date_placeholder(&self, n: usize) -> String {
        match self {
            Self::Postgres => format!("CAST(${} AS DATE)", n),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }

    /// Quote a mixed-case identifier.
    pub fn quote(&self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident.replace('`', "``")),
            Self::Postgres | Self::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    /// Column definition for an auto-assigned integer primary key.
    pub fn auto_increment_key(&self) -> &'static str {
        match self {
            Self::Postgres => "SERIAL PRIMARY KEY",
            Self::MySql => "INT AUTO_INCREMENT PRIMARY KEY",
            Self::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    /// Accepts SQLAlchemy-style names, ignoring a `+driver` suffix
    /// (`postgresql+psycopg2` is PostgreSQL).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let family = s.split('+').next().unwrap_or("").trim().to_lowercase();
        match family.as_str() {
            "postgresql" | "postgres" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("postgresql+psycopg2".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("sqlite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
    }

    #[test]
    fn test_unknown_dialect() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDialect(ref d) if d == "oracle"));
    }

    #[test]
    fn test_from_url() {
        assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
        assert_eq!(Dialect::from_url("postgres://u:p@h:5432/db").unwrap(), Dialect::Postgres);
        assert!(Dialect::from_url("no-scheme-here").is_err());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
        assert_eq!(Dialect::Sqlite.placeholder(3), "?");
        assert_eq!(Dialect::Postgres.date_placeholder(5), "CAST($5 AS DATE)");
        assert_eq!(Dialect::MySql.date_placeholder(5), "?");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(Dialect::Postgres.quote("CandidatesRaw"), "\"CandidatesRaw\"");
        assert_eq!(Dialect::MySql.quote("CandidatesRaw"), "`CandidatesRaw`");
    }
}
