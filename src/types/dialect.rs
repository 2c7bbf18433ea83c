use std::str::FromStr;

use sea_orm::DbBackend;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::db::dialect::{PostgresDialect, SqlDialect, SqliteDialect};
use crate::errors::MigrationError;

/// SQL engine a migration script targets. Exactly two are supported.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,

    #[strum(to_string = "sqlite", serialize = "sqlite3")]
    #[serde(alias = "sqlite3")]
    Sqlite,
}

impl Dialect {
    /// Token used in migration filenames, e.g. `001_create_tables_sqlite.up.sql`.
    pub fn file_token(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Filenames only accept the canonical tokens; `sqlite3` is a config alias, not a file token.
    pub fn from_file_token(token: &str) -> Option<Self> {
        match token {
            "postgres" => Some(Dialect::Postgres),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    pub fn from_backend(backend: DbBackend) -> Option<Self> {
        match backend {
            DbBackend::Postgres => Some(Dialect::Postgres),
            DbBackend::Sqlite => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &PostgresDialect,
            Dialect::Sqlite => &SqliteDialect,
        }
    }
}

pub fn parse_dialect(s: &str) -> Result<Dialect, MigrationError> {
    Dialect::from_str(s.trim()).map_err(|_| MigrationError::UnknownDialect(s.to_string()))
}
