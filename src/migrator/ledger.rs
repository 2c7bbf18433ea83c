use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};

use crate::db::SqlDialect;
use crate::errors::MigrationError;
use crate::migrator::migration::Migration;

pub const LEDGER_TABLE: &str = "schema_migrations";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The `schema_migrations` table: one row per applied version.
pub struct Ledger<'a> {
    db: &'a DatabaseConnection,
    dialect: &'static dyn SqlDialect,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a DatabaseConnection, dialect: &'static dyn SqlDialect) -> Self {
        Self { db, dialect }
    }

    pub async fn ensure_table(&self) -> Result<(), MigrationError> {
        self.db
            .execute_unprepared(&create_table_sql(self.dialect))
            .await
            .map(|_| ())
            .map_err(MigrationError::Ledger)
    }

    /// Applied versions with their application time, read fresh from the database.
    pub async fn applied_versions(&self) -> Result<BTreeMap<i32, DateTime<Utc>>, MigrationError> {
        let rows = self
            .db
            .query_all(Statement::from_string(
                self.dialect.backend(),
                select_applied_sql(self.dialect),
            ))
            .await
            .map_err(MigrationError::Ledger)?;

        let mut versions = BTreeMap::new();
        for row in rows {
            let version: i32 = row.try_get("", "version").map_err(MigrationError::Ledger)?;
            let applied_at: String = row
                .try_get("", "applied_at")
                .map_err(MigrationError::Ledger)?;
            versions.insert(version, parse_timestamp(&applied_at)?);
        }
        Ok(versions)
    }

    pub fn insert_statement(&self, migration: &Migration) -> Statement {
        Statement::from_sql_and_values(
            self.dialect.backend(),
            insert_sql(self.dialect),
            [
                Value::from(migration.version),
                Value::from(migration.name.clone()),
            ],
        )
    }

    pub fn delete_statement(&self, version: i32) -> Statement {
        Statement::from_sql_and_values(
            self.dialect.backend(),
            delete_sql(self.dialect),
            [Value::from(version)],
        )
    }
}

pub fn create_table_sql(dialect: &dyn SqlDialect) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at {} NOT NULL DEFAULT {}
)",
        LEDGER_TABLE,
        dialect.timestamp_type(),
        dialect.timestamp_default()
    )
}

fn select_applied_sql(dialect: &dyn SqlDialect) -> String {
    format!(
        "SELECT version, {} AS applied_at FROM {} ORDER BY version",
        dialect.timestamp_as_text("applied_at"),
        LEDGER_TABLE
    )
}

fn insert_sql(dialect: &dyn SqlDialect) -> String {
    format!(
        "INSERT INTO {} (version, name, applied_at) VALUES ({}, {}, {})",
        LEDGER_TABLE,
        dialect.placeholder(1),
        dialect.placeholder(2),
        dialect.now_expr()
    )
}

fn delete_sql(dialect: &dyn SqlDialect) -> String {
    format!(
        "DELETE FROM {} WHERE version = {}",
        LEDGER_TABLE,
        dialect.placeholder(1)
    )
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MigrationError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            MigrationError::Ledger(sea_orm::DbErr::Type(format!(
                "invalid applied_at value '{}': {}",
                value, e
            )))
        })
}
