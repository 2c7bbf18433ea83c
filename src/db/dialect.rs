//! Engine-specific SQL fragments used by the migration ledger.
//!
//! Migration scripts themselves are authored per dialect; only the statements the
//! migrator generates go through this trait.

use sea_orm::DbBackend;

pub trait SqlDialect: Send + Sync {
    fn backend(&self) -> DbBackend;

    /// Bind parameter for the 1-based `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Expression evaluating to the current time inside a statement.
    fn now_expr(&self) -> &'static str;

    fn timestamp_type(&self) -> &'static str;

    fn timestamp_default(&self) -> &'static str;

    /// Renders a timestamp column as `YYYY-MM-DD HH:MM:SS` text in UTC.
    fn timestamp_as_text(&self, column: &str) -> String;
}

pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn backend(&self) -> DbBackend {
        DbBackend::Postgres
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn now_expr(&self) -> &'static str {
        "NOW()"
    }

    fn timestamp_type(&self) -> &'static str {
        "TIMESTAMP WITH TIME ZONE"
    }

    fn timestamp_default(&self) -> &'static str {
        "NOW()"
    }

    fn timestamp_as_text(&self, column: &str) -> String {
        format!(
            "to_char({} AT TIME ZONE 'UTC', 'YYYY-MM-DD HH24:MI:SS')",
            column
        )
    }
}

pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn backend(&self) -> DbBackend {
        DbBackend::Sqlite
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn now_expr(&self) -> &'static str {
        "datetime('now')"
    }

    fn timestamp_type(&self) -> &'static str {
        "DATETIME"
    }

    fn timestamp_default(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn timestamp_as_text(&self, column: &str) -> String {
        format!("strftime('%Y-%m-%d %H:%M:%S', {})", column)
    }
}
