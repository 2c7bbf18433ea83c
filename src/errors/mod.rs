use sea_orm::DbErr;
use thiserror::Error;

use crate::types::Dialect;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("invalid migration filename format: {filename}")]
    InvalidFormat { filename: String },

    #[error("invalid migration direction '{direction}' in {filename} (expected 'up' or 'down')")]
    InvalidDirection { filename: String, direction: String },

    #[error("invalid version number '{value}' in {filename}")]
    InvalidVersion { filename: String, value: String },

    #[error("invalid database type '{dialect}' in {filename}")]
    InvalidDialect { filename: String, dialect: String },

    #[error("failed to load migration '{name}': {reason}")]
    Load { name: String, reason: String },

    #[error("failed to apply migration {version} ({phase}): {source}")]
    Apply {
        version: i32,
        phase: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("failed to rollback migration {version} ({phase}): {source}")]
    Rollback {
        version: i32,
        phase: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("migration ledger query failed: {0}")]
    Ledger(#[source] DbErr),

    #[error("no UP migration found for version {version}")]
    MissingUpScript { version: i32 },

    #[error("no DOWN migration found for version {version}")]
    MissingDownScript { version: i32 },

    #[error("migration {version} is recorded as applied but no migration file was found")]
    MigrationNotFound { version: i32 },

    #[error("unknown database type '{0}' (must be 'postgres', 'sqlite', or 'sqlite3')")]
    UnknownDialect(String),

    #[error("configured database type '{configured}' does not match the connection ({connected})")]
    DialectMismatch {
        configured: Dialect,
        connected: String,
    },
}

impl MigrationError {
    /// Filename problems are recoverable: the loader skips the file and keeps going.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. }
                | Self::InvalidDirection { .. }
                | Self::InvalidVersion { .. }
                | Self::InvalidDialect { .. }
        )
    }

    pub(crate) fn load(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
