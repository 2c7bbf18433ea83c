use std::str::FromStr;

use crate::errors::MigrationError;
use crate::types::{Dialect, Direction};

const SUFFIX: &str = ".sql";
const DIRECTION_SEP: char = '.';
const TOKEN_SEP: char = '_';

/// Everything encoded in a migration filename.
///
/// Format: `<version>_<name_with_underscores>_<dialect>.<direction>.sql`,
/// e.g. `001_create_tables_postgres.up.sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub version: i32,
    pub name: String,
    pub direction: Direction,
    pub dialect: Dialect,
}

impl MigrationFile {
    pub fn file_name(&self) -> String {
        format!(
            "{:03}{sep}{}{sep}{}{}{}{}",
            self.version,
            self.name,
            self.dialect.file_token(),
            DIRECTION_SEP,
            self.direction,
            SUFFIX,
            sep = TOKEN_SEP
        )
    }
}

pub fn parse_migration_filename(filename: &str) -> Result<MigrationFile, MigrationError> {
    let invalid_format = || MigrationError::InvalidFormat {
        filename: filename.to_string(),
    };

    let stem = filename.strip_suffix(SUFFIX).ok_or_else(invalid_format)?;

    let parts: Vec<&str> = stem.split(DIRECTION_SEP).collect();
    let [base, direction] = parts.as_slice() else {
        return Err(invalid_format());
    };

    let direction =
        Direction::from_str(direction).map_err(|_| MigrationError::InvalidDirection {
            filename: filename.to_string(),
            direction: direction.to_string(),
        })?;

    let tokens: Vec<&str> = base.split(TOKEN_SEP).collect();
    if tokens.len() < 3 {
        return Err(invalid_format());
    }

    let version_token = tokens[0];
    let version = version_token
        .parse::<i32>()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| MigrationError::InvalidVersion {
            filename: filename.to_string(),
            value: version_token.to_string(),
        })?;

    let dialect_token = tokens[tokens.len() - 1];
    let dialect =
        Dialect::from_file_token(dialect_token).ok_or_else(|| MigrationError::InvalidDialect {
            filename: filename.to_string(),
            dialect: dialect_token.to_string(),
        })?;

    let name = tokens[1..tokens.len() - 1].join(&TOKEN_SEP.to_string());

    Ok(MigrationFile {
        version,
        name,
        direction,
        dialect,
    })
}
