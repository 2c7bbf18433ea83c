use serde::{Deserialize, Serialize};

use crate::migrator::{DirectorySource, EmbeddedMigrations, MigrationSource, ResetMode};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MigrationsConfig {
    /// Read migration files from this directory instead of the embedded set.
    #[serde(default)]
    pub dir: Option<String>,

    /// Refuse to reset when an applied migration has no down script.
    #[serde(default)]
    pub strict_reset: bool,
}

impl MigrationsConfig {
    pub fn source(&self) -> Box<dyn MigrationSource> {
        match &self.dir {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => Box::new(EmbeddedMigrations),
        }
    }

    pub fn reset_mode(&self) -> ResetMode {
        if self.strict_reset {
            ResetMode::Strict
        } else {
            ResetMode::BestEffort
        }
    }
}
