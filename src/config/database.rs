use serde::{Deserialize, Serialize};

use crate::errors::MigrationError;
use crate::types::{Dialect, parse_dialect};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// `postgres`, `sqlite` or `sqlite3`; inferred from the url scheme when unset.
    #[serde(default)]
    pub db_type: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            db_type: None,
        }
    }
}

impl DatabaseConfig {
    pub fn dialect(&self) -> Result<Dialect, MigrationError> {
        match self.db_type.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(db_type) => parse_dialect(db_type),
            None => Dialect::from_url(&self.url)
                .ok_or_else(|| MigrationError::UnknownDialect(self.url.clone())),
        }
    }
}

fn default_url() -> String {
    "sqlite://storefront.db?mode=rwc".to_string()
}
