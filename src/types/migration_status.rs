use chrono::{DateTime, Utc};
use colored::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MigrationStatus {
    Applied { applied_at: DateTime<Utc> },
    Pending,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, MigrationStatus::Applied { .. })
    }

    pub fn to_colored_string(&self) -> String {
        match self {
            MigrationStatus::Applied { .. } => "APPLIED".green().bold().to_string(),
            MigrationStatus::Pending => "PENDING".yellow().bold().to_string(),
        }
    }
}
