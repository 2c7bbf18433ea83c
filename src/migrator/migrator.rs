use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{info, warn};

use crate::errors::MigrationError;
use crate::migrator::executor::Executor;
use crate::migrator::ledger::Ledger;
use crate::migrator::loader::load_migrations;
use crate::migrator::migration::Migration;
use crate::migrator::report::{
    DownOutcome, ResetMode, ResetReport, StatusEntry, StatusReport, UpReport,
};
use crate::migrator::source::MigrationSource;
use crate::types::{Dialect, MigrationStatus};

/// Sequences apply/rollback over the loaded migrations against one database.
///
/// Every command re-reads the ledger first. Each migration commits on its own, so a
/// failure part way through `up` or `reset` keeps the migrations already processed.
pub struct Migrator {
    db: DatabaseConnection,
    dialect: Dialect,
    migrations: Vec<Migration>,
}

impl Migrator {
    pub async fn new(
        db: DatabaseConnection,
        dialect: Dialect,
        source: &dyn MigrationSource,
    ) -> Result<Self, MigrationError> {
        let backend = db.get_database_backend();
        if Dialect::from_backend(backend) != Some(dialect) {
            return Err(MigrationError::DialectMismatch {
                configured: dialect,
                connected: format!("{:?}", backend),
            });
        }

        let migrations = load_migrations(source, dialect)?;
        info!(
            "Loaded {} {} migration(s) from {}",
            migrations.len(),
            dialect,
            source.describe()
        );

        Ledger::new(&db, dialect.sql()).ensure_table().await?;

        Ok(Self {
            db,
            dialect,
            migrations,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    fn ledger(&self) -> Ledger<'_> {
        Ledger::new(&self.db, self.dialect.sql())
    }

    fn executor(&self) -> Executor<'_> {
        Executor::new(&self.db, self.dialect.sql())
    }

    /// Applies pending migrations in ascending order, up to and including `target` if given.
    pub async fn up(&self, target: Option<i32>) -> Result<UpReport, MigrationError> {
        let applied = self.ledger().applied_versions().await?;
        let executor = self.executor();
        let mut report = UpReport::default();

        let pending = self
            .migrations
            .iter()
            .filter(|m| !applied.contains_key(&m.version))
            .filter(|m| target.is_none_or(|t| m.version <= t));

        for migration in pending {
            if !migration.has_up() {
                warn!(
                    "Warning: No UP migration found for version {}",
                    migration.version
                );
                report.skipped.push(migration.version);
                continue;
            }

            info!(
                "Applying migration {}: {}",
                migration.version, migration.name
            );
            executor.apply(migration).await?;
            report.applied.push(migration.version);
        }

        if report.applied.is_empty() {
            info!("No pending migrations");
        } else {
            info!("Successfully applied {} migration(s)", report.count());
        }
        Ok(report)
    }

    /// Rolls back the most recently applied migration.
    pub async fn down(&self) -> Result<DownOutcome, MigrationError> {
        let applied = self.ledger().applied_versions().await?;

        let Some(&last_version) = applied.keys().next_back() else {
            info!("No migrations to rollback");
            return Ok(DownOutcome::NothingToRollback);
        };

        let migration = self
            .find(last_version)
            .ok_or(MigrationError::MigrationNotFound {
                version: last_version,
            })?;

        if !migration.has_down() {
            return Err(MigrationError::MissingDownScript {
                version: last_version,
            });
        }

        info!(
            "Rolling back migration {}: {}",
            migration.version, migration.name
        );
        self.executor().rollback(migration).await?;
        info!("Successfully rolled back migration {}", migration.version);

        Ok(DownOutcome::RolledBack {
            version: migration.version,
            name: migration.name.clone(),
        })
    }

    /// Rolls back every applied migration, most recent first.
    pub async fn reset(&self, mode: ResetMode) -> Result<ResetReport, MigrationError> {
        let applied = self.ledger().applied_versions().await?;
        let mut report = ResetReport::default();

        if applied.is_empty() {
            info!("No migrations to reset");
            report.nothing_applied = true;
            return Ok(report);
        }

        let to_revert: Vec<&Migration> = self
            .migrations
            .iter()
            .rev()
            .filter(|m| applied.contains_key(&m.version))
            .collect();

        if mode == ResetMode::Strict {
            if let Some(m) = to_revert.iter().find(|m| !m.has_down()) {
                return Err(MigrationError::MissingDownScript { version: m.version });
            }
        }

        let executor = self.executor();
        for migration in to_revert {
            if !migration.has_down() {
                warn!(
                    "Warning: No DOWN migration found for version {}, skipping",
                    migration.version
                );
                report.skipped.push(migration.version);
                continue;
            }

            info!(
                "Rolling back migration {}: {}",
                migration.version, migration.name
            );
            executor.rollback(migration).await?;
            report.rolled_back.push(migration.version);
        }

        if report.skipped.is_empty() {
            info!("Successfully reset all migrations");
        } else {
            warn!(
                "Reset finished; versions {:?} remain marked as applied",
                report.skipped
            );
        }
        Ok(report)
    }

    pub async fn status(&self) -> Result<StatusReport, MigrationError> {
        let applied = self.ledger().applied_versions().await?;

        let entries = self
            .migrations
            .iter()
            .map(|m| StatusEntry {
                version: m.version,
                name: m.name.clone(),
                status: match applied.get(&m.version) {
                    Some(applied_at) => MigrationStatus::Applied {
                        applied_at: *applied_at,
                    },
                    None => MigrationStatus::Pending,
                },
            })
            .collect();

        let orphaned = applied
            .iter()
            .filter(|(version, _)| self.find(**version).is_none())
            .map(|(version, applied_at)| (*version, *applied_at))
            .collect();

        Ok(StatusReport { entries, orphaned })
    }

    fn find(&self, version: i32) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.version == version)
    }
}
