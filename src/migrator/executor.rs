use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, Statement, TransactionTrait,
};
use tracing::{debug, warn};

use crate::db::SqlDialect;
use crate::errors::MigrationError;
use crate::migrator::ledger::Ledger;
use crate::migrator::migration::Migration;

/// Applies or reverts a single migration; the script and its ledger write commit together.
pub struct Executor<'a> {
    db: &'a DatabaseConnection,
    ledger: Ledger<'a>,
}

#[derive(Clone, Copy)]
enum Action {
    Apply,
    Rollback,
}

impl Action {
    fn error(self, version: i32, phase: &'static str, source: DbErr) -> MigrationError {
        match self {
            Action::Apply => MigrationError::Apply {
                version,
                phase,
                source,
            },
            Action::Rollback => MigrationError::Rollback {
                version,
                phase,
                source,
            },
        }
    }
}

impl<'a> Executor<'a> {
    pub fn new(db: &'a DatabaseConnection, dialect: &'static dyn SqlDialect) -> Self {
        Self {
            db,
            ledger: Ledger::new(db, dialect),
        }
    }

    pub async fn apply(&self, migration: &Migration) -> Result<(), MigrationError> {
        let script = migration
            .up_script
            .as_deref()
            .ok_or(MigrationError::MissingUpScript {
                version: migration.version,
            })?;

        self.run(
            Action::Apply,
            migration.version,
            script,
            self.ledger.insert_statement(migration),
        )
        .await
    }

    pub async fn rollback(&self, migration: &Migration) -> Result<(), MigrationError> {
        let script =
            migration
                .down_script
                .as_deref()
                .ok_or(MigrationError::MissingDownScript {
                    version: migration.version,
                })?;

        self.run(
            Action::Rollback,
            migration.version,
            script,
            self.ledger.delete_statement(migration.version),
        )
        .await
    }

    async fn run(
        &self,
        action: Action,
        version: i32,
        script: &str,
        ledger_stmt: Statement,
    ) -> Result<(), MigrationError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| action.error(version, "begin transaction", e))?;

        if let Err((phase, e)) = Self::execute_in(&txn, script, ledger_stmt).await {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(
                    "Failed to roll back transaction for migration {}: {}",
                    version, rollback_err
                );
            }
            return Err(action.error(version, phase, e));
        }

        txn.commit()
            .await
            .map_err(|e| action.error(version, "commit", e))
    }

    async fn execute_in(
        txn: &DatabaseTransaction,
        script: &str,
        ledger_stmt: Statement,
    ) -> Result<(), (&'static str, DbErr)> {
        debug!("Executing migration script ({} bytes)", script.len());
        txn.execute_unprepared(script)
            .await
            .map_err(|e| ("execute script", e))?;

        txn.execute(ledger_stmt)
            .await
            .map_err(|e| ("update ledger", e))?;
        Ok(())
    }
}
