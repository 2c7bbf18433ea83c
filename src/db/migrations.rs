use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::config::Settings;
use crate::db::init_db;
use crate::migrator::Migrator;

/// Builds a migrator over `db` using the configured dialect and migration source.
pub async fn migrator(db: DatabaseConnection, settings: &Settings) -> Result<Migrator> {
    let dialect = settings.database.dialect()?;
    let source = settings.migrations.source();

    Migrator::new(db, dialect, source.as_ref())
        .await
        .context("Failed to create migrator")
}

pub async fn connect_migrator(settings: &Settings) -> Result<Migrator> {
    let db = init_db(settings).await?;
    migrator(db, settings).await
}

/// Server start-up path: bring the schema fully up to date or refuse to start.
pub async fn migrate_on_boot(settings: &Settings) -> Result<DatabaseConnection> {
    info!("Running database migrations...");
    let migrator = connect_migrator(settings).await?;

    match migrator.up(None).await {
        Ok(report) => {
            info!(
                "✅ Migrations completed successfully ({} applied)",
                report.count()
            );
            Ok(migrator.into_connection())
        }
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            Err(e).context("Failed to run migrations")
        }
    }
}
