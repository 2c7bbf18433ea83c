use crate::{config::Settings, errors::MigrationError, types::Dialect};
use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Connects, pings, and checks that the connection speaks the configured dialect.
pub async fn init_db(settings: &Settings) -> Result<DatabaseConnection> {
    let dialect = settings.database.dialect()?;

    let db = Database::connect(&settings.database.url)
        .await
        .context("Failed to connect to database")?;
    db.ping().await.context("Failed to ping database")?;

    let backend = db.get_database_backend();
    if Dialect::from_backend(backend) != Some(dialect) {
        return Err(MigrationError::DialectMismatch {
            configured: dialect,
            connected: format!("{:?}", backend),
        }
        .into());
    }

    info!("Connected to {} database", dialect);
    Ok(db)
}
