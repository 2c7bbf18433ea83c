use anyhow::Result;
use chrono::Utc;
use storefront::errors::MigrationError;
use storefront::migrator::{DownOutcome, MemorySource, Migrator, ResetMode};
use storefront::types::{Dialect, MigrationStatus};

use crate::common::{TestDb, catalog_source, catalog_source_without, ledger_versions, table_exists};

async fn catalog_migrator(test_db: &TestDb, source: &MemorySource) -> Result<Migrator> {
    let db = test_db.connect().await?;
    Ok(Migrator::new(db, Dialect::Sqlite, source).await?)
}

#[tokio::test]
async fn test_loads_only_sqlite_migrations() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    let versions: Vec<i32> = migrator.migrations().iter().map(|m| m.version).collect();
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(migrator.migrations()[0].name, "create_widgets");
    assert!(migrator.migrations().iter().all(|m| m.has_up() && m.has_down()));

    Ok(())
}

#[tokio::test]
async fn test_up_applies_all_pending() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    let report = migrator.up(None).await?;
    assert_eq!(report.applied, vec![1, 2]);
    assert!(report.skipped.is_empty());

    let db = migrator.connection();
    assert!(table_exists(db, "widgets").await?);
    assert!(table_exists(db, "gadgets").await?);
    assert_eq!(ledger_versions(db).await?, vec![1, 2]);

    let status = migrator.status().await?;
    assert_eq!(status.summary(), "Total: 2 | Applied: 2 | Pending: 0");
    assert!(status.orphaned.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_up_twice_is_a_no_op() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    migrator.up(None).await?;
    let report = migrator.up(None).await?;

    assert!(report.applied.is_empty());
    assert_eq!(report.count(), 0);
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_up_stops_at_target() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    let report = migrator.up(Some(1)).await?;
    assert_eq!(report.applied, vec![1]);
    assert!(!table_exists(migrator.connection(), "gadgets").await?);

    let status = migrator.status().await?;
    assert_eq!(status.applied(), 1);
    assert_eq!(status.pending(), 1);
    assert_eq!(status.entries[1].status, MigrationStatus::Pending);

    let report = migrator.up(None).await?;
    assert_eq!(report.applied, vec![2]);

    Ok(())
}

#[tokio::test]
async fn test_status_on_fresh_database() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    let status = migrator.status().await?;
    assert_eq!(status.summary(), "Total: 2 | Applied: 0 | Pending: 2");
    assert!(
        status
            .entries
            .iter()
            .all(|e| e.status == MigrationStatus::Pending)
    );

    Ok(())
}

#[tokio::test]
async fn test_status_reports_applied_at() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;
    migrator.up(None).await?;

    let status = migrator.status().await?;
    for entry in &status.entries {
        match entry.status {
            MigrationStatus::Applied { applied_at } => {
                let drift = (Utc::now() - applied_at).num_seconds().abs();
                assert!(drift < 300, "applied_at {} is off by {}s", applied_at, drift);
            }
            MigrationStatus::Pending => panic!("version {} should be applied", entry.version),
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_down_rolls_back_latest() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;
    migrator.up(None).await?;

    let outcome = migrator.down().await?;
    assert_eq!(
        outcome,
        DownOutcome::RolledBack {
            version: 2,
            name: "create_gadgets".to_string()
        }
    );

    let db = migrator.connection();
    assert!(!table_exists(db, "gadgets").await?);
    assert!(table_exists(db, "widgets").await?);
    assert_eq!(ledger_versions(db).await?, vec![1]);

    let status = migrator.status().await?;
    assert_eq!(status.summary(), "Total: 2 | Applied: 1 | Pending: 1");

    Ok(())
}

#[tokio::test]
async fn test_down_then_up_restores_schema() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;
    migrator.up(None).await?;

    migrator.down().await?;
    let report = migrator.up(None).await?;

    assert_eq!(report.applied, vec![2]);
    assert!(table_exists(migrator.connection(), "gadgets").await?);
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_down_with_nothing_applied() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;

    assert_eq!(migrator.down().await?, DownOutcome::NothingToRollback);

    Ok(())
}

#[tokio::test]
async fn test_down_without_down_script() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source_without(&["002_create_gadgets_sqlite.down.sql"]);
    let migrator = catalog_migrator(&test_db, &source).await?;
    migrator.up(None).await?;

    let err = migrator.down().await.unwrap_err();
    assert!(matches!(err, MigrationError::MissingDownScript { version: 2 }));
    assert_eq!(err.to_string(), "no DOWN migration found for version 2");

    assert!(table_exists(migrator.connection(), "gadgets").await?);
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_down_with_orphaned_ledger_version() -> Result<()> {
    let test_db = TestDb::new()?;
    catalog_migrator(&test_db, &catalog_source())
        .await?
        .up(None)
        .await?;

    let source = catalog_source_without(&[
        "002_create_gadgets_sqlite.up.sql",
        "002_create_gadgets_sqlite.down.sql",
    ]);
    let migrator = catalog_migrator(&test_db, &source).await?;

    let status = migrator.status().await?;
    assert_eq!(status.total(), 1);
    assert_eq!(status.orphaned.len(), 1);
    assert_eq!(status.orphaned[0].0, 2);

    let err = migrator.down().await.unwrap_err();
    assert!(matches!(err, MigrationError::MigrationNotFound { version: 2 }));

    Ok(())
}

#[tokio::test]
async fn test_up_skips_missing_up_script() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source_without(&["001_create_widgets_sqlite.up.sql"]);
    let migrator = catalog_migrator(&test_db, &source).await?;

    let report = migrator.up(None).await?;
    assert_eq!(report.applied, vec![2]);
    assert_eq!(report.skipped, vec![1]);

    let status = migrator.status().await?;
    assert_eq!(status.entries[0].status, MigrationStatus::Pending);
    assert!(status.entries[1].status.is_applied());

    Ok(())
}

#[tokio::test]
async fn test_failed_script_leaves_no_trace() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source_without(&["002_create_gadgets_sqlite.up.sql"]).with_file(
        "002_create_gadgets_sqlite.up.sql",
        "CREATE TABLE gadgets (id INTEGER PRIMARY KEY);\n\
         INSERT INTO no_such_table VALUES (1);",
    );
    let migrator = catalog_migrator(&test_db, &source).await?;

    let err = migrator.up(None).await.unwrap_err();
    match err {
        MigrationError::Apply { version, phase, .. } => {
            assert_eq!(version, 2);
            assert_eq!(phase, "execute script");
        }
        other => panic!("unexpected error: {}", other),
    }

    let db = migrator.connection();
    assert!(table_exists(db, "widgets").await?);
    assert!(!table_exists(db, "gadgets").await?);
    assert_eq!(ledger_versions(db).await?, vec![1]);

    Ok(())
}

#[tokio::test]
async fn test_reset_rolls_back_everything() -> Result<()> {
    let test_db = TestDb::new()?;
    let migrator = catalog_migrator(&test_db, &catalog_source()).await?;
    migrator.up(None).await?;

    let report = migrator.reset(ResetMode::BestEffort).await?;
    assert!(!report.nothing_applied);
    assert_eq!(report.rolled_back, vec![2, 1]);
    assert!(report.skipped.is_empty());

    let db = migrator.connection();
    assert!(!table_exists(db, "widgets").await?);
    assert!(!table_exists(db, "gadgets").await?);
    assert!(ledger_versions(db).await?.is_empty());

    let report = migrator.reset(ResetMode::BestEffort).await?;
    assert!(report.nothing_applied);

    Ok(())
}

#[tokio::test]
async fn test_reset_skips_missing_down_script() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source_without(&["002_create_gadgets_sqlite.down.sql"]);
    let migrator = catalog_migrator(&test_db, &source).await?;
    migrator.up(None).await?;

    let report = migrator.reset(ResetMode::BestEffort).await?;
    assert_eq!(report.rolled_back, vec![1]);
    assert_eq!(report.skipped, vec![2]);
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![2]);

    Ok(())
}

#[tokio::test]
async fn test_strict_reset_refuses_before_rolling_back() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source_without(&["002_create_gadgets_sqlite.down.sql"]);
    let migrator = catalog_migrator(&test_db, &source).await?;
    migrator.up(None).await?;

    let err = migrator.reset(ResetMode::Strict).await.unwrap_err();
    assert!(matches!(err, MigrationError::MissingDownScript { version: 2 }));

    let db = migrator.connection();
    assert!(table_exists(db, "widgets").await?);
    assert_eq!(ledger_versions(db).await?, vec![1, 2]);

    Ok(())
}

#[tokio::test]
async fn test_rejects_other_dialect() -> Result<()> {
    let test_db = TestDb::new()?;
    let db = test_db.connect().await?;

    let result = Migrator::new(db, Dialect::Postgres, &catalog_source()).await;
    assert!(matches!(
        result,
        Err(MigrationError::DialectMismatch {
            configured: Dialect::Postgres,
            ..
        })
    ));

    Ok(())
}

#[tokio::test]
async fn test_invalid_utf8_fails_loading() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = catalog_source().with_file("003_broken_sqlite.up.sql", vec![0xff, 0xfe, 0x00]);
    let db = test_db.connect().await?;

    let result = Migrator::new(db, Dialect::Sqlite, &source).await;
    match result {
        Err(MigrationError::Load { name, .. }) => {
            assert_eq!(name, "003_broken_sqlite.up.sql")
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("loading should fail"),
    }

    Ok(())
}

#[tokio::test]
async fn test_users_role_scenario() -> Result<()> {
    let test_db = TestDb::new()?;
    let source = MemorySource::new()
        .with_file(
            "001_create_users_sqlite.up.sql",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL);",
        )
        .with_file("001_create_users_sqlite.down.sql", "DROP TABLE users;")
        .with_file(
            "002_add_users_role_sqlite.up.sql",
            "ALTER TABLE users ADD COLUMN role TEXT;",
        );
    let migrator = catalog_migrator(&test_db, &source).await?;

    assert_eq!(migrator.up(None).await?.applied, vec![1, 2]);

    let err = migrator.down().await.unwrap_err();
    assert_eq!(err.to_string(), "no DOWN migration found for version 2");
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![1, 2]);

    let report = migrator.reset(ResetMode::BestEffort).await?;
    assert_eq!(report.skipped, vec![2]);
    assert_eq!(report.rolled_back, vec![1]);
    assert!(!table_exists(migrator.connection(), "users").await?);
    assert_eq!(ledger_versions(migrator.connection()).await?, vec![2]);

    let status = migrator.status().await?;
    assert_eq!(status.summary(), "Total: 2 | Applied: 1 | Pending: 1");

    Ok(())
}
