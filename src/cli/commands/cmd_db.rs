use std::time::Instant;

use clap::Subcommand;
use colored::Colorize;
use inquire::Confirm;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tracing::info;

use crate::cli::commands::ExitOnErr;
use crate::config::Settings;
use crate::db::migrations;
use crate::migrator::{DownOutcome, ResetMode, StatusReport};
use crate::types::MigrationStatus;
use crate::utils::{format_elapsed, format_timestamp};

#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// Apply pending migrations
    Up {
        /// Stop after this version
        #[arg(long)]
        target: Option<i32>,
    },

    /// Roll back the most recently applied migration
    Down,

    /// Roll back every applied migration, newest first
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,

        /// Refuse to start if an applied migration has no down script
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Show applied and pending migrations
    Status,
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },

    /// Connect and apply all pending migrations, as done on server start
    Init,
}

pub async fn execute(action: &DbCommands, settings: &Settings) {
    match action {
        DbCommands::Migrate { action } => match action {
            MigrateCommands::Up { target } => up(settings, *target).await,
            MigrateCommands::Down => down(settings).await,
            MigrateCommands::Reset { yes, strict } => reset(settings, *yes, *strict).await,
            MigrateCommands::Status => status(settings).await,
        },
        DbCommands::Init => init(settings).await,
    }
}

pub async fn up(settings: &Settings, target: Option<i32>) {
    let migrator = migrations::connect_migrator(settings)
        .await
        .exit_on_err("Failed to initialize migrator");

    let started = Instant::now();
    let report = migrator
        .up(target)
        .await
        .exit_on_err("Failed to run migrations");

    for version in &report.skipped {
        println!("⚠️ Version {} has no UP script, skipped", version);
    }

    if report.applied.is_empty() {
        println!("✅ No pending migrations");
        return;
    }
    println!(
        "✅ Applied {} migration(s) in {}",
        report.count(),
        format_elapsed(started.elapsed())
    );
}

pub async fn down(settings: &Settings) {
    let migrator = migrations::connect_migrator(settings)
        .await
        .exit_on_err("Failed to initialize migrator");

    let outcome = migrator
        .down()
        .await
        .exit_on_err("Failed to rollback migration");

    match outcome {
        DownOutcome::NothingToRollback => println!("✅ No migrations to rollback"),
        DownOutcome::RolledBack { version, name } => {
            println!("✅ Rolled back migration {}: {}", version, name)
        }
    }
}

pub async fn reset(settings: &Settings, yes: bool, strict: bool) {
    let proceed = yes
        || Confirm::new("This will roll back every applied migration. Continue?")
            .with_default(false)
            .prompt()
            .unwrap_or(false);

    if !proceed {
        println!("✅ Aborted");
        return;
    }

    let mode = if strict {
        ResetMode::Strict
    } else {
        settings.migrations.reset_mode()
    };

    let migrator = migrations::connect_migrator(settings)
        .await
        .exit_on_err("Failed to initialize migrator");

    let report = migrator
        .reset(mode)
        .await
        .exit_on_err("Failed to reset migrations");

    if report.nothing_applied {
        println!("✅ No migrations to reset");
        return;
    }

    for version in &report.skipped {
        println!(
            "⚠️ Version {} has no DOWN script and remains marked as applied",
            version
        );
    }
    println!("✅ Rolled back {} migration(s)", report.rolled_back.len());
}

pub async fn status(settings: &Settings) {
    let migrator = migrations::connect_migrator(settings)
        .await
        .exit_on_err("Failed to initialize migrator");

    let report = migrator
        .status()
        .await
        .exit_on_err("Failed to read migration status");

    println!(
        "{}",
        format!("=== Migration Status ({}) ===", migrator.dialect()).blue()
    );
    print_status(&report);
}

pub async fn init(settings: &Settings) {
    info!("Initializing database");
    migrations::migrate_on_boot(settings)
        .await
        .exit_on_err("Failed to initialize database");

    println!("✅ Database is up to date");
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Version")]
    version: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Applied At")]
    applied_at: String,
}

fn print_status(report: &StatusReport) {
    if report.entries.is_empty() {
        println!("✅ No migrations found");
    } else {
        let rows: Vec<StatusRow> = report
            .entries
            .iter()
            .map(|e| StatusRow {
                version: format!("{:03}", e.version).bright_black().to_string(),
                name: e.name.clone(),
                status: e.status.to_colored_string(),
                applied_at: match &e.status {
                    MigrationStatus::Applied { applied_at } => format_timestamp(applied_at),
                    MigrationStatus::Pending => "-".to_string(),
                },
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
            .to_string();

        println!("{}", table);
    }

    for (version, applied_at) in &report.orphaned {
        println!(
            "⚠️ Version {} applied at {} has no migration file",
            version,
            format_timestamp(applied_at)
        );
    }

    println!("{}", report.summary());
}
