mod commands;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use crate::cli::commands::{Commands, cmd_config, cmd_db, cmd_version};
use crate::config::Settings;
use crate::types::{Dialect, parse_dialect};
use crate::utils::validate_dir;

pub use commands::ExitOnErr;

pub struct Context<'a> {
    pub settings: &'a Settings,
}

#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    about = "Storefront schema migration CLI",
    long_about = format!(
r#"{} - {}"#,
"STOREFRONT".green().bold(),
"Versioned SQL migrations for the storefront database (PostgreSQL or SQLite)."
))]
pub struct Cli {
    /// Database dialect: postgres, sqlite or sqlite3
    #[arg(long, global = true, env = "DB_TYPE", value_parser = parse_dialect)]
    pub db_type: Option<Dialect>,

    /// Database connection URL
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub db_dsn: Option<String>,

    /// Read migrations from this directory instead of the embedded set
    #[arg(long, global = true, value_parser = validate_dir)]
    pub migrations_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Command line flags win over the environment file and `STOREFRONT__*` variables.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dialect) = self.db_type {
            settings.database.db_type = Some(dialect.to_string());
        }
        if let Some(dsn) = &self.db_dsn {
            settings.database.url = dsn.clone();
        }
        if let Some(dir) = &self.migrations_dir {
            settings.migrations.dir = Some(dir.to_string_lossy().to_string());
        }
    }

    /// `version` must keep working when the environment holds a broken configuration.
    pub fn needs_settings(&self) -> bool {
        !matches!(self.command, Commands::Version(_))
    }

    pub async fn execute(&self, ctx: &Context<'_>) {
        match &self.command {
            Commands::Db { action } => cmd_db::execute(action, ctx.settings).await,
            Commands::Config => cmd_config::execute(ctx.settings).await,
            Commands::Version(action) => cmd_version::execute(action, ctx.settings).await,
        }
    }
}
