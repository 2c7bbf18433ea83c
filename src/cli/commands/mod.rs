pub mod cmd_config;
pub mod cmd_db;
pub mod cmd_version;

use clap::Subcommand;

use crate::cli::commands::{cmd_db::DbCommands, cmd_version::VersionCommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the storefront database schema
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },

    /// Print the effective configuration
    Config,

    /// Print version
    Version(VersionCommand),
}

pub trait ExitOnErr<T> {
    fn exit_on_err(self, msg: &str) -> T;
}

/// `❌ <msg>: <error>`; the alternate form prints every cause of an `anyhow::Error`.
pub(crate) fn error_line(msg: &str, err: &impl std::fmt::Display) -> String {
    format!("❌ {}: {:#}", msg, err)
}

impl<T, E: std::fmt::Display> ExitOnErr<T> for Result<T, E> {
    fn exit_on_err(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{}", error_line(msg, &e));
                std::process::exit(1);
            }
        }
    }
}
