pub mod executor;
pub mod ledger;
pub mod loader;
pub mod migration;
pub mod migrator;
pub mod parser;
pub mod report;
pub mod source;

pub use executor::Executor;
pub use ledger::{LEDGER_TABLE, Ledger};
pub use loader::load_migrations;
pub use migration::Migration;
pub use migrator::Migrator;
pub use parser::{MigrationFile, parse_migration_filename};
pub use report::{DownOutcome, ResetMode, ResetReport, StatusEntry, StatusReport, UpReport};
pub use source::{DirectorySource, EmbeddedMigrations, MemorySource, MigrationSource, SourceEntry};
