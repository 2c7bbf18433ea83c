pub mod db;
pub mod dialect;
pub mod migrations;

pub use db::init_db;
pub use dialect::{PostgresDialect, SqlDialect, SqliteDialect};
