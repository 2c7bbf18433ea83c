pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrator;
pub mod types;
pub mod utils;
