pub mod fs;
pub mod logger;
pub mod time;

pub use fs::validate_dir;
pub use time::{format_elapsed, format_timestamp};
