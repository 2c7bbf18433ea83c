use std::time::Duration;

use chrono::{DateTime, Utc};

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Example output: `"0.148s"`
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3}s", elapsed.as_millis() as f64 / 1000.0)
}
