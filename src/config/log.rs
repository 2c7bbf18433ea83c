use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Noisy dependency targets and the level they are capped at unless overridden.
const DEFAULT_EXT_LEVELS: [(&str, &str); 2] = [("sqlx", "error"), ("sea_orm", "warn")];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default)]
    pub file_enabled: bool,

    /// `target:level` pairs, comma separated, e.g. `sqlx:warn, sea_orm:info`.
    #[serde(
        default = "default_ext_level",
        deserialize_with = "deserialize_ext_level"
    )]
    pub ext_level: BTreeMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: Some("./logs".to_string()),
            console_format: default_console_format(),
            file_enabled: false,
            ext_level: default_ext_level(),
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directives: the base level followed by per-target overrides.
    pub fn filter_directives(&self) -> String {
        let mut filter = self.level.clone();
        for (target, level) in &self.ext_level {
            filter.push_str(&format!(",{}={}", target, level));
        }
        filter
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console_format() -> String {
    "pretty".to_string()
}

fn default_ext_level() -> BTreeMap<String, String> {
    DEFAULT_EXT_LEVELS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn deserialize_ext_level<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    let mut map = default_ext_level();

    for pair in s.iter().flat_map(|s| s.split(',')) {
        if let Some((target, level)) = pair.trim().split_once(':') {
            map.insert(target.trim().to_string(), level.trim().to_string());
        }
    }

    Ok(map)
}
