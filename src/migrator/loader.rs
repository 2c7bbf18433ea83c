use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::errors::MigrationError;
use crate::migrator::migration::Migration;
use crate::migrator::parser::parse_migration_filename;
use crate::migrator::source::MigrationSource;
use crate::types::{Dialect, Direction};

/// Builds the ordered migration list for `dialect` from every file in `source`.
///
/// Entries are processed in filename order, so a duplicate version+direction always
/// resolves to the last file by name. Badly named files are skipped with a warning. A
/// file that parses but cannot be read as text aborts the load.
pub fn load_migrations(
    source: &dyn MigrationSource,
    dialect: Dialect,
) -> Result<Vec<Migration>, MigrationError> {
    let mut entries = source.entries()?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut by_version: BTreeMap<i32, Migration> = BTreeMap::new();
    let mut seen: HashSet<(i32, Direction)> = HashSet::new();

    for entry in entries {
        if entry.is_dir {
            continue;
        }

        let file = match parse_migration_filename(&entry.name) {
            Ok(file) => file,
            Err(e) if e.is_format_error() => {
                warn!("Skipping invalid migration file {}: {}", entry.name, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        if file.dialect != dialect {
            debug!("Skipping {} migration {}", file.dialect, entry.name);
            continue;
        }

        let bytes = source.read(&entry.name)?;
        let content =
            String::from_utf8(bytes).map_err(|e| MigrationError::load(&entry.name, e))?;
        let script = (!content.trim().is_empty()).then_some(content);

        let migration = by_version
            .entry(file.version)
            .or_insert_with(|| Migration::new(file.version, file.name.clone()));

        if !seen.insert((file.version, file.direction)) {
            warn!(
                "Duplicate {} script for migration {}, using {}",
                file.direction, file.version, entry.name
            );
            migration.name = file.name.clone();
        } else if migration.name != file.name {
            warn!(
                "Migration {} has mismatched names '{}' and '{}', keeping '{}'",
                file.version, migration.name, file.name, migration.name
            );
        }

        match file.direction {
            Direction::Up => migration.up_script = script,
            Direction::Down => migration.down_script = script,
        }
    }

    Ok(by_version.into_values().collect())
}
