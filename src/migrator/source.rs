use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use rust_embed::RustEmbed;

use crate::errors::MigrationError;

/// One entry of a migration bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Read-only bundle of migration files addressable by name.
pub trait MigrationSource {
    fn entries(&self) -> Result<Vec<SourceEntry>, MigrationError>;

    fn read(&self, name: &str) -> Result<Vec<u8>, MigrationError>;

    fn describe(&self) -> String;
}

#[derive(RustEmbed)]
#[folder = "migrations/"]
struct EmbeddedFiles;

/// The `migrations/` directory compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedMigrations;

impl MigrationSource for EmbeddedMigrations {
    fn entries(&self) -> Result<Vec<SourceEntry>, MigrationError> {
        Ok(EmbeddedFiles::iter()
            .filter(|path| !path.contains('/'))
            .map(|path| SourceEntry::file(path.into_owned()))
            .collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, MigrationError> {
        EmbeddedFiles::get(name)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| MigrationError::load(name, "not found in embedded migrations"))
    }

    fn describe(&self) -> String {
        "embedded migrations".to_string()
    }
}

/// Migration files read from a directory at runtime.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MigrationSource for DirectorySource {
    fn entries(&self) -> Result<Vec<SourceEntry>, MigrationError> {
        let dir_name = self.dir.display().to_string();
        let read_dir =
            std::fs::read_dir(&self.dir).map_err(|e| MigrationError::load(&dir_name, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| MigrationError::load(&dir_name, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| MigrationError::load(&dir_name, e))?;
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, MigrationError> {
        std::fs::read(self.dir.join(name)).map_err(|e| MigrationError::load(name, e))
    }

    fn describe(&self) -> String {
        format!("directory '{}'", self.dir.display())
    }
}

/// Migration bundle assembled in code.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }

    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        self.dirs.insert(name.into());
        self
    }
}

impl MigrationSource for MemorySource {
    fn entries(&self) -> Result<Vec<SourceEntry>, MigrationError> {
        Ok(self
            .dirs
            .iter()
            .map(SourceEntry::dir)
            .chain(self.files.keys().map(SourceEntry::file))
            .collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, MigrationError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| MigrationError::load(name, "no such file"))
    }

    fn describe(&self) -> String {
        format!("in-memory bundle ({} files)", self.files.len())
    }
}
