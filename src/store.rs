//! Command mapping store (`command_mappings.json`).
//!
//! The store is the only mutable aggregate in a run. Drivers load it once,
//! change categories in memory and persist the whole document back with an
//! atomic rename. Key order from disk is preserved so rewrites only touch the
//! lines whose category changed.

use crate::error::ConfigError;
use crate::schema_loader::{DocumentKind, load_document};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Default store file name inside the database directory.
pub const DEFAULT_STORE_FILE: &str = "command_mappings.json";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandMapping {
    pub canonical_description: String,
    pub aliases: Vec<String>,
    pub category: String,
    /// Fields this crate does not interpret, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommandMapping {
    /// A fresh mapping whose only alias is the canonical description.
    pub fn new(description: impl Into<String>, category: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            aliases: vec![description.clone()],
            canonical_description: description,
            category: category.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandStore {
    #[serde(flatten)]
    extra: Map<String, Value>,
    #[serde(rename = "command_mappings")]
    mappings: IndexMap<String, CommandMapping>,
}

impl CommandStore {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let value = load_document(path, DocumentKind::CommandMappings)?;
        let store: CommandStore =
            serde_json::from_value(value).map_err(|err| ConfigError::parse(path, err))?;
        debug!(path = %path.display(), commands = store.len(), "loaded command store");
        Ok(store)
    }

    /// Write the store as 2-space indented JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        info!(path = %path.display(), commands = self.len(), "persisted command store");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CommandMapping> {
        self.mappings.get(key)
    }

    /// Iterate mappings in on-disk order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandMapping)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Add a mapping; an existing key is left untouched and `false` returned.
    pub fn insert(&mut self, key: impl Into<String>, mapping: CommandMapping) -> bool {
        let key = key.into();
        if self.mappings.contains_key(&key) {
            return false;
        }
        self.mappings.insert(key, mapping);
        true
    }

    /// Reassign a command's category, returning the previous one.
    pub fn set_category(&mut self, key: &str, category: &str) -> Option<String> {
        let mapping = self.mappings.get_mut(key)?;
        Some(std::mem::replace(&mut mapping.category, category.to_string()))
    }
}

/// Serialize `value` as pretty JSON into a sibling temporary file and rename
/// it over `path`.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, value)
        .with_context(|| format!("serializing {}", path.display()))?;
    tmp.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Advisory exclusive lock held across a load-modify-persist sequence.
///
/// The lock is taken on the directory holding the store rather than on a
/// sibling file, so locking never adds entries to the database directory and
/// the store itself can still be replaced by rename while the lock is held.
#[derive(Debug)]
pub struct StoreLock {
    dir: PathBuf,
    _handle: Option<File>,
}

impl StoreLock {
    /// Block until the lock for `store_path` is acquired.
    pub fn acquire(store_path: &Path) -> Result<Self> {
        let dir = store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let handle = lock_dir(&dir).with_context(|| format!("locking {}", dir.display()))?;
        debug!(dir = %dir.display(), "acquired store lock");
        Ok(Self { dir, _handle: handle })
    }

    /// Directory the lock is held on.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(unix)]
fn lock_dir(dir: &Path) -> std::io::Result<Option<File>> {
    use std::os::unix::io::AsRawFd;
    let handle = File::open(dir)?;
    // Released when the descriptor closes.
    let rc = unsafe { libc::flock(handle.as_raw_fd(), libc::LOCK_EX) };
    if rc == 0 {
        Ok(Some(handle))
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn lock_dir(_dir: &Path) -> std::io::Result<Option<File>> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_store(dir: &Path, value: serde_json::Value) -> PathBuf {
        let path = dir.join(DEFAULT_STORE_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
        path
    }

    #[test]
    fn save_preserves_key_order() {
        let temp = TempDir::new().unwrap();
        let path = write_store(
            temp.path(),
            json!({"command_mappings": {
                "zz": {"canonical_description": "center", "aliases": ["center"], "category": "view"},
                "dd": {"canonical_description": "delete line", "aliases": ["delete line"], "category": "edit"}
            }}),
        );
        let mut store = CommandStore::load(&path).unwrap();
        assert_eq!(store.set_category("dd", "motion").as_deref(), Some("edit"));
        store.save(&path).unwrap();

        let reloaded = CommandStore::load(&path).unwrap();
        let keys: Vec<&str> = reloaded.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zz", "dd"]);
        assert_eq!(reloaded.get("dd").unwrap().category, "motion");
    }

    #[test]
    fn unchanged_store_round_trips_byte_identical() {
        let temp = TempDir::new().unwrap();
        let path = write_store(
            temp.path(),
            json!({"command_mappings": {
                "h": {"canonical_description": "move left", "aliases": ["move left"], "category": "motion"}
            }}),
        );
        let before = std::fs::read(&path).unwrap();
        CommandStore::load(&path).unwrap().save(&path).unwrap();
        assert_eq!(before, std::fs::read(&path).unwrap());
    }

    #[test]
    fn missing_store_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let err = CommandStore::load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn insert_keeps_first_mapping() {
        let mut store = CommandStore::default();
        assert!(store.insert("h", CommandMapping::new("move left", "motion")));
        assert!(!store.insert("h", CommandMapping::new("other", "edit")));
        let mapping = store.get("h").unwrap();
        assert_eq!(mapping.aliases, vec!["move left".to_string()]);
        assert_eq!(mapping.category, "motion");
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn lock_leaves_directory_untouched() {
        let temp = TempDir::new().unwrap();
        let store_path = temp.path().join(DEFAULT_STORE_FILE);
        let lock = StoreLock::acquire(&store_path).unwrap();
        assert_eq!(lock.dir(), temp.path());
        assert!(listing(temp.path()).is_empty());
        drop(lock);
        assert!(listing(temp.path()).is_empty());
    }

    #[test]
    fn store_can_be_replaced_while_locked() {
        let temp = TempDir::new().unwrap();
        let path = write_store(
            temp.path(),
            json!({"command_mappings": {
                "h": {"canonical_description": "move left", "aliases": ["move left"], "category": "edit"}
            }}),
        );
        let _lock = StoreLock::acquire(&path).unwrap();
        let mut store = CommandStore::load(&path).unwrap();
        store.set_category("h", "motion");
        store.save(&path).unwrap();
        assert_eq!(CommandStore::load(&path).unwrap().get("h").unwrap().category, "motion");
        assert_eq!(listing(temp.path()), vec![DEFAULT_STORE_FILE.to_string()]);
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let temp = TempDir::new().unwrap();
        let path = write_store(
            temp.path(),
            json!({
                "version": 2,
                "command_mappings": {
                    "dd": {
                        "canonical_description": "delete line",
                        "aliases": ["delete line"],
                        "category": "motion",
                        "notes": "keep me"
                    }
                }
            }),
        );
        let mut store = CommandStore::load(&path).unwrap();
        store.set_category("dd", "edit");
        store.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 2);
        assert_eq!(raw["command_mappings"]["dd"]["notes"], "keep me");
        assert_eq!(raw["command_mappings"]["dd"]["category"], "edit");
    }
}
