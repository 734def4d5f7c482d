//! One-time import of the legacy flat `commands.json` list.
//!
//! The legacy file is an array of `{command, name, description,
//! rtorr_description}` records. Import builds a fresh mapping store, with
//! categories decided in automatic mode, plus the side file for the source the
//! list was scraped from.

use crate::catalog::CategoryCatalogue;
use crate::categorizer::decide;
use crate::drivers::Distribution;
use crate::error::ConfigError;
use crate::matcher::match_command;
use crate::paths::DbPaths;
use crate::sources::{SourceEntry, SourceFile};
use crate::store::{CommandMapping, CommandStore, StoreLock};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_SOURCE: &str = "rtorr";
pub const DEFAULT_SOURCE_URL: &str = "https://vim.rtorr.com/";

#[derive(Clone, Debug, Deserialize)]
pub struct LegacyCommand {
    pub command: String,
    #[serde(default)]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub rtorr_description: String,
}

pub fn load_legacy(path: &Path) -> Result<Vec<LegacyCommand>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
    serde_json::from_str(&raw).map_err(|err| ConfigError::parse_text(path, &raw, err))
}

#[derive(Clone, Debug)]
pub struct Imported {
    pub store: CommandStore,
    pub source: SourceFile,
    /// Keys seen again after their first record; later records are dropped.
    pub duplicates: Vec<String>,
}

/// Build a store and source side file from legacy records.
pub fn import_records(
    records: &[LegacyCommand],
    catalogue: &CategoryCatalogue,
    source: &str,
    url: &str,
) -> Imported {
    let mut store = CommandStore::default();
    let mut side = SourceFile::new(source, url);
    let mut duplicates = Vec::new();

    for record in records {
        let matched = match_command(&record.command, &record.description, catalogue);
        let category = decide("", &matched).category;
        let mapping = CommandMapping::new(record.description.clone(), category);
        if !store.insert(record.command.clone(), mapping) {
            warn!(command = %record.command, "duplicate legacy command; keeping first record");
            duplicates.push(record.command.clone());
            continue;
        }
        side.commands.insert(
            record.command.clone(),
            SourceEntry {
                fragment: record.description.clone(),
                available: true,
            },
        );
    }

    Imported {
        store,
        source: side,
        duplicates,
    }
}

#[derive(Clone, Debug)]
pub struct ImportOptions {
    pub source: String,
    pub url: String,
    /// Replace an existing store instead of refusing.
    pub force: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            url: DEFAULT_SOURCE_URL.to_string(),
            force: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportReport {
    pub imported: usize,
    pub duplicates: Vec<String>,
    pub distribution: Distribution,
    pub store_path: PathBuf,
    pub source_path: PathBuf,
}

/// Import `legacy_path` into the database at `paths`.
pub fn run_import(paths: &DbPaths, legacy_path: &Path, options: &ImportOptions) -> Result<ImportReport> {
    let catalogue = CategoryCatalogue::load(&paths.catalog)
        .with_context(|| format!("loading category catalogue {}", paths.catalog.display()))?;
    let records = load_legacy(legacy_path)
        .with_context(|| format!("loading legacy commands {}", legacy_path.display()))?;

    fs::create_dir_all(&paths.db_dir)
        .with_context(|| format!("creating {}", paths.db_dir.display()))?;
    let _lock = StoreLock::acquire(&paths.store)?;
    if paths.store.exists() && !options.force {
        bail!(
            "{} already exists; pass --force to replace it",
            paths.store.display()
        );
    }

    let imported = import_records(&records, &catalogue, &options.source, &options.url);
    if imported.store.is_empty() {
        bail!("{} holds no commands; nothing to import", legacy_path.display());
    }
    let source_path = paths.db_dir.join(SourceFile::file_name(&options.source));
    imported.store.save(&paths.store)?;
    imported
        .source
        .save(&source_path)
        .with_context(|| format!("writing source file {}", source_path.display()))?;
    info!(
        commands = imported.store.len(),
        source = %options.source,
        "legacy import complete"
    );

    Ok(ImportReport {
        imported: imported.store.len(),
        distribution: Distribution::of(&imported.store),
        duplicates: imported.duplicates,
        store_path: paths.store.clone(),
        source_path,
    })
}
