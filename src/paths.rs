//! Locating the command database on disk.
//!
//! Resolution order: explicit CLI paths, then `CATDB_DIR`, then the
//! compile-time `CATDB_DIR_HINT` captured by `build.rs`, then an upward search
//! from the working directory and from the executable for a directory holding
//! `categories.json`.

use crate::catalog::DEFAULT_CATALOG_FILE;
use crate::store::DEFAULT_STORE_FILE;
use anyhow::{Result, bail};
use clap::Args;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the database directory.
pub const ENV_DB_DIR: &str = "CATDB_DIR";

// Places a database directory may sit relative to a search root.
const DB_DIR_CANDIDATES: &[&str] = &[".", "db", "src/vim_prompt/db"];

/// Database location flags shared by every `catdb-*` binary.
#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// Database directory holding categories.json and command_mappings.json.
    #[arg(long, value_name = "DIR")]
    pub db_dir: Option<PathBuf>,
    /// Override the category catalogue path.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
    /// Override the command mapping store path.
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

/// Resolved file locations for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbPaths {
    pub db_dir: PathBuf,
    pub catalog: PathBuf,
    pub store: PathBuf,
}

impl DbPaths {
    /// Default file names inside `db_dir`.
    pub fn in_dir(db_dir: impl Into<PathBuf>) -> Self {
        let db_dir = db_dir.into();
        Self {
            catalog: db_dir.join(DEFAULT_CATALOG_FILE),
            store: db_dir.join(DEFAULT_STORE_FILE),
            db_dir,
        }
    }

    /// Apply CLI overrides on top of the discovered database directory.
    ///
    /// When both file paths are given explicitly no discovery happens; the
    /// database directory then defaults to the store's parent.
    pub fn resolve(args: &DbArgs) -> Result<Self> {
        let db_dir = match (&args.db_dir, &args.catalog, &args.store) {
            (Some(dir), _, _) => dir.clone(),
            (None, Some(_), Some(store)) => store
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            _ => find_db_dir()?,
        };
        let mut paths = Self::in_dir(db_dir);
        if let Some(catalog) = &args.catalog {
            paths.catalog = catalog.clone();
        }
        if let Some(store) = &args.store {
            paths.store = store.clone();
        }
        Ok(paths)
    }
}

fn is_db_dir(candidate: &Path) -> bool {
    candidate.join(DEFAULT_CATALOG_FILE).is_file()
}

fn db_dir_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_db_dir(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        for rel in DB_DIR_CANDIDATES {
            let candidate = dir.join(rel);
            if is_db_dir(&candidate) {
                return fs::canonicalize(candidate).ok();
            }
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the database directory without CLI input.
pub fn find_db_dir() -> Result<PathBuf> {
    if let Ok(env_dir) = env::var(ENV_DB_DIR) {
        if let Some(dir) = db_dir_from_hint(&env_dir) {
            return Ok(dir);
        }
    }

    if let Some(hint) = option_env!("CATDB_DIR_HINT") {
        if let Some(dir) = db_dir_from_hint(hint) {
            return Ok(dir);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(dir) = search_upwards(&cwd) {
            return Ok(dir);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(dir) = search_upwards(exe_dir) {
                return Ok(dir);
            }
        }
    }

    bail!(
        "Unable to locate the command database. Pass --db-dir or set {ENV_DB_DIR} to the directory holding {DEFAULT_CATALOG_FILE}."
    );
}
