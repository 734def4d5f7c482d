//! Batch drivers over the whole mapping store.
//!
//! Each driver has a pure half that works on an already loaded catalogue and
//! store (what tests exercise) and a `run_*` half that loads from disk, takes
//! the store lock when it may write, and decides whether to persist. Loading
//! happens before any processing, so a bad file aborts with nothing written.

pub mod migrate;
pub mod recategorize;
pub mod validate;

pub use migrate::{MigrateOptions, MigrationReport, migrate, run_migrate};
pub use recategorize::{RecategorizeReport, recategorize, run_recategorize};
pub use validate::{CategoryUsage, ValidationReport, run_validate, validate};

use crate::catalog::CategoryCatalogue;
use crate::paths::DbPaths;
use crate::store::CommandStore;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;

/// One category reassignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    pub key: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.key, self.from, self.to)
    }
}

/// Commands per stored category after a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
    total: usize,
    counts: BTreeMap<String, usize>,
}

impl Distribution {
    pub fn of(store: &CommandStore) -> Self {
        let mut dist = Distribution::default();
        for (_, mapping) in store.iter() {
            dist.total += 1;
            *dist.counts.entry(mapping.category.clone()).or_insert(0) += 1;
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// `(category, count, percent of total)` sorted by category id.
    pub fn rows(&self) -> Vec<(&str, usize, f64)> {
        self.counts
            .iter()
            .map(|(cat, &count)| (cat.as_str(), count, percent(count, self.total)))
            .collect()
    }
}

pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Load catalogue then store; either failing aborts the run.
pub(crate) fn load_inputs(paths: &DbPaths) -> Result<(CategoryCatalogue, CommandStore)> {
    let catalogue = CategoryCatalogue::load(&paths.catalog)
        .with_context(|| format!("loading category catalogue {}", paths.catalog.display()))?;
    let store = CommandStore::load(&paths.store)
        .with_context(|| format!("loading command store {}", paths.store.display()))?;
    Ok((catalogue, store))
}
