//! Bulk recategorization in automatic mode.

use super::{Change, Distribution, load_inputs};
use crate::catalog::CategoryCatalogue;
use crate::categorizer::decide;
use crate::matcher::match_command;
use crate::paths::DbPaths;
use crate::store::{CommandStore, StoreLock};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default)]
pub struct MigrateOptions {
    /// Compute and report, never write.
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MigrationReport {
    pub changes: Vec<Change>,
    pub distribution: Distribution,
    /// Whether the store file was rewritten.
    pub persisted: bool,
}

impl MigrationReport {
    pub fn total(&self) -> usize {
        self.distribution.total()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Recompute every command's category in memory.
pub fn migrate(catalogue: &CategoryCatalogue, store: &mut CommandStore) -> MigrationReport {
    let mut updates = Vec::new();
    for (key, mapping) in store.iter() {
        let matched = match_command(key, &mapping.canonical_description, catalogue);
        let decision = decide(&mapping.category, &matched);
        debug!(command = key, from = %mapping.category, to = %decision.category, "decided category");
        if decision.changed {
            updates.push(Change {
                key: key.to_string(),
                from: mapping.category.clone(),
                to: decision.category,
            });
        }
    }

    for change in &updates {
        store.set_category(&change.key, &change.to);
    }

    MigrationReport {
        distribution: Distribution::of(store),
        changes: updates,
        persisted: false,
    }
}

/// Load, migrate and persist only when something changed.
pub fn run_migrate(paths: &DbPaths, options: MigrateOptions) -> Result<MigrationReport> {
    let _lock = if options.dry_run {
        None
    } else {
        Some(StoreLock::acquire(&paths.store)?)
    };
    let (catalogue, mut store) = load_inputs(paths)?;
    let mut report = migrate(&catalogue, &mut store);

    if report.has_changes() && !options.dry_run {
        store.save(&paths.store)?;
        report.persisted = true;
    } else {
        info!(
            changes = report.changes.len(),
            dry_run = options.dry_run,
            "store left untouched"
        );
    }
    Ok(report)
}
