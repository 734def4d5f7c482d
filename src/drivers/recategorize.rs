//! Interactive review of commands whose stored category the patterns do not
//! support.

use super::{Change, Distribution, load_inputs};
use crate::catalog::CategoryCatalogue;
use crate::categorizer::{Resolver, ReviewRequest, needs_review};
use crate::matcher::match_command;
use crate::paths::DbPaths;
use crate::store::{CommandStore, StoreLock};
use anyhow::{Result, bail};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct RecategorizeReport {
    /// Commands shown to the reviewer.
    pub reviewed: usize,
    pub changes: Vec<Change>,
    pub distribution: Distribution,
    pub persisted: bool,
}

impl RecategorizeReport {
    pub fn total(&self) -> usize {
        self.distribution.total()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Walk the store, asking `resolver` about every flagged command.
///
/// Commands whose category is among their matches are neither shown nor
/// touched. A resolver answering with an id the catalogue does not know is a
/// contract violation and aborts the review.
pub fn recategorize(
    catalogue: &CategoryCatalogue,
    store: &mut CommandStore,
    resolver: &mut dyn Resolver,
) -> Result<RecategorizeReport> {
    let mut reviewed = 0;
    let mut changes = Vec::new();

    for (key, mapping) in store.iter() {
        let matched = match_command(key, &mapping.canonical_description, catalogue);
        if !needs_review(&mapping.category, &matched) {
            continue;
        }
        reviewed += 1;
        let request = ReviewRequest {
            key,
            description: &mapping.canonical_description,
            current: &mapping.category,
            candidates: matched.sorted_ids(),
        };
        let resolution = resolver.resolve(&request, catalogue)?;
        let chosen = resolution.category(&mapping.category);
        if chosen != mapping.category && !catalogue.contains(chosen) {
            bail!("reviewer chose unknown category '{chosen}' for command '{key}'");
        }
        debug!(command = key, ?resolution, "review answered");
        if chosen != mapping.category {
            changes.push(Change {
                key: key.to_string(),
                from: mapping.category.clone(),
                to: chosen.to_string(),
            });
        }
    }

    for change in &changes {
        store.set_category(&change.key, &change.to);
    }

    Ok(RecategorizeReport {
        reviewed,
        distribution: Distribution::of(store),
        changes,
        persisted: false,
    })
}

/// Load, review and persist only if a category actually changed.
pub fn run_recategorize(paths: &DbPaths, resolver: &mut dyn Resolver) -> Result<RecategorizeReport> {
    let _lock = StoreLock::acquire(&paths.store)?;
    let (catalogue, mut store) = load_inputs(paths)?;
    let mut report = recategorize(&catalogue, &mut store, resolver)?;

    if report.has_changes() {
        store.save(&paths.store)?;
        report.persisted = true;
    } else {
        info!(reviewed = report.reviewed, "no categories changed");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryCatalogFile;
    use crate::categorizer::Resolution;
    use crate::store::CommandMapping;
    use serde_json::json;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<Resolution>,
        seen: Vec<String>,
    }

    impl Resolver for Scripted {
        fn resolve(
            &mut self,
            request: &ReviewRequest<'_>,
            _catalogue: &CategoryCatalogue,
        ) -> Result<Resolution> {
            self.seen.push(request.key.to_string());
            Ok(self.answers.pop_front().unwrap_or(Resolution::Skip))
        }
    }

    fn catalogue() -> CategoryCatalogue {
        let file: CategoryCatalogFile = serde_json::from_value(json!({
            "categories": {
                "motion": {"name": "Motion", "patterns": ["^h$", "^move"]},
                "edit": {"name": "Edit", "patterns": ["delete"]}
            }
        }))
        .unwrap();
        CategoryCatalogue::from_file(file).unwrap()
    }

    fn store() -> CommandStore {
        let mut store = CommandStore::default();
        store.insert("h", CommandMapping::new("move left", "motion"));
        store.insert("dd", CommandMapping::new("delete line", "motion"));
        store.insert("x", CommandMapping::new("remove char", "edit"));
        store
    }

    #[test]
    fn only_flagged_commands_are_shown() {
        let cat = catalogue();
        let mut store = store();
        let mut resolver = Scripted {
            answers: VecDeque::from(vec![Resolution::Assign("edit".into()), Resolution::Keep]),
            seen: Vec::new(),
        };
        let report = recategorize(&cat, &mut store, &mut resolver).unwrap();

        assert_eq!(resolver.seen, vec!["dd", "x"]);
        assert_eq!(report.reviewed, 2);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(store.get("dd").unwrap().category, "edit");
        assert_eq!(store.get("x").unwrap().category, "edit");
    }

    #[test]
    fn skipping_everything_changes_nothing() {
        let cat = catalogue();
        let mut store = store();
        let before = store.clone();
        let mut resolver = Scripted {
            answers: VecDeque::new(),
            seen: Vec::new(),
        };
        let report = recategorize(&cat, &mut store, &mut resolver).unwrap();
        assert!(!report.has_changes());
        assert_eq!(store, before);
    }

    #[test]
    fn unknown_assignment_aborts() {
        let cat = catalogue();
        let mut store = store();
        let mut resolver = Scripted {
            answers: VecDeque::from(vec![Resolution::Assign("bogus".into())]),
            seen: Vec::new(),
        };
        assert!(recategorize(&cat, &mut store, &mut resolver).is_err());
    }
}
