//! Compiled view of a category catalogue.
//!
//! Every pattern is compiled once, case-insensitively, and flattened into a
//! single ordered list: a category's own patterns first, then those of its
//! subcategories, categories in declaration order. Matching walks that list,
//! so the order here is what makes tie-breaks reproducible.

use crate::catalog::{CategoryCatalogFile, load_catalog_from_path};
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// One catalogue pattern bound to the (sub)category id it votes for.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    pub category_id: String,
    pub source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// An id declared more than once in the flat id namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdCollision {
    pub id: String,
    /// Where the id was first declared (`"motion"` or `"motion/word"`).
    pub first: String,
    /// The later declaration that collides with it.
    pub duplicate: String,
}

#[derive(Debug)]
pub struct CategoryCatalogue {
    patterns: Vec<CompiledPattern>,
    ids: BTreeSet<String>,
    ordered_ids: Vec<String>,
    display_names: BTreeMap<String, String>,
    collisions: Vec<IdCollision>,
}

impl CategoryCatalogue {
    /// Load the catalogue from disk and compile its patterns.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = load_catalog_from_path(path)?;
        let catalogue = Self::from_file(file)?;
        debug!(
            path = %path.display(),
            categories = catalogue.ordered_ids.len(),
            patterns = catalogue.patterns.len(),
            "loaded category catalogue"
        );
        Ok(catalogue)
    }

    /// Compile an already decoded catalogue.
    ///
    /// Invalid regular expressions are fatal. Id collisions are not: they are
    /// recorded for validation to report, and the first declaration keeps the
    /// display name.
    pub fn from_file(file: CategoryCatalogFile) -> Result<Self, ConfigError> {
        let mut patterns = Vec::new();
        let mut ids = BTreeSet::new();
        let mut ordered_ids = Vec::new();
        let mut display_names = BTreeMap::new();
        let mut declared_at: BTreeMap<String, String> = BTreeMap::new();
        let mut collisions = Vec::new();

        let mut declare = |id: &str, location: String, display: String| {
            if let Some(first) = declared_at.get(id) {
                collisions.push(IdCollision {
                    id: id.to_string(),
                    first: first.clone(),
                    duplicate: location,
                });
                return;
            }
            declared_at.insert(id.to_string(), location);
            ids.insert(id.to_string());
            ordered_ids.push(id.to_string());
            display_names.insert(id.to_string(), display);
        };

        for (cat_id, cat) in &file.categories {
            declare(cat_id, cat_id.clone(), cat.name.clone());
            for (sub_id, sub) in &cat.subcategories {
                declare(
                    sub_id,
                    format!("{cat_id}/{sub_id}"),
                    format!("{} - {}", cat.name, sub.name),
                );
            }
        }

        for (cat_id, cat) in &file.categories {
            for pattern in &cat.patterns {
                patterns.push(compile(cat_id, pattern)?);
            }
            for (sub_id, sub) in &cat.subcategories {
                for pattern in &sub.patterns {
                    patterns.push(compile(sub_id, pattern)?);
                }
            }
        }

        Ok(Self {
            patterns,
            ids,
            ordered_ids,
            display_names,
            collisions,
        })
    }

    /// Every pattern paired with its category id, in matching order.
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Union of top-level and subcategory ids.
    pub fn all_category_ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    /// Category ids in declaration order, each subcategory after its parent.
    pub fn ids_in_order(&self) -> impl Iterator<Item = &str> {
        self.ordered_ids.iter().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Human label for an id: the category name, or `"Parent - Child"` for
    /// subcategories.
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.display_names.get(id).map(String::as_str)
    }

    pub fn id_collisions(&self) -> &[IdCollision] {
        &self.collisions
    }
}

fn compile(category_id: &str, pattern: &str) -> Result<CompiledPattern, ConfigError> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::Pattern {
            category: category_id.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(CompiledPattern {
        category_id: category_id.to_string(),
        source: pattern.to_string(),
        regex,
    })
}
