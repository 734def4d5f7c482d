//! Read-only consistency check of the store against the catalogue.

use super::{load_inputs, percent};
use crate::catalog::CategoryCatalogue;
use crate::categorizer::{Finding, assess};
use crate::matcher::match_command;
use crate::paths::DbPaths;
use crate::store::CommandStore;
use anyhow::Result;
use tracing::debug;

/// Commands stored under exactly one catalogue id (no subcategory rollup).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryUsage {
    pub id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub total: usize,
    pub properly_categorized: usize,
    /// Catalogue collisions first, then per-command findings in store order,
    /// then unused categories.
    pub findings: Vec<Finding>,
    /// Every catalogue id in declaration order.
    pub usage: Vec<CategoryUsage>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Warnings never fail validation.
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Properly categorized share of all commands, rounded to one decimal.
    pub fn categorization_rate(&self) -> f64 {
        (percent(self.properly_categorized, self.total) * 10.0).round() / 10.0
    }
}

pub fn validate(catalogue: &CategoryCatalogue, store: &CommandStore) -> ValidationReport {
    let mut findings: Vec<Finding> = catalogue
        .id_collisions()
        .iter()
        .cloned()
        .map(Finding::IdCollision)
        .collect();
    let mut properly_categorized = 0;

    for (key, mapping) in store.iter() {
        let matched = match_command(key, &mapping.canonical_description, catalogue);
        let assessment = assess(key, &mapping.category, &matched, catalogue);
        if assessment.properly_categorized {
            properly_categorized += 1;
        }
        if let Some(finding) = assessment.finding {
            debug!(command = key, %finding, "validation finding");
            findings.push(finding);
        }
    }

    let usage: Vec<CategoryUsage> = catalogue
        .ids_in_order()
        .map(|id| CategoryUsage {
            id: id.to_string(),
            name: catalogue.display_name(id).unwrap_or(id).to_string(),
            count: store.iter().filter(|(_, m)| m.category == id).count(),
        })
        .collect();

    findings.extend(
        usage
            .iter()
            .filter(|u| u.count == 0)
            .map(|u| Finding::UnusedCategory { id: u.id.clone() }),
    );

    ValidationReport {
        total: store.len(),
        properly_categorized,
        findings,
        usage,
    }
}

/// Load both files and validate. Never writes.
pub fn run_validate(paths: &DbPaths) -> Result<ValidationReport> {
    let (catalogue, store) = load_inputs(paths)?;
    Ok(validate(&catalogue, &store))
}
