//! Category decisions for a single command.
//!
//! Three policies share one match set: automatic (batch migration), review
//! (interactive recategorization through a `Resolver`) and validation
//! (read-only findings).

use crate::catalog::{CategoryCatalogue, IdCollision, UNCATEGORIZED};
use crate::matcher::MatchSet;
use anyhow::Result;
use std::fmt;

/// Automatic-mode outcome for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub category: String,
    pub changed: bool,
}

/// Pick a category without asking anyone.
///
/// An empty match set yields `uncategorized`; otherwise the id with the most
/// pattern hits wins, ties going to the one declared first in the catalogue.
pub fn decide(current: &str, matched: &MatchSet) -> Decision {
    let category = matched.most_common().unwrap_or(UNCATEGORIZED).to_string();
    Decision {
        changed: category != current,
        category,
    }
}

/// Review mode surfaces a command when nothing matches or when its stored
/// category is not among the matches.
pub fn needs_review(current: &str, matched: &MatchSet) -> bool {
    matched.is_empty() || !matched.contains(current)
}

/// What a reviewer is shown for one flagged command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRequest<'a> {
    pub key: &'a str,
    pub description: &'a str,
    pub current: &'a str,
    /// Matched ids, sorted.
    pub candidates: Vec<String>,
}

/// A reviewer's answer for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Keep,
    Skip,
    /// One of the candidates, or any id known to the catalogue.
    Assign(String),
}

impl Resolution {
    /// The category the command ends up with.
    pub fn category<'a>(&'a self, current: &'a str) -> &'a str {
        match self {
            Resolution::Keep | Resolution::Skip => current,
            Resolution::Assign(id) => id,
        }
    }
}

/// Human-in-the-loop strategy for review mode.
///
/// Implementations block until they have an answer. `catalogue` is passed so
/// a resolver can list and check the ids a reviewer may type.
pub trait Resolver {
    fn resolve(
        &mut self,
        request: &ReviewRequest<'_>,
        catalogue: &CategoryCatalogue,
    ) -> Result<Resolution>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A validation observation. Only `InvalidCategory` and `IdCollision` are
/// errors; everything else is advisory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    /// Stored category is not an id in the catalogue.
    InvalidCategory { key: String, category: String },
    /// A catalogue id is declared twice in the flat namespace.
    IdCollision(IdCollision),
    /// No pattern matches the command at all.
    NoMatch { key: String, category: String },
    /// Patterns match, but not the stored category.
    BetterMatch {
        key: String,
        category: String,
        suggestions: Vec<String>,
    },
    /// A catalogue id no command is stored under.
    UnusedCategory { id: String },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::InvalidCategory { .. } | Finding::IdCollision(_) => Severity::Error,
            Finding::NoMatch { .. }
            | Finding::BetterMatch { .. }
            | Finding::UnusedCategory { .. } => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::InvalidCategory { key, category } => {
                write!(f, "Invalid category '{category}' for command '{key}'")
            }
            Finding::IdCollision(c) => write!(
                f,
                "Category id '{}' declared at '{}' collides with '{}'",
                c.id, c.duplicate, c.first
            ),
            Finding::NoMatch { key, category } => write!(
                f,
                "Command '{key}' doesn't match any patterns (stored as '{category}')"
            ),
            Finding::BetterMatch {
                key, suggestions, ..
            } => write!(
                f,
                "Command '{key}' might be better categorized as: {}",
                suggestions.join(", ")
            ),
            Finding::UnusedCategory { id } => {
                write!(f, "Category '{id}' is not used by any commands")
            }
        }
    }
}

/// Validation-mode verdict for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assessment {
    pub finding: Option<Finding>,
    /// The stored category is one of the matched ids.
    pub properly_categorized: bool,
}

/// Judge a stored category without changing it.
///
/// A dangling category is reported on its own; match warnings only apply to
/// commands whose category resolves.
pub fn assess(
    key: &str,
    current: &str,
    matched: &MatchSet,
    catalogue: &CategoryCatalogue,
) -> Assessment {
    if !catalogue.contains(current) {
        return Assessment {
            finding: Some(Finding::InvalidCategory {
                key: key.to_string(),
                category: current.to_string(),
            }),
            properly_categorized: false,
        };
    }

    let finding = if matched.is_empty() {
        Some(Finding::NoMatch {
            key: key.to_string(),
            category: current.to_string(),
        })
    } else if !matched.contains(current) {
        Some(Finding::BetterMatch {
            key: key.to_string(),
            category: current.to_string(),
            suggestions: matched.others(current),
        })
    } else {
        None
    };

    Assessment {
        finding,
        properly_categorized: matched.contains(current),
    }
}
