//! vim-prompt command database.
//!
//! The launcher looks commands up in a mapping store; this crate keeps that
//! store categorized. Categories come from a catalogue of regex patterns, a
//! command's match set is every category whose patterns hit its key or
//! description, and three drivers act on those match sets: `migrate`
//! (automatic, batch), `recategorize` (interactive review) and `validate`
//! (read-only report). Legacy import and source search share the same store.

pub mod catalog;
pub mod categorizer;
pub mod drivers;
pub mod error;
pub mod legacy;
pub mod matcher;
pub mod paths;
pub mod prompt;
pub mod report;
mod schema_loader;
pub mod sources;
pub mod store;

pub use catalog::{CategoryCatalogue, UNCATEGORIZED};
pub use categorizer::{
    Decision, Finding, Resolution, Resolver, ReviewRequest, Severity, decide, needs_review,
};
pub use drivers::{
    Change, Distribution, MigrateOptions, MigrationReport, RecategorizeReport, ValidationReport,
    migrate, recategorize, run_migrate, run_recategorize, run_validate, validate,
};
pub use error::ConfigError;
pub use matcher::{MatchSet, match_command};
pub use paths::{DbArgs, DbPaths, find_db_dir};
pub use report::Palette;
pub use sources::{SearchHit, SourceFile, SourceSet};
pub use store::{CommandMapping, CommandStore};

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter for the `catdb-*` binaries.
pub const ENV_LOG: &str = "CATDB_LOG";

/// Install a stderr `tracing` subscriber filtered by `CATDB_LOG`
/// (default `warn`). Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
