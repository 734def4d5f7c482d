//! Category catalogue wiring.
//!
//! This module wraps the category catalogue on disk (`categories.json` in the
//! database directory) so the matcher and the drivers share one validated,
//! compiled snapshot. Types in `model` mirror the file; `CategoryCatalogue`
//! is the read-only view every run works against.

pub mod index;
pub mod model;

pub use index::{CategoryCatalogue, CompiledPattern, IdCollision};
pub use model::{CategoryCatalogFile, CategoryDef, SubcategoryDef, load_catalog_from_path};

/// Category id assigned to commands no pattern matches.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Default catalogue file name inside the database directory.
pub const DEFAULT_CATALOG_FILE: &str = "categories.json";
