use crate::error::ConfigError;
use crate::schema_loader::{DocumentKind, load_document};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape of `categories.json`.
///
/// Maps are `IndexMap`s because declaration order is what breaks ties between
/// equally matched categories.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CategoryCatalogFile {
    pub categories: IndexMap<String, CategoryDef>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CategoryDef {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub subcategories: IndexMap<String, SubcategoryDef>,
}

/// Subcategories do not nest further.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SubcategoryDef {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Read, schema-check and decode a catalogue file.
pub fn load_catalog_from_path(path: &Path) -> Result<CategoryCatalogFile, ConfigError> {
    let value = load_document(path, DocumentKind::Categories)?;
    serde_json::from_value(value).map_err(|err| ConfigError::parse(path, err))
}
