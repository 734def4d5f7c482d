//! Embedded JSON Schemas for the database documents.
//!
//! Both the catalogue and the mapping store are checked against their schema
//! before typed decoding so a malformed file reports every violation at once
//! instead of the first serde error.

use crate::error::ConfigError;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::path::Path;

const CATEGORIES_SCHEMA: &str = include_str!("../schema/categories.schema.json");
const COMMAND_MAPPINGS_SCHEMA: &str = include_str!("../schema/command_mappings.schema.json");

/// Which database document a payload claims to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DocumentKind {
    Categories,
    CommandMappings,
}

impl DocumentKind {
    fn schema_source(self) -> &'static str {
        match self {
            DocumentKind::Categories => CATEGORIES_SCHEMA,
            DocumentKind::CommandMappings => COMMAND_MAPPINGS_SCHEMA,
        }
    }
}

/// Read a JSON document from disk and validate it against the schema for `kind`.
pub(crate) fn load_document(path: &Path, kind: DocumentKind) -> Result<Value, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
    let value: Value =
        serde_json::from_str(&raw).map_err(|err| ConfigError::parse_text(path, &raw, err))?;
    validate_document(path, kind, &value)?;
    Ok(value)
}

pub(crate) fn validate_document(
    path: &Path,
    kind: DocumentKind,
    value: &Value,
) -> Result<(), ConfigError> {
    // The embedded schemas are part of the build; a failure here is a packaging
    // bug, reported through the same channel as document errors.
    let schema: Value = serde_json::from_str(kind.schema_source())
        .map_err(|err| ConfigError::parse(path, err))?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| ConfigError::Schema {
        path: path.to_path_buf(),
        details: vec![format!("embedded schema did not compile: {err}")],
    })?;

    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect::<Vec<_>>();
        return Err(ConfigError::Schema {
            path: path.to_path_buf(),
            details,
        });
    }
    Ok(())
}
