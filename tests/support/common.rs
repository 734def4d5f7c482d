#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use vim_prompt::DbPaths;

// A throwaway database directory holding categories.json and
// command_mappings.json, removed on drop.
pub struct TempDb {
    dir: TempDir,
}

impl TempDb {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("creating temp db dir")?,
        })
    }

    pub fn with(categories: &Value, mappings: &Value) -> Result<Self> {
        let db = Self::new()?;
        db.write_catalog(categories)?;
        db.write_store(mappings)?;
        Ok(db)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> DbPaths {
        DbPaths::in_dir(self.dir.path())
    }

    pub fn write_catalog(&self, value: &Value) -> Result<PathBuf> {
        let path = self.paths().catalog;
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    pub fn write_store(&self, value: &Value) -> Result<PathBuf> {
        let path = self.paths().store;
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    pub fn store_bytes(&self) -> Result<Vec<u8>> {
        let path = self.paths().store;
        fs::read(&path).with_context(|| format!("reading {}", path.display()))
    }

    pub fn store_json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.store_bytes()?)?)
    }

    // Sorted file names in the database directory.
    pub fn listing(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root())? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub fn category_of(&self, key: &str) -> Result<String> {
        let value = self.store_json()?;
        value
            .pointer(&format!("/command_mappings/{key}/category"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .with_context(|| format!("command {key} missing from store"))
    }
}

pub fn mapping(description: &str, category: &str) -> Value {
    json!({
        "canonical_description": description,
        "aliases": [description],
        "category": category
    })
}

// motion/^h$ and edit/delete, plus a motion subcategory that nothing uses.
pub fn scenario_catalog() -> Value {
    json!({
        "categories": {
            "motion": {
                "name": "Motion",
                "patterns": ["^h$", "^l$"],
                "subcategories": {
                    "word_motion": {"name": "Word", "patterns": ["next word"]}
                }
            },
            "edit": {"name": "Edit", "patterns": ["delete"]}
        }
    })
}

pub fn scenario_store() -> Value {
    json!({
        "command_mappings": {
            "h": mapping("move left", "uncategorized"),
            "dd": mapping("delete line", "motion"),
            "x": mapping("remove char", "edit")
        }
    })
}

pub fn run_bin(bin: &str, args: &[&str]) -> Result<Output> {
    Command::new(bin)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("CATDB_DIR")
        .output()
        .with_context(|| format!("failed to execute {bin}"))
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
