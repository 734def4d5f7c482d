//! Documentation sources the launcher links commands to.
//!
//! Each `<source>_commands.json` in the database directory records, per
//! command key, the text fragment used to deep-link into that source's page
//! and whether the command is available there. Search joins these files with
//! the mapping store; spawning a picker or browser is left to the caller.

use crate::error::ConfigError;
use crate::store::{CommandStore, write_json_atomic};
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name suffix that marks a source side file.
pub const SOURCE_FILE_SUFFIX: &str = "_commands.json";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceEntry {
    pub fragment: String,
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceFile {
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub commands: IndexMap<String, SourceEntry>,
}

impl SourceFile {
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            commands: IndexMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        serde_json::from_str(&raw).map_err(|err| ConfigError::parse_text(path, &raw, err))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }

    /// File name this source is stored under.
    pub fn file_name(source: &str) -> String {
        format!("{source}{SOURCE_FILE_SUFFIX}")
    }

    /// Deep link to the command's fragment on the source page.
    pub fn url_for(&self, command: &str) -> Option<String> {
        let entry = self.commands.get(command)?;
        Some(format!("{}#:~:text={}", self.url, encode_fragment(&entry.fragment)))
    }
}

/// Percent-encode a text fragment, leaving `/` readable.
fn encode_fragment(fragment: &str) -> String {
    urlencoding::encode(fragment).replace("%2F", "/")
}

/// All source side files of a database directory, keyed by source name.
#[derive(Clone, Debug, Default)]
pub struct SourceSet {
    sources: BTreeMap<String, SourceFile>,
}

/// One search result: a mapping available in one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub command: String,
    pub description: String,
    pub source: String,
    pub url: String,
    pub fragment: String,
}

impl SourceSet {
    /// Load every `*_commands.json` in `dir`; the prefix names the source.
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut sources = BTreeMap::new();
        let entries = fs::read_dir(dir).map_err(|err| ConfigError::io(dir, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| ConfigError::io(dir, err))?;
            let file_name = entry.file_name();
            let Some(name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(SOURCE_FILE_SUFFIX))
            else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let file = SourceFile::load(&entry.path())?;
            debug!(source = name, commands = file.commands.len(), "loaded source");
            sources.insert(name.to_string(), file);
        }
        Ok(Self { sources })
    }

    pub fn insert(&mut self, name: impl Into<String>, file: SourceFile) {
        self.sources.insert(name.into(), file);
    }

    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn url_for(&self, command: &str, source: &str) -> Option<String> {
        self.sources.get(source)?.url_for(command)
    }

    /// Case-insensitive substring search over keys, descriptions and aliases.
    ///
    /// Each matching mapping yields one hit per source where the command is
    /// present and available, optionally restricted to a single source.
    pub fn search(&self, store: &CommandStore, query: &str, source: Option<&str>) -> Vec<SearchHit> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for (key, mapping) in store.iter() {
            let matches = key.to_lowercase().contains(&needle)
                || mapping.canonical_description.to_lowercase().contains(&needle)
                || mapping
                    .aliases
                    .iter()
                    .any(|alias| alias.to_lowercase().contains(&needle));
            if !matches {
                continue;
            }
            for (name, file) in &self.sources {
                if source.is_some_and(|wanted| wanted != name.as_str()) {
                    continue;
                }
                let Some(entry) = file.commands.get(key) else {
                    continue;
                };
                if !entry.available {
                    continue;
                }
                hits.push(SearchHit {
                    command: key.to_string(),
                    description: mapping.canonical_description.clone(),
                    source: name.clone(),
                    url: file.url.clone(),
                    fragment: entry.fragment.clone(),
                });
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CommandMapping;
    use tempfile::TempDir;

    fn rtorr() -> SourceFile {
        let mut file = SourceFile::new("rtorr", "https://vim.rtorr.com/");
        file.commands.insert(
            "dd".into(),
            SourceEntry {
                fragment: "delete (cut) a line".into(),
                available: true,
            },
        );
        file.commands.insert(
            "h".into(),
            SourceEntry {
                fragment: "move cursor left".into(),
                available: false,
            },
        );
        file
    }

    fn store() -> CommandStore {
        let mut store = CommandStore::default();
        store.insert("dd", CommandMapping::new("delete (cut) a line", "edit"));
        store.insert("h", CommandMapping::new("move cursor left", "motion"));
        store
    }

    #[test]
    fn url_encodes_fragment() {
        assert_eq!(
            rtorr().url_for("dd").as_deref(),
            Some("https://vim.rtorr.com/#:~:text=delete%20%28cut%29%20a%20line")
        );
        assert_eq!(rtorr().url_for("zz"), None);
    }

    #[test]
    fn slash_stays_unescaped_in_fragment() {
        assert_eq!(encode_fragment("search / forward"), "search%20/%20forward");
        assert_eq!(encode_fragment("a%2Fb"), "a%252Fb");
    }

    #[test]
    fn search_skips_unavailable_commands() {
        let mut set = SourceSet::default();
        set.insert("rtorr", rtorr());
        let hits = set.search(&store(), "LINE", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].command, "dd");
        assert!(set.search(&store(), "left", None).is_empty());
        assert!(set.search(&store(), "line", Some("other")).is_empty());
    }

    #[test]
    fn load_dir_picks_up_side_files_only() {
        let temp = TempDir::new().unwrap();
        rtorr()
            .save(&temp.path().join(SourceFile::file_name("rtorr")))
            .unwrap();
        fs::write(temp.path().join("command_mappings.json"), "{}").unwrap();
        let set = SourceSet::load_dir(temp.path()).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["rtorr"]);
        assert_eq!(set.get("rtorr").unwrap(), &rtorr());
    }
}
