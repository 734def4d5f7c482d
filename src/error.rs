//! Load-time failures for the catalogue, the mapping store and source files.
//!
//! Anything that goes wrong before processing starts is a `ConfigError`; the
//! drivers surface it and abort without writing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}{excerpt}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
        /// The offending line with a caret under the column, or empty.
        excerpt: String,
    },

    #[error("{} failed schema validation:\n{}", path.display(), details.join("\n"))]
    Schema { path: PathBuf, details: Vec<String> },

    #[error("category '{category}' has invalid pattern '{pattern}': {source}")]
    Pattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source,
            excerpt: String::new(),
        }
    }

    /// Like [`ConfigError::parse`], quoting the line of `raw` the error points at.
    pub(crate) fn parse_text(path: impl Into<PathBuf>, raw: &str, source: serde_json::Error) -> Self {
        let excerpt = excerpt(raw, source.line(), source.column());
        ConfigError::Parse {
            path: path.into(),
            source,
            excerpt,
        }
    }
}

fn excerpt(raw: &str, line: usize, column: usize) -> String {
    // serde_json reports 1-based lines; 0 means no position.
    let Some(text) = line.checked_sub(1).and_then(|idx| raw.lines().nth(idx)) else {
        return String::new();
    };
    let pad = text
        .chars()
        .take(column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect::<String>();
    format!("\n  {text}\n  {pad}^")
}
