//! Localization sources.
//!
//! A locale source maps translation keys to strings for one language. The
//! trait keeps the proprietary `.loc` decoder out of scope: herdbook reads
//! the decoded `*.loc.json` siblings, one JSON object per language whose
//! `DEV_ID` entry names the language.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use herdbook_store::text;
use indexmap::IndexMap;
use walkdir::WalkDir;

pub trait LocaleSource {
    /// Lower-cased language id (`english`, `russian`, ...).
    fn language(&self) -> &str;

    /// `None` when the key is not in the table at all; distinct from a key
    /// mapped to the empty string.
    fn lookup(&self, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone)]
pub struct LocTable {
    language: String,
    strings: IndexMap<String, String>,
}

impl LocTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = text::read_to_string(path)?;
        let strings: IndexMap<String, String> =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let language = strings
            .get("DEV_ID")
            .with_context(|| format!("{} has no DEV_ID entry", path.display()))?
            .to_lowercase();
        Ok(Self { language, strings })
    }

    /// Build a table directly, mainly for fixtures and tests.
    pub fn from_pairs(language: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            language: language.to_lowercase(),
            strings: pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl LocaleSource for LocTable {
    fn language(&self) -> &str {
        &self.language
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

/// Find every decoded locale table directly under `game_folder`.
///
/// Finding none is fatal: the merge stages cannot run without at least one
/// language, and continuing would silently blank every translation.
pub fn discover_locales(game_folder: &Path) -> Result<Vec<LocTable>> {
    let mut tables = Vec::new();
    for entry in WalkDir::new(game_folder)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".loc.json") {
            tables.push(LocTable::from_path(entry.path())?);
        }
    }
    ensure!(
        !tables.is_empty(),
        "no locale tables (*.loc.json) in {}",
        game_folder.display()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_table_and_language() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("english.loc.json");
        std::fs::write(
            &path,
            r#"{"DEV_ID": "ENGLISH", "STR_PONY_NAME": "Applejack"}"#,
        )
        .unwrap();

        let table = LocTable::from_path(&path).unwrap();
        assert_eq!(table.language(), "english");
        assert_eq!(table.lookup("STR_PONY_NAME"), Some("Applejack"));
        assert_eq!(table.lookup("STR_MISSING"), None);
    }

    #[test]
    fn discovery_requires_at_least_one_table() {
        let dir = tempdir().unwrap();
        assert!(discover_locales(dir.path()).is_err());

        std::fs::write(
            dir.path().join("german.loc.json"),
            r#"{"DEV_ID": "GERMAN"}"#,
        )
        .unwrap();
        let tables = discover_locales(dir.path()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].language(), "german");
    }
}
