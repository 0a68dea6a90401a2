//! Prize catalog: `prizetype.json`.
//!
//! `PrizeData` carries display info (loc string + icon) per prize id;
//! `PrizeStrings` lists the alias ids the object data uses for the same
//! prize. Reward resolution folds aliases down to canonical ids.

use std::path::Path;

use anyhow::{Context, Result};
use herdbook_store::text;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrizeCatalog {
    #[serde(default, rename = "PrizeData")]
    pub data: IndexMap<String, PrizeData>,
    #[serde(default, rename = "PrizeStrings")]
    pub strings: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrizeData {
    #[serde(default)]
    pub loc_string: String,
    #[serde(default)]
    pub image: String,
}

impl PrizeCatalog {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = text::read_to_string(path)?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Alias → prize id, flattened from the `PrizeStrings` lists.
    pub fn alias_map(&self) -> IndexMap<String, String> {
        let mut aliases = IndexMap::new();
        for (prize_id, names) in &self.strings {
            for name in names {
                aliases.insert(name.clone(), prize_id.clone());
            }
        }
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_map_flattens_strings() {
        let catalog: PrizeCatalog = serde_json::from_str(
            r#"{
                "PrizeData": {"XP": {"loc_string": "STR_XP", "image": "icons/xp"}},
                "PrizeStrings": {"XP": ["XP", "Exp"], "Bits": ["Bits"]}
            }"#,
        )
        .unwrap();
        let aliases = catalog.alias_map();
        assert_eq!(aliases["Exp"], "XP");
        assert_eq!(aliases["Bits"], "Bits");
        assert_eq!(catalog.data["XP"].loc_string, "STR_XP");
    }
}
