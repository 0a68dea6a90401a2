//! Campaign data: the daily-goals item shop.

use std::path::Path;

use anyhow::{Context, Result};
use herdbook_store::text;
use indexmap::IndexMap;
use serde::Deserialize;

/// Typed view over `defaultGameCampaign.json`, limited to the parts the
/// reconciler consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    mini_games: MiniGames,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MiniGames {
    #[serde(default)]
    dailygoals: DailyGoals,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DailyGoals {
    #[serde(default)]
    itemshop: Vec<ShopItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShopItem {
    item_id: String,
    #[serde(default)]
    cost: i64,
}

impl Campaign {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = text::read_to_string(path)?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Item id → daily-goals shop cost.
    pub fn daily_goals(&self) -> IndexMap<String, i64> {
        self.mini_games
            .dailygoals
            .itemshop
            .iter()
            .map(|item| (item.item_id.clone(), item.cost))
            .collect()
    }
}
