//! Reconciler configuration.
//!
//! The membership lists and lookup tables the game never ships in data form
//! live here as configuration rather than compiled-in globals, so a test
//! suite (or a different game build) can substitute small fixtures. The
//! defaults reproduce the known tables for the current game.

use std::path::Path;

use anyhow::{Context, Result};
use herdbook_store::text;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::wiki::{WikiConfig, WikiSite};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Key of the store category records are reconciled into.
    #[serde(default = "default_category")]
    pub category: String,
    /// Source object category feeding that store category.
    #[serde(default = "default_source_category")]
    pub source_category: String,
    /// Source category whose `Parent.PonyName` entries are treated as NPCs.
    #[serde(default = "default_hidden_category")]
    pub hidden_source_category: String,
    /// Localization key for the category's display name.
    #[serde(default = "default_category_name_key")]
    pub category_name_key: String,
    #[serde(default)]
    pub npc_ids: Vec<String>,
    #[serde(default)]
    pub quest_ids: Vec<String>,
    #[serde(default)]
    pub unused_ids: Vec<String>,
    /// Zone code → location name; unknown codes fall back to `UNKNOWN`.
    #[serde(default)]
    pub locations: IndexMap<i64, String>,
    /// Currency code → display currency.
    #[serde(default)]
    pub currencies: IndexMap<i64, String>,
    /// Raw/alias prize id → canonical prize id. Rewards referencing ids
    /// outside this table are a fatal error.
    #[serde(default)]
    pub prize_types: IndexMap<String, String>,
    #[serde(default)]
    pub wiki: WikiConfig,
}

fn default_category() -> String {
    "ponies".to_string()
}

fn default_source_category() -> String {
    "Pony".to_string()
}

fn default_hidden_category() -> String {
    "HiddenPony".to_string()
}

fn default_category_name_key() -> String {
    "STR_STORE_PONIES".to_string()
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            source_category: default_source_category(),
            hidden_source_category: default_hidden_category(),
            category_name_key: default_category_name_key(),
            npc_ids: [
                "Pony_Derpy", // derpy box, not playable muffins
                "Pony_Disguised_Spike",
                "Pony_Chest",
                "Pony_Tirek", // not the playable tirek
                "Pony_Tirek_TOTB",
                "Pony_Windigo", // unobtainable
            ]
            .map(String::from)
            .to_vec(),
            quest_ids: [
                "Pony_Quest_Duplicate_Starlight",
                "Pony_Quest_Duplicate_Discord",
                "Pony_Quest_Duplicate_Trixie",
                "Pony_Quest_Duplicate_Thorax",
                "Pony_Quest_Fluttershy_Duplicate",
                "Pony_Quest_Duplicate_Scootaloo",
                "Pony_Quest_Duplicate_Sweetiebelle",
                "Pony_Quest_Duplicate_Apple_Bloom",
                "Pony_Quest_Changeling_Runaway_01",
                "Pony_Quest_Changeling_Runaway_02",
            ]
            .map(String::from)
            .to_vec(),
            unused_ids: [
                "Pony_Twilight_Sneak_Le",
                "Pony_Camo_Dash",
                "Pony_Wingless_Rainbow_Dash",
                "Pony_Crystal_Luna_Hair_Test",
                "Pony_Token_Test",
            ]
            .map(String::from)
            .to_vec(),
            locations: IndexMap::from([
                (0, "PONYVILLE".to_string()),
                (1, "CANTERLOT".to_string()),
                (2, "SWEET_APPLE_ACRES".to_string()),
                (3, "EVERFREE_FOREST".to_string()),
                (4, "CRYSTAL_EMPIRE".to_string()),
                (5, "CRYSTAL_EMPIRE".to_string()),
                (6, "KLUGETOWN".to_string()),
            ]),
            currencies: IndexMap::from([(1, "Bits".to_string()), (2, "Gems".to_string())]),
            prize_types: IndexMap::from(
                [
                    ("XP", "XP"),
                    ("Bits", "Bits"),
                    ("Gems", "Gems"),
                    ("MinecartWheel_StarMastery", "Minecart_Wheel"),
                    ("MinecartWheel", "Minecart_Wheel"),
                    ("LoyaltyShard", "Loyalty_Shard"),
                    ("KindnessShard", "Kindness_Shard"),
                    ("LaughterShard", "Laughter_Shard"),
                    ("GenerosityShard", "Generosity_Shard"),
                    ("HonestyShard", "Honesty_Shard"),
                    ("MagicShard", "Magic_Shard"),
                    ("PopCurrency1", "Pin"),
                    ("PopCurrency2", "Button"),
                    ("PopCurrency3", "Twine"),
                    ("PopCurrency4", "Ribbon"),
                    ("PopCurrency5", "Bow"),
                    ("Token_Lottery", "Lucky_Coin"),
                    ("Token_CE_Lottery", "Crystal_Coin"),
                ]
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string())),
            ),
            wiki: WikiConfig {
                sources: IndexMap::from([
                    (
                        "indie".to_string(),
                        WikiSite {
                            url: "https://mlp-game-wiki.no/index.php/".to_string(),
                            pages: IndexMap::from(
                                [
                                    ("page", "{name}"),
                                    ("2d_image", "File:{name}_2d.png"),
                                    ("portrait", "File:{name}_portrait.png"),
                                ]
                                .map(|(kind, template)| (kind.to_string(), template.to_string())),
                            ),
                        },
                    ),
                    (
                        "fandom".to_string(),
                        WikiSite {
                            url: "https://mlp-gameloft.fandom.com/wiki/".to_string(),
                            pages: IndexMap::from([(
                                "page".to_string(),
                                "{name}".to_string(),
                            )]),
                        },
                    ),
                ]),
            },
        }
    }
}

impl ReconcilerConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = text::read_to_string(path)?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}
