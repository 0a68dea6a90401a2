//! The persisted document schema.
//!
//! One document holds everything an extraction run knows: a version header,
//! categories of entity records, and the prize catalog. Records are merged
//! into, never replaced, so the schema is deliberately forgiving: every field
//! has a default enumerated here (and nowhere else), and keys this version
//! does not know about ride along through the flattened `extra` maps instead
//! of being dropped. Hand edits survive round-trips.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::migrate::CURRENT_FILE_VERSION;

/// Language code (lower-cased dev id) → localized string.
pub type Translations = IndexMap<String, String>;

/// Wiki source → page kind → cached page status.
pub type WikiStatus = IndexMap<String, IndexMap<String, PageStatus>>;

/// Sentinel for zone codes missing from the location table.
pub const UNKNOWN_LOCATION: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDocument {
    pub file_version: u64,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub content_version: String,
    #[serde(default)]
    pub categories: IndexMap<String, Category>,
    /// Prize catalog: canonical prize id → display info.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub items: IndexMap<String, PrizeInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Default for GameDocument {
    fn default() -> Self {
        Self {
            file_version: CURRENT_FILE_VERSION,
            game_version: String::new(),
            content_version: String::new(),
            categories: IndexMap::new(),
            items: IndexMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl GameDocument {
    /// Category by key, created with defaults on first access.
    pub fn category_mut(&mut self, key: &str) -> &mut Category {
        self.categories.entry(key.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub clones: IndexMap<String, Value>,
    #[serde(default)]
    pub items: IndexMap<String, EntityRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Category {
    /// Record by id, created with defaults the first time the id is seen.
    pub fn record_mut(&mut self, id: &str) -> &mut EntityRecord {
        self.items.entry(id.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrizeInfo {
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub image: String,
}

/// One persisted game entity.
///
/// `locked` guards `name`/`description` against overwrite; everything under
/// "derived facts" (location, changeling, rewards, minigame) is recomputed
/// from source every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub locked: bool,
    /// Iteration position of the last run that saw this record.
    #[serde(default)]
    pub index: u64,
    #[serde(default)]
    pub note: IndexMap<String, Value>,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default)]
    pub alt_name: Translations,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image slot (`portrait`, `full`) → root-relative output path.
    #[serde(default)]
    pub image: IndexMap<String, String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub inns: Vec<Value>,
    #[serde(default)]
    pub changeling: Changeling,
    #[serde(default)]
    pub group: Vec<String>,
    #[serde(default)]
    pub max_level: bool,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub minigame: Minigame,
    #[serde(default)]
    pub arrival_xp: i64,
    #[serde(default)]
    pub unlock_level: i64,
    #[serde(default)]
    pub cost: Cost,
    #[serde(default)]
    pub tasks: IndexMap<String, Value>,
    #[serde(default)]
    pub wiki_path: String,
    #[serde(default)]
    pub wiki: WikiStatus,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_location() -> String {
    UNKNOWN_LOCATION.to_string()
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self {
            locked: false,
            index: 0,
            note: IndexMap::new(),
            name: Translations::new(),
            description: Translations::new(),
            alt_name: Translations::new(),
            tags: Vec::new(),
            image: IndexMap::new(),
            location: default_location(),
            house: String::new(),
            inns: Vec::new(),
            changeling: Changeling::default(),
            group: Vec::new(),
            max_level: false,
            rewards: Vec::new(),
            minigame: Minigame::default(),
            arrival_xp: 0,
            unlock_level: 0,
            cost: Cost::default(),
            tasks: IndexMap::new(),
            wiki_path: String::new(),
            wiki: WikiStatus::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Whether this entity is a changeling disguise of another entity.
///
/// Persisted as `{is_changeling, id, alter_flag}` so hand editors see a flat
/// object, modeled in code as a proper tagged variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChangelingWire", into = "ChangelingWire")]
pub enum Changeling {
    #[default]
    NotChangeling,
    Changeling {
        id: String,
        alter_flag: bool,
    },
}

#[derive(Serialize, Deserialize)]
struct ChangelingWire {
    #[serde(default)]
    is_changeling: bool,
    #[serde(default)]
    id: String,
    #[serde(default)]
    alter_flag: bool,
}

impl From<ChangelingWire> for Changeling {
    fn from(wire: ChangelingWire) -> Self {
        if wire.is_changeling {
            Self::Changeling {
                id: wire.id,
                alter_flag: wire.alter_flag,
            }
        } else {
            Self::NotChangeling
        }
    }
}

impl From<Changeling> for ChangelingWire {
    fn from(value: Changeling) -> Self {
        match value {
            Changeling::NotChangeling => Self {
                is_changeling: false,
                id: String::new(),
                alter_flag: false,
            },
            Changeling::Changeling { id, alter_flag } => Self {
                is_changeling: true,
                id,
                alter_flag,
            },
        }
    }
}

/// One star-reward entry, positionally paired from the source's parallel
/// id/amount arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub amount: i64,
}

/// Shop cost. `actual` is the sale/event price; when a document does not
/// spell one out it follows `base`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CostWire", into = "CostWire")]
pub struct Cost {
    pub base: CurrencyAmount,
    pub actual: CurrencyAmount,
    pub token: TokenCost,
    pub daily_goals: i64,
}

#[derive(Serialize, Deserialize)]
struct CostWire {
    #[serde(default)]
    base: CurrencyAmount,
    #[serde(default)]
    actual: Option<CurrencyAmount>,
    #[serde(default)]
    token: TokenCost,
    #[serde(default)]
    daily_goals: i64,
}

impl From<CostWire> for Cost {
    fn from(wire: CostWire) -> Self {
        let actual = wire.actual.unwrap_or_else(|| wire.base.clone());
        Self {
            base: wire.base,
            actual,
            token: wire.token,
            daily_goals: wire.daily_goals,
        }
    }
}

impl From<Cost> for CostWire {
    fn from(value: Cost) -> Self {
        Self {
            base: value.base,
            actual: Some(value.actual),
            token: value.token,
            daily_goals: value.daily_goals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minigame {
    #[serde(default = "default_true")]
    pub can_play_minecart: bool,
    #[serde(default)]
    pub cooldown: i64,
    #[serde(default)]
    pub skip_cost: i64,
    #[serde(default)]
    pub exp_rank: i64,
}

fn default_true() -> bool {
    true
}

impl Default for Minigame {
    fn default() -> Self {
        Self {
            can_play_minecart: true,
            cooldown: 0,
            skip_cost: 0,
            exp_rank: 0,
        }
    }
}

/// Cached result of an external wiki page check.
///
/// `timestamp` is only ever stamped on a negative outcome; that asymmetry is
/// what rate-limits re-checks of pages known to be missing while leaving
/// redirects eligible for re-verification every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStatus {
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub redirect: bool,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}
