//! Herdbook game-source interfaces.
//!
//! Everything the reconciler consumes from a game install lives behind the
//! loaders and traits in this crate: object definitions, localization
//! tables, textures, the campaign's daily-goals shop, the prize catalog, and
//! the content version. Parsing of the game's proprietary formats happens
//! upstream; these loaders read the decoded JSON siblings and the traits
//! ([`LocaleSource`], [`TextureSource`]) keep proprietary decoders
//! pluggable.

pub mod campaign;
pub mod locale;
pub mod objects;
pub mod prizes;
pub mod textures;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use campaign::Campaign;
pub use locale::{discover_locales, LocTable, LocaleSource};
pub use objects::{GameObjects, ObjectRecord};
pub use prizes::{PrizeCatalog, PrizeData};
pub use textures::{TextureFolder, TextureSource};
pub use version::content_version;

/// Everything loadable from one game folder, bundled for the CLI.
pub struct GameFolder {
    root: PathBuf,
    pub objects: GameObjects,
    pub locales: Vec<LocTable>,
    pub campaign: Campaign,
    pub prizes: PrizeCatalog,
    pub content_version: String,
}

impl GameFolder {
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let content_version = version::content_version(&root)?;
        let objects = GameObjects::load(
            &root.join("gameobjectdata.json"),
            Some(&root.join("shopdata.json")),
        )?;
        let locales = discover_locales(&root)?;

        let campaign_path = root.join("defaultGameCampaign.json");
        let campaign = if campaign_path.exists() {
            Campaign::from_path(&campaign_path)?
        } else {
            tracing::warn!(path = %campaign_path.display(), "no campaign file; daily-goal costs default to 0");
            Campaign::default()
        };

        let prizes_path = root.join("prizetype.json");
        let prizes = if prizes_path.exists() {
            PrizeCatalog::from_path(&prizes_path)?
        } else {
            tracing::warn!(path = %prizes_path.display(), "no prize catalog; prize lookups fall back to game objects");
            PrizeCatalog::default()
        };

        Ok(Self {
            root,
            objects,
            locales,
            campaign,
            prizes,
            content_version,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn textures(&self) -> TextureFolder {
        TextureFolder::new(&self.root)
    }
}
