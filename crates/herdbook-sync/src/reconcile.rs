//! The record reconciler.
//!
//! One run merges every extracted entity into the store document: per-entity
//! stages are linear with no backtracking (load-or-create, derived-fact
//! recompute, translation and wiki merges, write-back), and the one
//! cross-entity stage — friend-group resolution — runs after the loop as a
//! join barrier. Derived facts (location, tags, changeling, rewards,
//! minigame stats) are recomputed from source truth every run; mutable facts
//! (translations, wiki status, cost) merge into what a previous run or a
//! hand edit left behind.
//!
//! Failures inside one entity are annotated with that entity's id and abort
//! the run; the caller is expected to hold the document in a store session
//! so the partial state still reaches disk.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use herdbook_extract::{Campaign, GameObjects, LocaleSource, ObjectRecord, PrizeCatalog, TextureSource};
use herdbook_store::{
    Changeling, CurrencyAmount, GameDocument, Minigame, Reward, CURRENT_FILE_VERSION,
    UNKNOWN_LOCATION,
};
use indexmap::IndexMap;

use crate::config::ReconcilerConfig;
use crate::groups::GroupTable;
use crate::translate::{merge_translations, TranslationKind};
use crate::wiki::{refresh_pages, wiki_slug, PageProbe};

/// Everything one run reads, behind the narrow source interfaces.
pub struct Sources<'a> {
    pub objects: &'a GameObjects,
    pub locales: &'a [&'a dyn LocaleSource],
    pub campaign: &'a Campaign,
    pub prizes: &'a PrizeCatalog,
    /// `None` disables image extraction entirely.
    pub textures: Option<&'a dyn TextureSource>,
    /// `None` disables live link checks; cached wiki status is kept.
    pub probe: Option<&'a dyn PageProbe>,
}

pub struct RunOptions {
    pub game_version: String,
    pub content_version: String,
    /// Folder that receives `images/...`; also the root the recorded
    /// image paths are relative to.
    pub output_root: PathBuf,
}

pub struct Reconciler<'a> {
    config: &'a ReconcilerConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        document: &mut GameDocument,
        sources: &Sources<'_>,
        options: &RunOptions,
    ) -> Result<()> {
        self.run_at(document, sources, options, chrono::Utc::now().timestamp())
    }

    /// [`run`](Self::run) with an explicit wall clock, so freshness policies
    /// are deterministic under test.
    pub fn run_at(
        &self,
        document: &mut GameDocument,
        sources: &Sources<'_>,
        options: &RunOptions,
        now: i64,
    ) -> Result<()> {
        document.file_version = CURRENT_FILE_VERSION;
        document.game_version = options.game_version.clone();
        document.content_version = options.content_version.clone();

        let category = document.category_mut(&self.config.category);
        merge_translations(
            &self.config.category_name_key,
            sources.locales,
            &mut category.name,
            TranslationKind::CategoryName,
            false,
        );

        // Hidden variants point at their visible pony; those ids are NPCs
        // for this run even if the static list has never heard of them.
        let mut npc_ids = self.config.npc_ids.clone();
        for hidden in sources.objects.objects(&self.config.hidden_source_category) {
            if let Some(parent) = hidden.get_str(&["Parent", "PonyName"]) {
                if !parent.is_empty() && !npc_ids.iter().any(|id| id == parent) {
                    npc_ids.push(parent.to_string());
                }
            }
        }

        self.gather_prizes(document, sources, options)?;

        let daily_goals = sources.campaign.daily_goals();
        let prize_aliases = sources.prizes.alias_map();

        let mut groups = GroupTable::new();
        for (index, object) in sources
            .objects
            .objects(&self.config.source_category)
            .iter()
            .enumerate()
        {
            self.process_entity(
                document,
                sources,
                options,
                object,
                index as u64,
                &npc_ids,
                &daily_goals,
                &prize_aliases,
                &mut groups,
                now,
            )
            .with_context(|| format!("processing {}", object.id()))?;
        }

        let category = document.category_mut(&self.config.category);
        groups.apply(&mut category.items);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn process_entity(
        &self,
        document: &mut GameDocument,
        sources: &Sources<'_>,
        options: &RunOptions,
        object: &ObjectRecord,
        index: u64,
        npc_ids: &[String],
        daily_goals: &IndexMap<String, i64>,
        prize_aliases: &IndexMap<String, String>,
        groups: &mut GroupTable,
        now: i64,
    ) -> Result<()> {
        let id = object.id();
        let record = document.category_mut(&self.config.category).record_mut(id);
        let locked = record.locked;

        record.index = index;

        let name_key = object.get_str(&["Name", "Unlocal"]).unwrap_or_default();
        merge_translations(
            name_key,
            sources.locales,
            &mut record.name,
            TranslationKind::Name,
            locked,
        );
        let description_key = object
            .get_str(&["Description", "Unlocal"])
            .unwrap_or_default();
        merge_translations(
            description_key,
            sources.locales,
            &mut record.description,
            TranslationKind::Description,
            locked,
        );

        // Tags are append-only; a tag once earned is never removed.
        if self.config.unused_ids.iter().any(|unused| unused == id) {
            push_tag(&mut record.tags, "unused");
        }
        if npc_ids.iter().any(|npc| npc == id) {
            push_tag(&mut record.tags, "npc");
        }
        if self.config.quest_ids.iter().any(|quest| quest == id) {
            push_tag(&mut record.tags, "quest");
        }

        // Image slots. The recorded path is unconditional so the document
        // stays navigable on --no-images runs; bytes are only written when a
        // texture source is wired in.
        let portrait_source = object
            .get_str(&["Icon", "Url"])
            .unwrap_or_default()
            .to_string();
        let full_source = strip_extension(object.get_str(&["Shop", "Icon"]).unwrap_or_default());
        for (slot, source_name) in [("portrait", portrait_source), ("full", full_source)] {
            let relative = format!("images/{}/{slot}/{id}.png", self.config.category);
            record
                .image
                .insert(slot.to_string(), format!("/{relative}"));
            if let Some(textures) = sources.textures {
                extract_image(
                    textures,
                    &source_name,
                    &options.output_root.join(&relative),
                    id,
                    slot,
                )?;
            }
        }

        record.location = object
            .get_i64(&["House", "HomeMapZone"])
            .and_then(|zone| self.config.locations.get(&zone).cloned())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        record.house = object
            .get_str(&["House", "Type"])
            .unwrap_or_default()
            .to_string();

        record.changeling = match object.get_str(&["IsChangelingWithSet", "AltPony"]) {
            Some(alter) if !alter.is_empty() => Changeling::Changeling {
                id: alter.to_string(),
                alter_flag: object.get_flag(&["IsChangelingWithSet", "IAmAlterSet"], false),
            },
            _ => Changeling::NotChangeling,
        };

        let friends = object.get_str_list(&["Friends", "Friend"]);
        record.group = if friends.is_empty() {
            Vec::new()
        } else {
            let mut declared = vec![id.to_string()];
            declared.extend(friends.iter().cloned());
            declared
        };
        groups.declare(id, &friends);

        record.max_level = object.get_flag(&["AI", "Max_Level"], false);

        let reward_ids = object.get_str_list(&["StarRewards", "ID"]);
        let reward_amounts = object.get_i64_list(&["StarRewards", "Amount"]);
        if reward_ids.len() != reward_amounts.len() {
            tracing::warn!(
                id = %id,
                ids = reward_ids.len(),
                amounts = reward_amounts.len(),
                "star reward arrays differ in length; pairing the shorter prefix"
            );
        }
        record.rewards = reward_ids
            .iter()
            .zip(&reward_amounts)
            .map(|(item, amount)| {
                Ok(Reward {
                    item: self.resolve_prize(item, prize_aliases)?,
                    amount: *amount,
                })
            })
            .collect::<Result<_>>()?;

        record.minigame = Minigame {
            can_play_minecart: object.get_flag(&["Minigames", "CanPlayMineCart"], true),
            cooldown: object
                .get_i64(&["Minigames", "TimeBetweenPlayActions"])
                .unwrap_or(0),
            skip_cost: object
                .get_i64(&["Minigames", "PlayActionSkipAgainCost"])
                .unwrap_or(0),
            exp_rank: object.get_i64(&["Minigames", "EXP_Rank"]).unwrap_or(0),
        };
        record.arrival_xp = object.get_i64(&["OnArrive", "EarnXP"]).unwrap_or(0);

        if let Some(shop) = sources.objects.shop_entry(id) {
            record.unlock_level = shop.get_i64(&["UnlockValue"]).unwrap_or(0);

            let prior_base = record.cost.base.clone();
            let currency_code = shop.get_i64(&["CurrencyType"]).unwrap_or(0);
            record.cost.base = CurrencyAmount {
                currency: self
                    .config
                    .currencies
                    .get(&currency_code)
                    .cloned()
                    .unwrap_or_default(),
                amount: shop.get_i64(&["Cost"]).unwrap_or(0),
            };
            // `actual` follows base unless a hand edit pinned it elsewhere.
            if record.cost.actual == prior_base || record.cost.actual == CurrencyAmount::default()
            {
                record.cost.actual = record.cost.base.clone();
            }
            record.cost.token.id = shop
                .get_str(&["TaskTokenID"])
                .unwrap_or_default()
                .to_string();
        }
        record.cost.daily_goals = daily_goals.get(id).copied().unwrap_or(0);

        let english_name = record.name.get("english").cloned().unwrap_or_default();
        if record.wiki_path.is_empty() {
            record.wiki_path = wiki_slug(&english_name);
        }
        let slug = record.wiki_path.clone();
        refresh_pages(
            &slug,
            &mut record.wiki,
            &self.config.wiki,
            sources.probe,
            now,
        );

        Ok(())
    }

    /// Rebuild the prize catalog. Display data comes from `PrizeData`, or
    /// from a `QuestSpecialItem` game object when the catalog file lacks the
    /// prize; a prize with neither is unresolvable and fatal.
    fn gather_prizes(
        &self,
        document: &mut GameDocument,
        sources: &Sources<'_>,
        options: &RunOptions,
    ) -> Result<()> {
        for (alias, canonical) in &self.config.prize_types {
            let (loc_key, icon) = match sources.prizes.data.get(alias) {
                Some(data) => (data.loc_string.clone(), data.image.clone()),
                None => match sources.objects.find(alias) {
                    Some(object) if object.category() == "QuestSpecialItem" => (
                        object
                            .get_str(&["QuestSpecialItem", "Name"])
                            .unwrap_or_default()
                            .to_string(),
                        object
                            .get_str(&["QuestSpecialItem", "Icon"])
                            .unwrap_or_default()
                            .to_string(),
                    ),
                    _ => return Err(anyhow!("cannot resolve prize {alias}")),
                },
            };

            let relative = format!("images/items/{canonical}.png");
            let entry = document.items.entry(canonical.clone()).or_default();
            entry.image = format!("/{relative}");
            merge_translations(
                &loc_key,
                sources.locales,
                &mut entry.name,
                TranslationKind::Name,
                false,
            );

            if let Some(textures) = sources.textures {
                extract_image(
                    textures,
                    &strip_extension(&icon),
                    &options.output_root.join(&relative),
                    canonical,
                    "item",
                )?;
            }
        }
        Ok(())
    }

    fn resolve_prize(&self, raw: &str, aliases: &IndexMap<String, String>) -> Result<String> {
        let prize_id = aliases.get(raw).map(String::as_str).unwrap_or(raw);
        self.config
            .prize_types
            .get(prize_id)
            .cloned()
            .ok_or_else(|| anyhow!("unresolvable prize type {raw:?}"))
    }
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}

fn strip_extension(name: &str) -> String {
    Path::new(name).with_extension("").to_string_lossy().into_owned()
}

/// Load, trim, and write one sprite. A missing source is a diagnostic, not
/// an error; a texture that trims to nothing aborts the run.
fn extract_image(
    textures: &dyn TextureSource,
    source_name: &str,
    destination: &Path,
    id: &str,
    slot: &str,
) -> Result<()> {
    if source_name.is_empty() {
        tracing::warn!(id = %id, slot = %slot, "no texture name in object data");
        return Ok(());
    }
    match textures.load(source_name)? {
        Some(decoded) => {
            let trimmed = herdbook_image::trim(&decoded)
                .with_context(|| format!("trimming {source_name}"))?;
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            trimmed
                .save(destination)
                .with_context(|| format!("writing {}", destination.display()))?;
        }
        None => {
            tracing::warn!(id = %id, slot = %slot, name = %source_name, "could not find texture");
        }
    }
    Ok(())
}
