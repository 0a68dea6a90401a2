//! Whole-document schema migration.
//!
//! Migrations run once at load, on the raw JSON value, before the typed
//! decode. Each entry in the table maps one `file_version` to the function
//! that rewrites the document into the next version; loading walks the table
//! until the document reaches [`CURRENT_FILE_VERSION`]. A document already at
//! the current version passes through untouched, so applying migrations is
//! idempotent.

use anyhow::{ensure, Context, Result};
use serde_json::{json, Map, Value};

pub const CURRENT_FILE_VERSION: u64 = 2;

type Migration = fn(&mut Value) -> Result<()>;

/// (source version, migration to the next version).
const MIGRATIONS: &[(u64, Migration)] = &[(1, migrate_v1_to_v2)];

/// Bring `document` up to [`CURRENT_FILE_VERSION`].
///
/// A missing `file_version` is treated as current: only documents that
/// explicitly declare a legacy version are restructured.
pub fn apply_migrations(document: &mut Value) -> Result<()> {
    loop {
        let version = document
            .get("file_version")
            .and_then(Value::as_u64)
            .unwrap_or(CURRENT_FILE_VERSION);
        if version >= CURRENT_FILE_VERSION {
            return Ok(());
        }

        let (_, migration) = MIGRATIONS
            .iter()
            .find(|(from, _)| *from == version)
            .with_context(|| format!("no migration from file_version {version}"))?;
        migration(document)?;

        let after = document
            .get("file_version")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        ensure!(
            after > version,
            "migration from file_version {version} did not advance the version"
        );
    }
}

/// v1 kept entity records in a top-level `ponies` map. v2 nests them under
/// `categories.ponies.items` and renames a handful of per-record fields.
/// Fields the restructure does not touch are carried over verbatim,
/// including keys this version has never heard of.
fn migrate_v1_to_v2(document: &mut Value) -> Result<()> {
    let root = document
        .as_object_mut()
        .context("document root is not a JSON object")?;

    let mut records = match root.remove("ponies") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for record in records.values_mut() {
        migrate_record_v1(record);
    }

    let mut category = Map::new();
    category.insert("name".to_string(), json!({}));
    category.insert("clones".to_string(), json!({}));
    category.insert("items".to_string(), Value::Object(records));

    let mut categories = Map::new();
    categories.insert("ponies".to_string(), Value::Object(category));

    root.insert("categories".to_string(), Value::Object(categories));
    root.insert("file_version".to_string(), json!(2));
    Ok(())
}

fn migrate_record_v1(record: &mut Value) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };

    // `minigames` with prefixed keys became `minigame`.
    if let Some(Value::Object(old)) = fields.remove("minigames") {
        let mut minigame = Map::new();
        minigame.insert(
            "can_play_minecart".to_string(),
            old.get("can_play_minecart").cloned().unwrap_or(json!(true)),
        );
        minigame.insert(
            "cooldown".to_string(),
            old.get("minigame_cooldown").cloned().unwrap_or(json!(0)),
        );
        minigame.insert(
            "skip_cost".to_string(),
            old.get("minigame_skip_cost").cloned().unwrap_or(json!(0)),
        );
        minigame.insert(
            "exp_rank".to_string(),
            old.get("exp_rank").cloned().unwrap_or(json!(0)),
        );
        fields.insert("minigame".to_string(), Value::Object(minigame));
    }

    // The earliest revision stored the wiki slug as a bare string under
    // `wiki`; that slug is now `wiki_path` and `wiki` holds the status map.
    if fields.get("wiki").map_or(false, Value::is_string) {
        if let Some(slug) = fields.remove("wiki") {
            fields.entry("wiki_path").or_insert(slug);
        }
    }
    fields.remove("wiki_exists");

    if let Some(changeling) = fields.get_mut("changeling").and_then(Value::as_object_mut) {
        if let Some(flag) = changeling.remove("IAmAlterSet") {
            // Early documents stored the flag 0/1-coded.
            let flag = match flag.as_i64() {
                Some(code) => Value::Bool(code != 0),
                None => flag,
            };
            changeling.insert("alter_flag".to_string(), flag);
        }
    }
}
