//! Store, schema, and migration tests.

use super::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn missing_file_is_an_empty_current_document() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("game-data.json")).unwrap();
    assert_eq!(store.document.file_version, CURRENT_FILE_VERSION);
    assert!(store.document.categories.is_empty());
}

#[test]
fn v1_document_migrates_to_v2() {
    let v1 = json!({
        "file_version": 1,
        "ponies": {
            "Pony_Applejack": {
                "locked": true,
                "name": {"english": "Applejack"},
                "minigames": {
                    "can_play_minecart": false,
                    "minigame_cooldown": 90,
                    "minigame_skip_cost": 5,
                    "exp_rank": 2,
                },
                "wiki": "Applejack",
                "wiki_exists": true,
                "changeling": {"is_changeling": true, "id": "Pony_Alter", "IAmAlterSet": 1},
                "fan_notes": "hand-added, must survive",
            }
        }
    });

    let dir = tempdir().unwrap();
    let path = dir.path().join("game-data.json");
    std::fs::write(&path, serde_json::to_string(&v1).unwrap()).unwrap();

    let store = Store::open(&path).unwrap();
    let doc = &store.document;
    assert_eq!(doc.file_version, 2);

    let record = &doc.categories["ponies"].items["Pony_Applejack"];
    assert!(record.locked);
    assert_eq!(record.name["english"], "Applejack");
    assert!(!record.minigame.can_play_minecart);
    assert_eq!(record.minigame.cooldown, 90);
    assert_eq!(record.minigame.skip_cost, 5);
    assert_eq!(record.minigame.exp_rank, 2);
    assert_eq!(record.wiki_path, "Applejack");
    assert!(record.wiki.is_empty());
    // Unknown per-record keys ride through the flattened map.
    assert_eq!(record.extra["fan_notes"], json!("hand-added, must survive"));
    // `wiki_exists` was explicitly dropped by the restructure.
    assert!(!record.extra.contains_key("wiki_exists"));
}

#[test]
fn migration_is_idempotent() {
    let mut value = json!({"file_version": 1, "ponies": {"X": {"name": {}}}});
    migrate::apply_migrations(&mut value).unwrap();
    let once = value.clone();
    migrate::apply_migrations(&mut value).unwrap();
    assert_eq!(value, once);
}

#[test]
fn missing_file_version_is_treated_as_current() {
    let mut value = json!({"categories": {}});
    migrate::apply_migrations(&mut value).unwrap();
    assert!(value.get("ponies").is_none());
    assert_eq!(value["categories"], json!({}));
}

#[test]
fn changeling_wire_round_trip() {
    let plain: Changeling = serde_json::from_value(json!({"is_changeling": false})).unwrap();
    assert_eq!(plain, Changeling::NotChangeling);

    let alter: Changeling = serde_json::from_value(
        json!({"is_changeling": true, "id": "Pony_Thorax", "alter_flag": true}),
    )
    .unwrap();
    assert_eq!(
        alter,
        Changeling::Changeling {
            id: "Pony_Thorax".to_string(),
            alter_flag: true
        }
    );

    let wire = serde_json::to_value(&alter).unwrap();
    assert_eq!(wire["is_changeling"], json!(true));
    assert_eq!(wire["id"], json!("Pony_Thorax"));

    // The migrate branch leaves `{}` behind for records that never had the
    // section; it must decode as "not a changeling".
    let empty: Changeling = serde_json::from_value(json!({})).unwrap();
    assert_eq!(empty, Changeling::NotChangeling);
}

#[test]
fn cost_actual_defaults_to_base() {
    let cost: Cost = serde_json::from_value(json!({
        "base": {"currency": "Gems", "amount": 550}
    }))
    .unwrap();
    assert_eq!(cost.actual, cost.base);

    let overridden: Cost = serde_json::from_value(json!({
        "base": {"currency": "Gems", "amount": 550},
        "actual": {"currency": "Gems", "amount": 250}
    }))
    .unwrap();
    assert_eq!(overridden.actual.amount, 250);
}

#[test]
fn save_preserves_non_ascii_and_unknown_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("json").join("game-data.json");

    let mut store = Store::open(&path).unwrap();
    store.document.game_version = "9.9".to_string();
    store
        .document
        .extra
        .insert("operator_note".to_string(), json!("рулетка"));
    let record = store.document.category_mut("ponies").record_mut("Pony_X");
    record
        .name
        .insert("russian".to_string(), "Эпплджек".to_string());
    store.save().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Эпплджек"), "non-ASCII must stay verbatim");
    assert!(!text.contains("\\u"), "no unicode escaping: {text}");

    let reloaded = Store::open(&path).unwrap();
    assert_eq!(reloaded.document.extra["operator_note"], json!("рулетка"));
    assert_eq!(
        reloaded.document.categories["ponies"].items["Pony_X"].name["russian"],
        "Эпплджек"
    );
}

#[test]
fn load_decodes_windows_1252() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("game-data.json");
    // "Pommé" with an 0xE9 latin-1 byte; invalid as UTF-8.
    let mut bytes = br#"{"file_version": 2, "game_version": "Pomm"#.to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(br#""}"#);
    std::fs::write(&path, &bytes).unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.document.game_version, "Pommé");
}

#[test]
fn session_flushes_on_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("game-data.json");

    let mut store = Store::open(&path).unwrap();
    {
        let mut session = store.session();
        session.document().game_version = "1.2.3".to_string();
        // Dropped without commit, as if an entity failed mid-run.
    }
    assert!(path.exists(), "uncommitted session must still flush");
    let reloaded = Store::open(&path).unwrap();
    assert_eq!(reloaded.document.game_version, "1.2.3");
}

#[test]
fn record_defaults_match_schema() {
    let record = EntityRecord::default();
    assert_eq!(record.location, UNKNOWN_LOCATION);
    assert!(record.minigame.can_play_minecart);
    assert_eq!(record.changeling, Changeling::NotChangeling);
    assert_eq!(record.cost.base, CurrencyAmount::default());
}
