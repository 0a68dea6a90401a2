//! Decoded game-object definitions.
//!
//! The game's proprietary `gameobjectdata.xml`/`shopdata.xml` are decoded
//! upstream into plain JSON (`gameobjectdata.json`, `shopdata.json`). This
//! module is the narrow interface over those dumps: ordered categories of
//! [`ObjectRecord`]s with nested-path field lookup, mirroring how the game
//! nests parameters under section names.

use std::path::Path;

use anyhow::{Context, Result};
use herdbook_store::text;
use indexmap::IndexMap;
use serde_json::Value;

/// One decoded game object: stable id, owning category, nested fields.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    id: String,
    category: String,
    fields: Value,
}

impl ObjectRecord {
    pub fn new(id: impl Into<String>, category: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            fields,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Nested field lookup. `None` as soon as any path segment is missing.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.fields;
        for segment in path {
            current = current.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Integer field; decoded dumps sometimes keep numbers as strings, so
    /// numeric strings parse too.
    pub fn get_i64(&self, path: &[&str]) -> Option<i64> {
        match self.get(path)? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// 0/1-coded flag with a default for missing fields.
    pub fn get_flag(&self, path: &[&str], default: bool) -> bool {
        match self.get_i64(path) {
            Some(value) => value == 1,
            None => default,
        }
    }

    /// String sequence; a scalar is a one-element list, empty entries drop.
    pub fn get_str_list(&self, path: &[&str]) -> Vec<String> {
        match self.get(path) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(String::from)
                .collect(),
            Some(Value::String(value)) if !value.is_empty() => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    /// Integer sequence with the same scalar-or-list coercion.
    pub fn get_i64_list(&self, path: &[&str]) -> Vec<i64> {
        let coerce = |value: &Value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        };
        match self.get(path) {
            Some(Value::Array(values)) => values.iter().filter_map(coerce).collect(),
            Some(value) => coerce(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// All decoded object definitions plus the shop table.
#[derive(Debug, Clone, Default)]
pub struct GameObjects {
    categories: IndexMap<String, Vec<ObjectRecord>>,
    shop: IndexMap<String, ObjectRecord>,
}

impl GameObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `gameobjectdata.json` and, when present, `shopdata.json`.
    pub fn load(objects_path: &Path, shop_path: Option<&Path>) -> Result<Self> {
        let mut game_objects = Self::new();

        let raw = text::read_to_string(objects_path)?;
        let decoded: IndexMap<String, IndexMap<String, Value>> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", objects_path.display()))?;
        for (category, objects) in decoded {
            for (id, fields) in objects {
                game_objects.push(ObjectRecord::new(id, category.clone(), fields));
            }
        }

        if let Some(shop_path) = shop_path.filter(|path| path.exists()) {
            let raw = text::read_to_string(shop_path)?;
            let decoded: IndexMap<String, Value> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", shop_path.display()))?;
            for (id, fields) in decoded {
                game_objects.set_shop_entry(ObjectRecord::new(id, "Shop", fields));
            }
        }

        Ok(game_objects)
    }

    pub fn push(&mut self, record: ObjectRecord) {
        self.categories
            .entry(record.category().to_string())
            .or_default()
            .push(record);
    }

    pub fn set_shop_entry(&mut self, record: ObjectRecord) {
        self.shop.insert(record.id().to_string(), record);
    }

    /// Objects of a category in extraction order; empty for unknown names.
    pub fn objects(&self, category: &str) -> &[ObjectRecord] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn shop_entry(&self, id: &str) -> Option<&ObjectRecord> {
        self.shop.get(id)
    }

    /// Object with `id` in any category.
    pub fn find(&self, id: &str) -> Option<&ObjectRecord> {
        self.categories
            .values()
            .flatten()
            .find(|record| record.id() == id)
    }
}
