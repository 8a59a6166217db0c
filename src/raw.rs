//! Raw per-category records as the scrapers write them.
//!
//! Every field is optional and lenient: a field of the wrong JSON type falls
//! back to its default instead of failing the whole document.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::parser::clean_opt;

// ── Lenient field helpers ──

fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "malformed field, using default");
        T::default()
    }))
}

/// Sequence whose malformed elements are skipped one by one.
fn lenient_seq<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(elements(value))
}

/// Strings, numbers and booleans all read as text.
fn text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(de)?))
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn elements<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(error = %e, "skipping malformed entry");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(found = %kind_of(&other), "expected a list, using empty");
            Vec::new()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Shared pieces ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequirement {
    #[serde(default, deserialize_with = "text")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub quantity: Option<String>,
}

/// A crafting row: either the unparsed recipe cell or a pre-split list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCraft {
    #[serde(default, deserialize_with = "text")]
    pub recipe: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub materials: Vec<RawRequirement>,
    #[serde(default, deserialize_with = "text")]
    pub workshop: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub output: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blueprint_required: Option<bool>,
    #[serde(default, deserialize_with = "text")]
    pub output_quantity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPerks {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUpgrade {
    #[serde(default, deserialize_with = "text")]
    pub output: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub recipe: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub materials: Vec<RawRequirement>,
    #[serde(default, deserialize_with = "text")]
    pub workshop: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub perks: Option<RawPerks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRepair {
    #[serde(default, deserialize_with = "text")]
    pub recipe: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub materials: Vec<RawRequirement>,
    #[serde(default, deserialize_with = "text")]
    pub durability_restored: Option<String>,
}

// ── Per-kind records ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeapon {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub ammo_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub modification_slots: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_craft: RawCraft,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub upgrades: Vec<RawUpgrade>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub repair: Vec<RawRepair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEquipment {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub special_effect: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_healing: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub stats: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub crafting: RawCraft,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModification {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub slot_type: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub effects: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub stats: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub compatible_weapons: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub crafting: RawCraft,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMaterial {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub stack_size: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub crafting: RawCraft,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAmmo {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub stack_size: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub crafting: RawCraft,
}

/// One raw record of any kind, for the steps every kind shares.
#[derive(Debug, Clone, Copy)]
pub enum RawItem<'a> {
    Weapon(&'a RawWeapon),
    Equipment(&'a RawEquipment),
    Modification(&'a RawModification),
    Material(&'a RawMaterial),
    Ammo(&'a RawAmmo),
}

impl<'a> RawItem<'a> {
    /// Display name. Materials and ammo fall back to their page id
    /// ("Metal_Parts").
    pub fn name(&self) -> Option<String> {
        let (name, id) = match self {
            RawItem::Weapon(w) => (w.name.as_deref(), None),
            RawItem::Equipment(e) => (e.name.as_deref(), None),
            RawItem::Modification(m) => (m.name.as_deref(), None),
            RawItem::Material(m) => (m.name.as_deref(), m.id.as_deref()),
            RawItem::Ammo(a) => (a.name.as_deref(), a.id.as_deref()),
        };
        clean_opt(name).or_else(|| clean_opt(id.map(|i| i.replace('_', " ")).as_deref()))
    }

    /// The row the item itself is crafted from.
    pub fn craft(&self) -> &'a RawCraft {
        match self {
            RawItem::Weapon(w) => &w.base_craft,
            RawItem::Equipment(e) => &e.crafting,
            RawItem::Modification(m) => &m.crafting,
            RawItem::Material(m) => &m.crafting,
            RawItem::Ammo(a) => &a.crafting,
        }
    }
}

// ── Whole documents ──

pub fn weapons_from(doc: Value) -> Vec<RawWeapon> {
    elements(doc)
}

pub fn modifications_from(doc: Value) -> Vec<RawModification> {
    elements(doc)
}

/// `{ "<category>": [ ... ], ... }`
pub fn equipment_from(doc: Value) -> BTreeMap<String, Vec<RawEquipment>> {
    match doc {
        Value::Object(map) => map
            .into_iter()
            .map(|(category, items)| (category, elements(items)))
            .collect(),
        other => {
            warn!(found = %kind_of(&other), "equipment source is not an object");
            BTreeMap::new()
        }
    }
}

/// `{ "materials": [ ... ], "ammo": [ ... ] }`
pub fn materials_from(doc: Value) -> (Vec<RawMaterial>, Vec<RawAmmo>) {
    match doc {
        Value::Object(mut map) => {
            let materials = elements(map.remove("materials").unwrap_or(Value::Null));
            let ammo = elements(map.remove("ammo").unwrap_or(Value::Null));
            (materials, ammo)
        }
        other => {
            warn!(found = %kind_of(&other), "materials source is not an object");
            (Vec::new(), Vec::new())
        }
    }
}
