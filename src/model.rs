//! Output document shapes. Optional fields serialize as `null` so consumers
//! always see the same keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::slot::SlotType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub material: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub materials: Vec<MaterialRequirement>,
    pub workshop: Option<String>,
    pub output: Option<String>,
    pub blueprint_required: Option<bool>,
}

impl Recipe {
    /// Drops materials and workshop; a recipe with no materials carries no
    /// workshop either.
    pub fn clear(&mut self) {
        self.materials.clear();
        self.workshop = None;
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    #[default]
    Unknown,
}

impl Rarity {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Common" => Rarity::Common,
            "Uncommon" => Rarity::Uncommon,
            "Rare" => Rarity::Rare,
            "Epic" => Rarity::Epic,
            "Legendary" => Rarity::Legendary,
            _ => Rarity::Unknown,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponUpgrade {
    pub tier: Option<u32>,
    pub materials: Vec<MaterialRequirement>,
    pub workshop: Option<String>,
    pub perks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairCost {
    pub materials: Vec<MaterialRequirement>,
    pub durability_restored: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponCrafting {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub upgrades: Vec<WeaponUpgrade>,
    pub repairs: Vec<RepairCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub category: String,
    pub rarity: Rarity,
    pub ammo_type: Option<String>,
    pub modification_slots: Vec<String>,
    pub crafting: WeaponCrafting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub category: String,
    pub rarity: Rarity,
    pub description: Option<String>,
    pub special_effect: Option<String>,
    pub stats: BTreeMap<String, String>,
    pub crafting: Recipe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub slot_type: SlotType,
    pub rarity: Rarity,
    pub effects: Vec<String>,
    pub stat_effects: Vec<String>,
    pub stats: BTreeMap<String, String>,
    pub compatible_weapons: Vec<String>,
    pub crafting: Recipe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub rarity: Rarity,
    pub weight: Option<f64>,
    pub stack_size: Option<u32>,
    pub crafting: Recipe,
    pub output_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammo {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub weight: Option<f64>,
    pub stack_size: Option<u32>,
    pub crafting: Recipe,
    pub output_quantity: u32,
}

/// The consolidated document. Rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub version: String,
    pub last_updated: String,
    pub weapons: Vec<Weapon>,
    pub equipment: BTreeMap<String, Vec<EquipmentItem>>,
    pub modifications: Vec<Modification>,
    pub materials: Vec<Material>,
    pub ammo: Vec<Ammo>,
}
