//! Run settings: the exclusion lists and rewrite tables the heuristics
//! consult, set once by the caller and passed into [`crate::pipeline::consolidate`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::slot::{SlotRewrite, SlotType};

pub const WEAPONS: &str = "weapons";
pub const MODIFICATIONS: &str = "modifications";
pub const MATERIALS: &str = "materials";
pub const AMMO: &str = "ammo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Document version written to the output.
    pub version: String,
    /// Date stamped on the document. The binary fills in today when unset.
    pub last_updated: Option<NaiveDate>,
    /// Equipment categories, always emitted even when empty.
    pub equipment_categories: Vec<String>,
    /// Quick-use items flagged as healing move to this category.
    pub healing_category: String,
    pub quick_use_category: String,
    /// Category key → display names dropped on sight.
    pub exclusions: BTreeMap<String, Vec<String>>,
    pub slot_rewrites: Vec<SlotRewrite>,
    /// Drop items whose only workshop is the in-round "Inventory".
    pub drop_inventory_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let equipment_categories: Vec<String> =
            ["augments", "shields", "healing", "quick_use", "grenades", "traps"]
                .iter()
                .map(|s| s.to_string())
                .collect();

        Settings {
            version: "1.0.0".to_string(),
            last_updated: None,
            exclusions: default_exclusions(&equipment_categories),
            equipment_categories,
            healing_category: "healing".to_string(),
            quick_use_category: "quick_use".to_string(),
            slot_rewrites: vec![
                SlotRewrite::new("Shotgun Muzzle", SlotType::ShotgunMuzzle),
                SlotRewrite::new("Shotgun Magazine", SlotType::ShotgunMag),
                SlotRewrite::new("Light Magazine", SlotType::LightMag),
                SlotRewrite::new("Medium Magazine", SlotType::MediumMag),
                SlotRewrite::new("Tech Mod", SlotType::TechMod),
            ],
            drop_inventory_only: true,
        }
    }
}

fn default_exclusions(equipment: &[String]) -> BTreeMap<String, Vec<String>> {
    // Navigation pages linked from every category page.
    const NAVIGATION: &[&str] = &[
        "Equipment", "Augments", "Shields", "Healing", "Quick Use", "Grenades", "Traps",
        "Weapons", "Skills", "Raider", "ARC",
    ];
    // Augment sub-features that show up as links on the other pages.
    const AUGMENT_FEATURES: &[&str] = &[
        "Tactical Mk. 3 (Defensive)",
        "Tactical Mk. 3 (Healing)",
        "Combat Mk. 3 (Aggressive)",
        "Combat Mk. 3 (Flanking)",
        "Looting Mk. 3 (Cautious)",
        "Looting Mk. 3 (Survivor)",
        "Integrated Binoculars",
        "Integrated Shield Recharger",
    ];
    // Ingredients linked from consumable recipes.
    const CONSUMABLE_INGREDIENTS: &[&str] =
        &["ARC Powercell", "Crude Explosives", "Synthesized Fuel", "Fabric"];
    const MOD_MATERIALS: &[&str] = &[
        "Metal Parts",
        "Plastic Parts",
        "Rubber Parts",
        "Wires",
        "Duct Tape",
        "Mechanical Components",
        "Steel Spring",
        "Mod Components",
        "Weapon Modifications",
    ];

    let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut out = BTreeMap::new();

    for category in equipment {
        let mut names = owned(NAVIGATION);
        if category != "augments" {
            names.extend(owned(AUGMENT_FEATURES));
        }
        if category == "quick_use" || category == "grenades" {
            names.extend(owned(CONSUMABLE_INGREDIENTS));
        }
        out.insert(category.clone(), names);
    }
    out.insert(WEAPONS.to_string(), owned(&["Weapons", "Equipment"]));
    out.insert(MODIFICATIONS.to_string(), owned(MOD_MATERIALS));
    out
}

impl Settings {
    /// Defaults, then an optional TOML file, then `ARC_*` environment
    /// variables (`__` separates nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("ARC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn is_excluded(&self, category: &str, name: &str) -> bool {
        self.exclusions
            .get(category)
            .is_some_and(|names| names.iter().any(|n| n == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_known_false_positives() {
        let s = Settings::default();
        assert!(s.is_excluded("shields", "Integrated Shield Recharger"));
        assert!(!s.is_excluded("augments", "Integrated Shield Recharger"));
        assert!(s.is_excluded("grenades", "Crude Explosives"));
        assert!(!s.is_excluded("traps", "Crude Explosives"));
        assert!(s.is_excluded("modifications", "Steel Spring"));
        assert!(!s.is_excluded("materials", "Steel Spring"));
    }

    #[test]
    fn exact_match_only() {
        let s = Settings::default();
        assert!(!s.is_excluded("shields", "integrated shield recharger"));
        assert!(!s.is_excluded("shields", "Integrated Shield Recharger II"));
    }

    #[test]
    fn load_without_file_is_default() {
        let loaded = Settings::load(None).unwrap();
        assert_eq!(loaded.version, Settings::default().version);
        assert_eq!(loaded.slot_rewrites, Settings::default().slot_rewrites);
        assert!(loaded.drop_inventory_only);
    }

    #[test]
    fn load_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arc.toml");
        std::fs::write(
            &path,
            "version = \"2.1.0\"\nlast_updated = \"2025-12-02\"\ndrop_inventory_only = false\n",
        )
        .unwrap();
        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.version, "2.1.0");
        assert_eq!(loaded.last_updated, NaiveDate::from_ymd_opt(2025, 12, 2));
        assert!(!loaded.drop_inventory_only);
        assert_eq!(loaded.equipment_categories.len(), 6);
    }
}
