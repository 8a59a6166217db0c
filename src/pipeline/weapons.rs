use crate::config::{Settings, WEAPONS};
use crate::identity::clean_workshop;
use crate::model::{Rarity, RepairCost, Weapon, WeaponCrafting, WeaponUpgrade};
use crate::parser::perks::segment_perks;
use crate::parser::slot::{rewrite_tag, SlotRewrite};
use crate::parser::tier::extract_tier;
use crate::parser::{clean_opt, clean_string};
use crate::raw::{RawItem, RawPerks, RawRepair, RawUpgrade, RawWeapon};
use crate::source::ImageLookup;

use super::{build_all, gather, item_recipe, prepare, requirements, Built, Keyed, Outcome, Summary};

const UNKNOWN_CATEGORY: &str = "Unknown";

impl Keyed for Weapon {
    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn process(
    raws: &[RawWeapon],
    images: &ImageLookup,
    settings: &Settings,
    summary: &mut Summary,
) -> Vec<Weapon> {
    let outcomes = build_all(raws, |raw| build(raw, images, settings));
    gather(WEAPONS, outcomes, summary)
}

fn build(raw: &RawWeapon, images: &ImageLookup, settings: &Settings) -> Outcome<Weapon> {
    let identity = prepare(RawItem::Weapon(raw), WEAPONS, images, settings)?;
    let (recipe, check) = item_recipe(&identity.name, &raw.base_craft);

    let weapon = Weapon {
        id: identity.id,
        name: identity.name,
        image: identity.image,
        category: clean_opt(raw.category.as_deref()).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        rarity: raw.rarity.as_deref().map(Rarity::parse).unwrap_or_default(),
        ammo_type: clean_opt(raw.ammo_type.as_deref()),
        modification_slots: slots(&raw.modification_slots, &settings.slot_rewrites),
        crafting: WeaponCrafting {
            recipe,
            upgrades: raw.upgrades.iter().map(upgrade).collect(),
            repairs: raw.repair.iter().filter_map(repair).collect(),
        },
    };
    Ok(Built { item: weapon, check })
}

/// Slot labels in the same vocabulary as a modification's `slot_type`.
fn slots(raw: &[String], rewrites: &[SlotRewrite]) -> Vec<String> {
    raw.iter()
        .filter_map(|s| clean_opt(Some(s.as_str())))
        .map(|s| rewrite_tag(&s, rewrites))
        .collect()
}

fn upgrade(raw: &RawUpgrade) -> WeaponUpgrade {
    WeaponUpgrade {
        tier: raw.output.as_deref().and_then(|o| extract_tier(&clean_string(o))),
        materials: requirements(raw.recipe.as_deref(), &raw.materials),
        workshop: clean_workshop(raw.workshop.as_deref()),
        perks: perks(raw.perks.as_ref()),
    }
}

fn perks(raw: Option<&RawPerks>) -> Vec<String> {
    match raw {
        Some(RawPerks::Text(text)) => segment_perks(&clean_string(text)),
        Some(RawPerks::List(list)) => list
            .iter()
            .flat_map(|text| segment_perks(&clean_string(text)))
            .collect(),
        None => Vec::new(),
    }
}

fn repair(raw: &RawRepair) -> Option<RepairCost> {
    let materials = requirements(raw.recipe.as_deref(), &raw.materials);
    if materials.is_empty() {
        return None;
    }
    Some(RepairCost {
        materials,
        durability_restored: clean_opt(raw.durability_restored.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weapon(value: serde_json::Value) -> Weapon {
        let raw: RawWeapon = serde_json::from_value(value).unwrap();
        match build(&raw, &ImageLookup::default(), &Settings::default()) {
            Ok(built) => built.item,
            Err(reason) => panic!("weapon dropped: {:?}", reason),
        }
    }

    #[test]
    fn upgrade_rows() {
        let w = weapon(json!({
            "name": "Anvil",
            "upgrades": [
                {
                    "output": "Anvil\u{a0}II",
                    "recipe": "8x Metal Parts\n1x Anvil",
                    "workshop": "Gunsmith 2",
                    "perks": "15% Reduced Reload Time+5 Durability"
                },
                {"output": "Anvil Mk", "perks": ["10% Faster Equip", "20% Recoil"]}
            ]
        }));
        let upgrades = &w.crafting.upgrades;
        assert_eq!(upgrades[0].tier, Some(2));
        assert_eq!(upgrades[0].materials.len(), 2);
        assert_eq!(upgrades[0].perks, vec!["15% Reduced Reload Time", "+5 Durability"]);
        assert_eq!(upgrades[1].tier, None);
        assert_eq!(upgrades[1].perks, vec!["10% Faster Equip", "20% Recoil"]);
    }

    #[test]
    fn empty_repairs_skipped() {
        let w = weapon(json!({
            "name": "Anvil",
            "repair": [
                {"recipe": "Repair costs vary"},
                {"recipe": "2x Metal Parts", "durability_restored": "50"}
            ]
        }));
        assert_eq!(w.crafting.repairs.len(), 1);
        assert_eq!(w.crafting.repairs[0].durability_restored.as_deref(), Some("50"));
    }

    #[test]
    fn slots_rewritten() {
        let w = weapon(json!({
            "name": "Toro",
            "modification_slots": ["Shotgun Muzzle", "Shotgun Magazine", " ", "Stock"]
        }));
        assert_eq!(w.modification_slots, vec!["Shotgun-Muzzle", "Shotgun-Mag", "Stock"]);
    }

    #[test]
    fn upgrade_consuming_earlier_tier_is_kept() {
        let raw: RawWeapon = serde_json::from_value(json!({
            "name": "Anvil II",
            "base_craft": {"recipe": "1x Anvil\n4x Metal Parts", "workshop": "Gunsmith 2"}
        }))
        .unwrap();
        let built = build(&raw, &ImageLookup::default(), &Settings::default()).ok().unwrap();
        assert_eq!(built.check, crate::identity::RecipeCheck::Valid);
        assert_eq!(built.item.crafting.recipe.materials.len(), 2);
    }
}
