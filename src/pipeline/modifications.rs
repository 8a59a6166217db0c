use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::config::{Settings, MODIFICATIONS};
use crate::identity::{make_id, unescape_name};
use crate::model::{Modification, Rarity};
use crate::parser::clean_opt;
use crate::parser::slot::classify_slot;
use crate::raw::{value_text, RawItem, RawModification};
use crate::source::ImageLookup;

use super::{build_all, gather, item_recipe, prepare, Built, Keyed, Outcome, Summary};

/// Key of the stats entry that holds the exact effect lines.
const EFFECTS_STAT: &str = "effects";

impl Keyed for Modification {
    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn process(
    raws: &[RawModification],
    images: &ImageLookup,
    settings: &Settings,
    summary: &mut Summary,
) -> Vec<Modification> {
    let outcomes = build_all(raws, |raw| build(raw, images, settings));
    gather(MODIFICATIONS, outcomes, summary)
}

fn build(raw: &RawModification, images: &ImageLookup, settings: &Settings) -> Outcome<Modification> {
    let identity = prepare(RawItem::Modification(raw), MODIFICATIONS, images, settings)?;
    let (crafting, check) = item_recipe(&identity.name, &raw.crafting);
    let slot_type = classify_slot(
        &identity.name,
        clean_opt(raw.slot_type.as_deref()).as_deref(),
        &settings.slot_rewrites,
    );
    let (stat_effects, stats) = split_stats(&raw.stats);

    let item = Modification {
        id: identity.id,
        name: identity.name,
        image: identity.image,
        slot_type,
        rarity: raw.rarity.as_deref().map(Rarity::parse).unwrap_or_default(),
        effects: raw.effects.iter().filter_map(|e| clean_opt(Some(e.as_str()))).collect(),
        stat_effects,
        stats,
        compatible_weapons: compatible(&raw.compatible_weapons),
        crafting,
    };
    Ok(Built { item, check })
}

/// The `effects` list comes out as exact effect strings; every other scalar
/// stat is kept as text.
fn split_stats(raw: &BTreeMap<String, Value>) -> (Vec<String>, BTreeMap<String, String>) {
    let mut effects = Vec::new();
    let mut stats = BTreeMap::new();

    for (key, value) in raw {
        let Some(key) = clean_opt(Some(key.as_str())) else {
            continue;
        };
        match value {
            Value::Array(lines) if key == EFFECTS_STAT => {
                effects.extend(lines.iter().filter_map(|l| clean_opt(value_text(l).as_deref())));
            }
            _ => {
                if let Some(text) = clean_opt(value_text(value).as_deref()) {
                    stats.insert(key, text);
                }
            }
        }
    }
    (effects, stats)
}

fn compatible(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter_map(|w| clean_opt(Some(w.as_str())))
        .map(|w| unescape_name(&w))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Compatible-weapon names with no weapon of that id in this run.
pub(crate) fn unresolved_refs(mods: &[Modification], weapon_ids: &HashSet<&str>) -> usize {
    let mut count = 0;
    for m in mods {
        for weapon in &m.compatible_weapons {
            if !weapon_ids.contains(make_id(weapon).as_str()) {
                debug!(modification = %m.name, weapon = %weapon, "compatible weapon not found");
                count += 1;
            }
        }
    }
    count
}
