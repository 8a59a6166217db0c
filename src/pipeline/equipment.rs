use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Settings;
use crate::model::{EquipmentItem, Rarity};
use crate::parser::clean_opt;
use crate::raw::{value_text, RawEquipment, RawItem};
use crate::source::ImageLookup;

use super::{build_all, gather, item_recipe, prepare, Built, Keyed, Outcome, Summary};

impl Keyed for EquipmentItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A raw item with the category it was scraped from.
type Scraped<'a> = (&'a str, &'a RawEquipment);

pub(crate) fn process(
    raw: &BTreeMap<String, Vec<RawEquipment>>,
    images: &ImageLookup,
    settings: &Settings,
    summary: &mut Summary,
) -> BTreeMap<String, Vec<EquipmentItem>> {
    let mut by_target: BTreeMap<String, Vec<Scraped<'_>>> = BTreeMap::new();
    for (category, items) in raw {
        for item in items {
            let target = target_category(category, item, settings);
            by_target
                .entry(target.to_string())
                .or_default()
                .push((category.as_str(), item));
        }
    }

    let mut out = BTreeMap::new();
    for (target, scraped) in &by_target {
        let outcomes = build_all(scraped, |(source, item)| build(source, target, item, images, settings));
        out.insert(target.clone(), gather(target, outcomes, summary));
    }

    for category in &settings.equipment_categories {
        if !out.contains_key(category) {
            summary.kept.insert(category.clone(), 0);
            out.insert(category.clone(), Vec::new());
        }
    }
    out
}

/// Quick-use items flagged as healing belong to the healing category.
fn target_category<'a>(source: &'a str, item: &RawEquipment, settings: &'a Settings) -> &'a str {
    if item.is_healing && source == settings.quick_use_category {
        &settings.healing_category
    } else {
        source
    }
}

fn build(
    source: &str,
    target: &str,
    raw: &RawEquipment,
    images: &ImageLookup,
    settings: &Settings,
) -> Outcome<EquipmentItem> {
    // Exclusions belong to the page the item was scraped from.
    let mut identity = prepare(RawItem::Equipment(raw), source, images, settings)?;
    if source != target {
        debug!(name = %identity.name, from = source, to = target, "moving equipment item");
        identity.image = images.get(target, &identity.id).or(identity.image);
    }
    let (crafting, check) = item_recipe(&identity.name, &raw.crafting);

    let item = EquipmentItem {
        id: identity.id,
        name: identity.name,
        image: identity.image,
        category: target.to_string(),
        rarity: raw.rarity.as_deref().map(Rarity::parse).unwrap_or_default(),
        description: clean_opt(raw.description.as_deref()),
        special_effect: clean_opt(raw.special_effect.as_deref()),
        stats: raw
            .stats
            .iter()
            .filter_map(|(k, v)| Some((clean_opt(Some(k.as_str()))?, clean_opt(value_text(v).as_deref())?)))
            .collect(),
        crafting,
    };
    Ok(Built { item, check })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> BTreeMap<String, Vec<RawEquipment>> {
        crate::raw::equipment_from(value)
    }

    #[test]
    fn healing_joins_existing_healing_items() {
        let mut summary = Summary::default();
        let out = process(
            &raw(json!({
                "healing": [{"name": "Herbal Bandage"}],
                "quick_use": [
                    {"name": "Bandage", "is_healing": true},
                    {"name": "Zipline"}
                ]
            })),
            &ImageLookup::default(),
            &Settings::default(),
            &mut summary,
        );
        let healing: Vec<_> = out["healing"].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(healing, vec!["Herbal Bandage", "Bandage"]);
        assert_eq!(out["quick_use"].len(), 1);
        assert_eq!(summary.kept["healing"], 2);
    }

    #[test]
    fn healing_flag_outside_quick_use_is_ignored() {
        let mut summary = Summary::default();
        let out = process(
            &raw(json!({"shields": [{"name": "Light Shield", "is_healing": true}]})),
            &ImageLookup::default(),
            &Settings::default(),
            &mut summary,
        );
        assert_eq!(out["shields"][0].category, "shields");
        assert!(out["healing"].is_empty());
    }

    #[test]
    fn stats_as_text() {
        let mut summary = Summary::default();
        let out = process(
            &raw(json!({"shields": [{
                "name": "Light Shield",
                "stats": {"Charge": 40, "Weight": "2.0", "Notes": null, "Mitigation": "40%\u{a0}"}
            }]})),
            &ImageLookup::default(),
            &Settings::default(),
            &mut summary,
        );
        let stats = &out["shields"][0].stats;
        assert_eq!(stats["Charge"], "40");
        assert_eq!(stats["Mitigation"], "40%");
        assert!(!stats.contains_key("Notes"));
    }

    #[test]
    fn stat_keys_cleaned() {
        let mut summary = Summary::default();
        let out = process(
            &raw(json!({"shields": [{
                "name": "Light Shield",
                "stats": {"Charge\u{a0}": 40, "\u{a0}": "junk"}
            }]})),
            &ImageLookup::default(),
            &Settings::default(),
            &mut summary,
        );
        let stats = &out["shields"][0].stats;
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["Charge"]);
        assert_eq!(stats["Charge"], "40");
    }

    #[test]
    fn moved_item_takes_target_image() {
        let mut images = ImageLookup::default();
        images.insert("healing", "bandage", Some("images/healing/bandage.png"));
        let mut summary = Summary::default();
        let out = process(
            &raw(json!({"quick_use": [{"name": "Bandage", "is_healing": true}]})),
            &images,
            &Settings::default(),
            &mut summary,
        );
        assert_eq!(out["healing"][0].image.as_deref(), Some("images/healing/bandage.png"));
    }
}
