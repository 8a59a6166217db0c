use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Settings, AMMO, MATERIALS};
use crate::model::{Ammo, Material, Rarity};
use crate::parser::clean_string;
use crate::parser::recipe::output_quantity;
use crate::raw::{RawAmmo, RawCraft, RawItem, RawMaterial};
use crate::source::ImageLookup;

use super::{build_all, gather, item_recipe, prepare, Built, Keyed, Outcome, Summary};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

impl Keyed for Material {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for Ammo {
    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn process_materials(
    raws: &[RawMaterial],
    images: &ImageLookup,
    settings: &Settings,
    summary: &mut Summary,
) -> Vec<Material> {
    let outcomes = build_all(raws, |raw| build_material(raw, images, settings));
    gather(MATERIALS, outcomes, summary)
}

pub(crate) fn process_ammo(
    raws: &[RawAmmo],
    images: &ImageLookup,
    settings: &Settings,
    summary: &mut Summary,
) -> Vec<Ammo> {
    let outcomes = build_all(raws, |raw| build_ammo(raw, images, settings));
    gather(AMMO, outcomes, summary)
}

fn build_material(raw: &RawMaterial, images: &ImageLookup, settings: &Settings) -> Outcome<Material> {
    let identity = prepare(RawItem::Material(raw), MATERIALS, images, settings)?;
    let (crafting, check) = item_recipe(&identity.name, &raw.crafting);

    let item = Material {
        id: identity.id,
        name: identity.name,
        image: identity.image,
        rarity: raw.rarity.as_deref().map(Rarity::parse).unwrap_or_default(),
        weight: raw.weight.as_deref().and_then(parse_weight),
        stack_size: raw.stack_size.as_deref().and_then(parse_stack_size),
        output_quantity: crafted_quantity(&raw.crafting),
        crafting,
    };
    Ok(Built { item, check })
}

fn build_ammo(raw: &RawAmmo, images: &ImageLookup, settings: &Settings) -> Outcome<Ammo> {
    let identity = prepare(RawItem::Ammo(raw), AMMO, images, settings)?;
    let (crafting, check) = item_recipe(&identity.name, &raw.crafting);

    let item = Ammo {
        id: identity.id,
        name: identity.name,
        image: identity.image,
        weight: raw.weight.as_deref().and_then(parse_weight),
        stack_size: raw.stack_size.as_deref().and_then(parse_stack_size),
        output_quantity: crafted_quantity(&raw.crafting),
        crafting,
    };
    Ok(Built { item, check })
}

/// First number in the cell: "0.15 kg" → 0.15. A decimal comma is accepted.
fn parse_weight(text: &str) -> Option<f64> {
    let text = clean_string(text);
    NUMBER_RE
        .find(&text)
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

/// "x50" and "50" both read as 50.
fn parse_stack_size(text: &str) -> Option<u32> {
    let digits: String = clean_string(text)
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|n| *n >= 1)
}

/// How many units one craft yields: the raw value, else the `<n>x` on the
/// output label, else one.
fn crafted_quantity(craft: &RawCraft) -> u32 {
    craft
        .output_quantity
        .as_deref()
        .and_then(|q| clean_string(q).parse::<u32>().ok())
        .filter(|q| *q >= 1)
        .or_else(|| craft.output.as_deref().and_then(output_quantity))
        .unwrap_or(1)
}
