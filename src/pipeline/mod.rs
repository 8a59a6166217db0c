pub mod equipment;
pub mod materials;
pub mod modifications;
pub mod weapons;

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::Settings;
use crate::error::Result;
use crate::identity::{clean_workshop, is_inventory_only, make_id, unescape_name, validate_recipe, RecipeCheck};
use crate::model::{GameData, MaterialRequirement, Recipe};
use crate::parser::recipe::parse_recipe_cell;
use crate::parser::{clean_opt, clean_string};
use crate::raw::{self, RawAmmo, RawCraft, RawEquipment, RawItem, RawMaterial, RawModification, RawRequirement, RawWeapon};
use crate::source::{ImageLookup, SourceKind, SourceProvider};

/// Raw documents for one run, already split per kind.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub weapons: Vec<RawWeapon>,
    pub equipment: BTreeMap<String, Vec<RawEquipment>>,
    pub modifications: Vec<RawModification>,
    pub materials: Vec<RawMaterial>,
    pub ammo: Vec<RawAmmo>,
}

impl Sources {
    /// Every category is required: modifications reference weapons, so a
    /// run without all of them is aborted before anything is built.
    pub fn load(provider: &dyn SourceProvider) -> Result<Self> {
        let mut docs = BTreeMap::new();
        for kind in SourceKind::ALL {
            docs.insert(kind, provider.load(kind)?);
        }
        let mut take = |kind: SourceKind| docs.remove(&kind).unwrap_or_default();

        let weapons = raw::weapons_from(take(SourceKind::Weapons));
        let equipment = raw::equipment_from(take(SourceKind::Equipment));
        let modifications = raw::modifications_from(take(SourceKind::Modifications));
        let (materials, ammo) = raw::materials_from(take(SourceKind::Materials));

        Ok(Sources {
            weapons,
            equipment,
            modifications,
            materials,
            ammo,
        })
    }
}

/// What a run dropped or repaired, for the closing report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Items emitted per category key.
    pub kept: BTreeMap<String, usize>,
    pub filtered: usize,
    pub inventory_only: usize,
    pub unnamed: usize,
    pub duplicates: usize,
    pub self_referential: usize,
    /// Items kept with a nulled recipe because no materials were parsed.
    pub empty_recipes: usize,
    pub unresolved_weapon_refs: usize,
}

impl Summary {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Unnamed => self.unnamed += 1,
            DropReason::Excluded => self.filtered += 1,
            DropReason::InventoryOnly => self.inventory_only += 1,
        }
    }

    pub fn total_kept(&self) -> usize {
        self.kept.values().sum()
    }
}

pub struct Consolidated {
    pub data: GameData,
    pub summary: Summary,
}

/// Load every source from `provider` and consolidate.
pub fn run(provider: &dyn SourceProvider, settings: &Settings, last_updated: NaiveDate) -> Result<Consolidated> {
    let sources = Sources::load(provider)?;
    let images = provider.images()?;
    Ok(consolidate(&sources, &images, settings, last_updated))
}

/// Build the canonical document. Pure: the same inputs always give the same
/// document.
pub fn consolidate(
    sources: &Sources,
    images: &ImageLookup,
    settings: &Settings,
    last_updated: NaiveDate,
) -> Consolidated {
    let mut summary = Summary::default();

    let weapons = weapons::process(&sources.weapons, images, settings, &mut summary);
    let equipment = equipment::process(&sources.equipment, images, settings, &mut summary);

    let weapon_ids: HashSet<&str> = weapons.iter().map(|w| w.id.as_str()).collect();
    let modifications = modifications::process(&sources.modifications, images, settings, &mut summary);
    summary.unresolved_weapon_refs = modifications::unresolved_refs(&modifications, &weapon_ids);

    let materials = materials::process_materials(&sources.materials, images, settings, &mut summary);
    let ammo = materials::process_ammo(&sources.ammo, images, settings, &mut summary);

    info!(
        kept = summary.total_kept(),
        filtered = summary.filtered,
        inventory_only = summary.inventory_only,
        duplicates = summary.duplicates,
        "consolidation finished"
    );

    Consolidated {
        data: GameData {
            version: settings.version.clone(),
            last_updated: last_updated.format("%Y-%m-%d").to_string(),
            weapons,
            equipment,
            modifications,
            materials,
            ammo,
        },
        summary,
    }
}

// ── Shared per-item steps ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DropReason {
    Unnamed,
    Excluded,
    InventoryOnly,
}

pub(crate) struct Identity {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

pub(crate) struct Built<T> {
    pub item: T,
    pub check: RecipeCheck,
}

pub(crate) type Outcome<T> = std::result::Result<Built<T>, DropReason>;

/// Anything emitted under an id that must be unique in its category.
pub(crate) trait Keyed {
    fn id(&self) -> &str;
}

/// Clean the name, derive the id, apply the category's exclusions and the
/// inventory-only rule, and look up the image.
pub(crate) fn prepare(
    item: RawItem<'_>,
    category: &str,
    images: &ImageLookup,
    settings: &Settings,
) -> std::result::Result<Identity, DropReason> {
    let Some(name) = item.name().map(|n| unescape_name(&n)) else {
        debug!(category, "dropping entry without a name");
        return Err(DropReason::Unnamed);
    };
    let id = make_id(&name);

    if settings.is_excluded(category, &name) {
        debug!(category, %name, "excluded false positive");
        return Err(DropReason::Excluded);
    }
    if settings.drop_inventory_only && is_inventory_only(item.craft().workshop.as_deref()) {
        debug!(category, %name, "inventory-only recipe, dropping item");
        return Err(DropReason::InventoryOnly);
    }

    let image = images.get(category, &id);
    Ok(Identity { id, name, image })
}

/// Materials from the recipe cell when there is one, else from the
/// pre-split list.
pub(crate) fn requirements(cell: Option<&str>, list: &[RawRequirement]) -> Vec<MaterialRequirement> {
    if let Some(cell) = cell.filter(|c| !c.trim().is_empty()) {
        let mut materials = parse_recipe_cell(&cell.replace('\u{a0}', " "));
        for m in &mut materials {
            m.material = unescape_name(&m.material);
        }
        return materials;
    }
    list.iter()
        .filter_map(|r| {
            let material = clean_opt(r.material.as_deref()).map(|m| unescape_name(&m))?;
            let quantity = r
                .quantity
                .as_deref()
                .and_then(|q| clean_string(q).parse::<u32>().ok())
                .filter(|q| *q >= 1);
            match quantity {
                Some(quantity) => Some(MaterialRequirement { material, quantity }),
                None => {
                    debug!(%material, "dropping requirement without a usable quantity");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn build_recipe(craft: &RawCraft) -> Recipe {
    Recipe {
        materials: requirements(craft.recipe.as_deref(), &craft.materials),
        workshop: clean_workshop(craft.workshop.as_deref()),
        output: clean_opt(craft.output.as_deref()),
        blueprint_required: craft.blueprint_required,
    }
}

/// Base recipe for an item, validated against the item's own name.
pub(crate) fn item_recipe(name: &str, craft: &RawCraft) -> (Recipe, RecipeCheck) {
    let mut recipe = build_recipe(craft);
    let check = validate_recipe(name, &mut recipe);
    (recipe, check)
}

#[cfg(feature = "rayon")]
pub(crate) fn build_all<R, T, F>(raws: &[R], build: F) -> Vec<Outcome<T>>
where
    R: Sync,
    T: Send,
    F: Fn(&R) -> Outcome<T> + Sync + Send,
{
    // Indexed collect keeps source order.
    raws.par_iter().map(build).collect()
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn build_all<R, T, F>(raws: &[R], build: F) -> Vec<Outcome<T>>
where
    F: Fn(&R) -> Outcome<T>,
{
    raws.iter().map(build).collect()
}

/// Fold outcomes into the category's output, first id wins.
pub(crate) fn gather<T: Keyed>(category: &str, outcomes: Vec<Outcome<T>>, summary: &mut Summary) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        let built = match outcome {
            Ok(built) => built,
            Err(reason) => {
                summary.record_drop(reason);
                continue;
            }
        };
        if !seen.insert(built.item.id().to_string()) {
            debug!(category, id = built.item.id(), "duplicate id, keeping the first");
            summary.duplicates += 1;
            continue;
        }
        match built.check {
            RecipeCheck::SelfReferential => summary.self_referential += 1,
            RecipeCheck::Empty => summary.empty_recipes += 1,
            RecipeCheck::Valid => {}
        }
        out.push(built.item);
    }

    info!(category, kept = out.len(), "category consolidated");
    summary.kept.insert(category.to_string(), out.len());
    out
}
