use std::sync::LazyLock;

use regex::Regex;

use crate::model::Recipe;
use crate::parser::clean_opt;

static OR_INVENTORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*or\s*inventory\s*$").unwrap());

const INVENTORY: &str = "Inventory";

/// Stable id: "Li'l Smoke Grenade" → "li'l_smoke_grenade".
/// The wiki's `%27` escape is restored to an apostrophe.
pub fn make_id(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace("%27", "'")
}

/// Display names carry the same `%27` escape as the page links.
pub fn unescape_name(name: &str) -> String {
    name.replace("%27", "'")
}

/// "Gunsmith 1orInventory" → "Gunsmith 1". A bare "Inventory" is kept so the
/// caller can tell it apart with [`is_inventory_only`].
pub fn clean_workshop(raw: Option<&str>) -> Option<String> {
    let cleaned = clean_opt(raw)?;
    if cleaned.eq_ignore_ascii_case(INVENTORY) {
        return Some(cleaned);
    }
    clean_opt(Some(&OR_INVENTORY_RE.replace(&cleaned, "")))
}

/// The recipe can only be crafted mid-round from the inventory.
pub fn is_inventory_only(workshop: Option<&str>) -> bool {
    workshop.is_some_and(|w| w.trim().eq_ignore_ascii_case(INVENTORY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCheck {
    Valid,
    /// No materials; the workshop is dropped with them.
    Empty,
    /// The item lists itself as an ingredient.
    SelfReferential,
}

/// Null the recipe when it has no materials or names its own item as one.
/// The item itself is always kept.
pub fn validate_recipe(item_name: &str, recipe: &mut Recipe) -> RecipeCheck {
    if recipe.is_empty() {
        recipe.clear();
        return RecipeCheck::Empty;
    }
    let own = item_name.to_lowercase();
    if recipe
        .materials
        .iter()
        .any(|m| m.material.to_lowercase() == own)
    {
        tracing::debug!(item = item_name, "self-referential recipe nulled");
        recipe.clear();
        return RecipeCheck::SelfReferential;
    }
    RecipeCheck::Valid
}
