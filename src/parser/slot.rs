use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    Muzzle,
    Underbarrel,
    Magazine,
    #[serde(rename = "Light-Mag")]
    LightMag,
    #[serde(rename = "Medium-Mag")]
    MediumMag,
    #[serde(rename = "Shotgun-Mag")]
    ShotgunMag,
    #[serde(rename = "Shotgun-Muzzle")]
    ShotgunMuzzle,
    Stock,
    #[serde(rename = "Tech-Mod")]
    TechMod,
    Unknown,
}

impl SlotType {
    pub const ALL: [SlotType; 10] = [
        SlotType::Muzzle,
        SlotType::Underbarrel,
        SlotType::Magazine,
        SlotType::LightMag,
        SlotType::MediumMag,
        SlotType::ShotgunMag,
        SlotType::ShotgunMuzzle,
        SlotType::Stock,
        SlotType::TechMod,
        SlotType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Muzzle => "Muzzle",
            SlotType::Underbarrel => "Underbarrel",
            SlotType::Magazine => "Magazine",
            SlotType::LightMag => "Light-Mag",
            SlotType::MediumMag => "Medium-Mag",
            SlotType::ShotgunMag => "Shotgun-Mag",
            SlotType::ShotgunMuzzle => "Shotgun-Muzzle",
            SlotType::Stock => "Stock",
            SlotType::TechMod => "Tech-Mod",
            SlotType::Unknown => "Unknown",
        }
    }

    /// Parse a canonical name ("Light-Mag", "Stock", ...).
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the wiki's wording of a slot ("Light Magazine") to a slot type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRewrite {
    pub tag: String,
    pub slot: SlotType,
}

impl SlotRewrite {
    pub fn new(tag: &str, slot: SlotType) -> Self {
        SlotRewrite {
            tag: tag.to_string(),
            slot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Slot(SlotType),
    /// Magazine family; the size comes from [`MAGAZINE_VARIANTS`].
    Magazine,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotRule {
    pub any_of: &'static [&'static str],
    pub outcome: Outcome,
}

/// Keyword inference, first match wins. Muzzle words are checked before
/// grip/mag/stock so compound names don't cross-match.
pub const SLOT_RULES: &[SlotRule] = &[
    SlotRule {
        any_of: &["compensator", "muzzle", "silencer", "choke", "barrel"],
        outcome: Outcome::Slot(SlotType::Muzzle),
    },
    SlotRule {
        any_of: &["grip"],
        outcome: Outcome::Slot(SlotType::Underbarrel),
    },
    SlotRule {
        any_of: &["mag"],
        outcome: Outcome::Magazine,
    },
    SlotRule {
        any_of: &["stock"],
        outcome: Outcome::Slot(SlotType::Stock),
    },
    SlotRule {
        any_of: &["splitter", "kinetic"],
        outcome: Outcome::Slot(SlotType::TechMod),
    },
];

pub const MAGAZINE_VARIANTS: &[(&str, SlotType)] = &[
    ("light", SlotType::LightMag),
    ("medium", SlotType::MediumMag),
    ("shotgun", SlotType::ShotgunMag),
];

/// Resolve a modification's slot: explicit tag first (through the rewrite
/// table), otherwise keyword inference over the display name.
pub fn classify_slot(name: &str, tag: Option<&str>, rewrites: &[SlotRewrite]) -> SlotType {
    if let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) {
        let rewritten = rewrite_tag(tag, rewrites);
        if let Some(slot) = SlotType::from_canonical(&rewritten) {
            return slot;
        }
        tracing::debug!(tag, name, "slot tag not recognized, inferring from name");
    }
    infer_slot(name)
}

/// Rewrite a slot label through the table; unknown labels pass through.
pub fn rewrite_tag(tag: &str, rewrites: &[SlotRewrite]) -> String {
    rewrites
        .iter()
        .find(|r| r.tag == tag)
        .map(|r| r.slot.as_str().to_string())
        .unwrap_or_else(|| tag.to_string())
}

pub fn infer_slot(name: &str) -> SlotType {
    let lower = name.to_lowercase();
    let rule = SLOT_RULES
        .iter()
        .find(|rule| rule.any_of.iter().any(|kw| lower.contains(kw)));

    match rule.map(|r| r.outcome) {
        Some(Outcome::Slot(slot)) => slot,
        Some(Outcome::Magazine) => MAGAZINE_VARIANTS
            .iter()
            .find(|(kw, _)| lower.contains(kw))
            .map(|(_, slot)| *slot)
            .unwrap_or(SlotType::Magazine),
        None => SlotType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn rewrites() -> Vec<SlotRewrite> {
        Settings::default().slot_rewrites
    }

    #[test]
    fn light_extended_mag() {
        assert_eq!(classify_slot("Light Extended Mag", None, &rewrites()), SlotType::LightMag);
    }

    #[test]
    fn tag_wins_over_name() {
        assert_eq!(
            classify_slot("Anything At All", Some("Shotgun Magazine"), &rewrites()),
            SlotType::ShotgunMag
        );
        assert_eq!(
            classify_slot("Angled Grip II", Some("Tech Mod"), &rewrites()),
            SlotType::TechMod
        );
    }

    #[test]
    fn canonical_tag_passes_through() {
        assert_eq!(classify_slot("Foo", Some("Stock"), &rewrites()), SlotType::Stock);
        assert_eq!(classify_slot("Foo", Some("Light-Mag"), &rewrites()), SlotType::LightMag);
    }

    #[test]
    fn unrecognized_tag_falls_back_to_name() {
        assert_eq!(
            classify_slot("Vertical Grip I", Some("Something Else"), &rewrites()),
            SlotType::Underbarrel
        );
        assert_eq!(classify_slot("Silencer II", Some("  "), &rewrites()), SlotType::Muzzle);
    }

    #[test]
    fn rule_order() {
        // "barrel" is a muzzle word and is tested before "grip"/"mag".
        assert_eq!(infer_slot("Extended Barrel Grip"), SlotType::Muzzle);
        assert_eq!(infer_slot("Shotgun Choke"), SlotType::Muzzle);
        assert_eq!(infer_slot("Magazine Grip"), SlotType::Underbarrel);
        assert_eq!(infer_slot("Stock Mag"), SlotType::Magazine);
    }

    #[test]
    fn magazine_variants() {
        assert_eq!(infer_slot("Extended Medium Mag II"), SlotType::MediumMag);
        assert_eq!(infer_slot("Extended Shotgun Mag"), SlotType::ShotgunMag);
        assert_eq!(infer_slot("Extended Mag"), SlotType::Magazine);
    }

    #[test]
    fn others() {
        assert_eq!(infer_slot("Lightweight Stock"), SlotType::Stock);
        assert_eq!(infer_slot("Anvil Splitter"), SlotType::TechMod);
        assert_eq!(infer_slot("KINETIC Converter"), SlotType::TechMod);
        assert_eq!(infer_slot("Mystery Part"), SlotType::Unknown);
    }

    #[test]
    fn rewrite_table_for_weapon_slots() {
        assert_eq!(rewrite_tag("Light Magazine", &rewrites()), "Light-Mag");
        assert_eq!(rewrite_tag("Muzzle", &rewrites()), "Muzzle");
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&SlotType::ShotgunMuzzle).unwrap();
        assert_eq!(json, "\"Shotgun-Muzzle\"");
        for slot in SlotType::ALL {
            assert_eq!(SlotType::from_canonical(slot.as_str()), Some(slot));
        }
    }
}
