use std::sync::LazyLock;

use regex::Regex;

/// Marker inserted at perk boundaries before splitting.
const BOUNDARY: char = '\u{1e}';

// Pass (a): a digit glued to the end of a word starts a new perk.
static LETTER_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])(\d)").unwrap());

// Pass (b): a signed number after a word or a space starts a new perk.
static SIGNED_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z\s])([+-]\d)").unwrap());

/// Split a wiki perk cell whose entries were concatenated without
/// separators: "25% Increased Bullet Velocity13% Reduced Reload Time+10 Durability".
///
/// The two passes run in this order on purpose; swapping them changes the
/// result when both shapes occur. Digit runs inside a perk's own wording
/// ("Level2") are split too, which is a known limitation of the heuristic.
pub fn segment_perks(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let boundary = format!("${{1}}{}${{2}}", BOUNDARY);
    let pass_a = LETTER_DIGIT_RE.replace_all(text, boundary.as_str());
    let pass_b = SIGNED_NUMBER_RE.replace_all(&pass_a, boundary.as_str());

    pass_b
        .split(BOUNDARY)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_perks() {
        let perks =
            segment_perks("25% Increased Bullet Velocity13% Reduced Reload Time+10 Durability");
        assert_eq!(
            perks,
            vec![
                "25% Increased Bullet Velocity",
                "13% Reduced Reload Time",
                "+10 Durability",
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(segment_perks("").is_empty());
        assert!(segment_perks("   ").is_empty());
    }

    #[test]
    fn single_perk_untouched() {
        assert_eq!(segment_perks("15% Reduced Recoil"), vec!["15% Reduced Recoil"]);
    }

    #[test]
    fn signed_after_space() {
        assert_eq!(
            segment_perks("Increased Magazine Size +4 -5% Handling"),
            vec!["Increased Magazine Size", "+4", "-5% Handling"]
        );
    }

    #[test]
    fn internal_digits_also_split() {
        // Known limitation: wording with glued digits is cut.
        assert_eq!(
            segment_perks("Grants Level2 Shield"),
            vec!["Grants Level", "2 Shield"]
        );
    }

    #[test]
    fn negative_values() {
        assert_eq!(
            segment_perks("20% Increased Fire Rate-10% Stability"),
            vec!["20% Increased Fire Rate", "-10% Stability"]
        );
    }
}
