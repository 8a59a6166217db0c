use std::sync::LazyLock;

use regex::Regex;

static TRAILING_NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s([IVX]+)$").unwrap());

/// Numerals recognized as tiers. Anything past X is not a tier.
const TIER_NUMERALS: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Tier encoded as a trailing Roman numeral: "Kettle III" → 3.
pub fn extract_tier(label: &str) -> Option<u32> {
    let caps = TRAILING_NUMERAL_RE.captures(label.trim_end())?;
    let numeral = caps.get(1)?.as_str();
    if !TIER_NUMERALS.contains(&numeral) {
        return None;
    }
    Some(roman_value(numeral)).filter(|t| *t > 0)
}

/// Right-to-left evaluation: a symbol smaller than the largest seen so far
/// is subtracted.
fn roman_value(numeral: &str) -> u32 {
    let mut total: i64 = 0;
    let mut max = 0;
    for c in numeral.chars().rev() {
        let v = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            _ => 0,
        };
        if v < max {
            total -= v;
        } else {
            total += v;
            max = v;
        }
    }
    total.max(0) as u32
}
