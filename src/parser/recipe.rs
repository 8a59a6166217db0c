use std::sync::LazyLock;

use regex::Regex;

use crate::model::MaterialRequirement;

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) ?[x×] ?(.+)$").unwrap());

/// Parse a recipe table cell ("2x Metal Parts\n3x Wires") into requirements,
/// in source order. Lines that don't look like `<n>x <name>` are decorative
/// and dropped. Zero or overflowing quantities are dropped too.
pub fn parse_recipe_cell(text: &str) -> Vec<MaterialRequirement> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<MaterialRequirement> {
    let caps = LINE_RE.captures(line)?;
    let quantity = caps[1].parse::<u32>().ok().filter(|q| *q >= 1)?;
    let material = caps[2].trim();
    if material.is_empty() {
        return None;
    }
    Some(MaterialRequirement {
        material: material.to_string(),
        quantity,
    })
}

/// Leading `<n>x` on a recipe output label ("5x Light Ammo"), if any.
pub fn output_quantity(label: &str) -> Option<u32> {
    static QTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)[x×]").unwrap());
    QTY_RE
        .captures(label)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|q| *q >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(material: &str, quantity: u32) -> MaterialRequirement {
        MaterialRequirement {
            material: material.to_string(),
            quantity,
        }
    }

    #[test]
    fn two_lines_in_order() {
        let parsed = parse_recipe_cell("2x Metal Parts\n3x Wires");
        assert_eq!(parsed, vec![req("Metal Parts", 2), req("Wires", 3)]);
    }

    #[test]
    fn multiplication_sign_and_spacing() {
        let parsed = parse_recipe_cell("  4 × Rubber Parts \n\n1xKettle I");
        assert_eq!(parsed, vec![req("Rubber Parts", 4), req("Kettle I", 1)]);
    }

    #[test]
    fn decorative_lines_dropped() {
        let parsed = parse_recipe_cell("Recipe\n6x Plastic Parts\nBlueprint required");
        assert_eq!(parsed, vec![req("Plastic Parts", 6)]);
    }

    #[test]
    fn empty_and_garbage() {
        assert!(parse_recipe_cell("").is_empty());
        assert!(parse_recipe_cell("\n  \n").is_empty());
        assert!(parse_recipe_cell("x Wires\nWires x2").is_empty());
    }

    #[test]
    fn zero_and_overflow_rejected() {
        assert!(parse_recipe_cell("0x Foo").is_empty());
        assert!(parse_recipe_cell("99999999999x Foo").is_empty());
    }

    #[test]
    fn output_label_quantity() {
        assert_eq!(output_quantity("25x Light Ammo"), Some(25));
        assert_eq!(output_quantity("Light Ammo"), None);
        assert_eq!(output_quantity("3×Rope"), Some(3));
    }
}
