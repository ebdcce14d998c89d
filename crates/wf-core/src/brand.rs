//! Brand-color extraction from free-form design briefs.
//!
//! Scans a description like *"Primary color is blue. Use RED for buttons."*
//! and produces a `name → color string` map. The strings are later resolved
//! by [`crate::color::parse_color`] via `brand:<name>` references.
//!
//! Patterns run in a fixed order, each left to right over the whole text;
//! a later match for the same key overwrites an earlier one.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Brand palette: lowercase role or name → color descriptor.
pub type BrandColors = BTreeMap<String, String>;

/// Color names accepted as values by the sentence-level inference rules.
pub const VALID_COLOR_NAMES: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "black", "white", "gray",
    "grey", "brown", "cyan", "magenta", "teal", "navy", "maroon", "olive", "lime", "aqua",
    "silver", "gold", "indigo", "violet",
];

pub fn is_valid_color_name(name: &str) -> bool {
    VALID_COLOR_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Fixed `(seed, secondary, accent)` inferences for "branding is X".
const COMPLEMENTS: &[(&str, &str, &str)] = &[
    ("blue", "#1E3A8A", "#F59E0B"),
    ("red", "#7F1D1D", "#FBBF24"),
    ("green", "#14532D", "#A855F7"),
    ("purple", "#4C1D95", "#22C55E"),
];

const HEX: &str = r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3,4})\b";
const FUNC: &str = r"(?:rgba?|hsla?)\([^)]*\)";

fn build(pattern: &str) -> Regex {
    let pattern = pattern.replace("{HEX}", HEX).replace("{FUNC}", FUNC);
    Regex::new(&pattern).unwrap()
}

/// `#primary: #3366FF`
static EXPLICIT_DECL: LazyLock<Regex> =
    LazyLock::new(|| build(r"#([A-Za-z][\w-]*)\s*:\s*({HEX}|{FUNC}|[A-Za-z]+)"));

/// `Primary (#3366FF)`
static PAREN_DECL: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b([A-Za-z][\w-]*)\s*\(\s*({HEX}|{FUNC})\s*\)"));

/// `#3366FF, primary`
static HEX_THEN_NAME: LazyLock<Regex> =
    LazyLock::new(|| build(r"({HEX})\s*,\s*([A-Za-z][\w-]*)"));

/// `primary, #3366FF`
static NAME_THEN_HEX: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b([A-Za-z][\w-]*)\s*,\s*({HEX})"));

/// `primary color is blue`
static ROLE_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i)\b(primary|secondary|accent|background|text)\s+colou?rs?\s*(?:is\b|should\s+be\b|will\s+be\b|=|:)\s*({HEX}|{FUNC}|[A-Za-z]+)",
    )
});

/// `use RED for buttons`
static USE_FOR: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i)\buse\s+({HEX}|{FUNC}|[A-Za-z]+)\s+(?:for|on)\s+(?:the\s+|all\s+)?(buttons?|ctas?|call[\s-]to[\s-]actions?|links?|backgrounds?|text|headings?|headers?)\b",
    )
});

/// `branding is blue`, `brand color is #123456`
static BRANDING: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i)\bbrand(?:ing|\s+colou?r)?\s*(?:is\b|should\s+be\b|:)\s*({HEX}|[A-Za-z]+)")
});

/// Scan a description for brand colors. Never fails; empty input → empty map.
pub fn extract_brand_colors(description: &str) -> BrandColors {
    let mut colors = BrandColors::new();
    if description.trim().is_empty() {
        return colors;
    }

    for caps in EXPLICIT_DECL.captures_iter(description) {
        if let Some(value) = accept_value(&caps[2]) {
            colors.insert(caps[1].to_ascii_lowercase(), value);
        }
    }

    for caps in PAREN_DECL.captures_iter(description) {
        colors.insert(caps[1].to_ascii_lowercase(), caps[2].to_string());
    }

    for caps in HEX_THEN_NAME.captures_iter(description) {
        colors.insert(caps[2].to_ascii_lowercase(), caps[1].to_string());
    }
    for caps in NAME_THEN_HEX.captures_iter(description) {
        colors.insert(caps[1].to_ascii_lowercase(), caps[2].to_string());
    }

    for caps in ROLE_SENTENCE.captures_iter(description) {
        if let Some(value) = accept_value(&caps[2]) {
            colors.insert(caps[1].to_ascii_lowercase(), value);
        }
    }

    for caps in USE_FOR.captures_iter(description) {
        if let Some(value) = accept_value(&caps[1]) {
            colors.insert(role_for_target(&caps).to_string(), value);
        }
    }

    for caps in BRANDING.captures_iter(description) {
        let Some(value) = accept_value(&caps[1]) else {
            continue;
        };
        if let Some(&(_, secondary, accent)) = COMPLEMENTS.iter().find(|(seed, ..)| *seed == value) {
            colors.insert("secondary".into(), secondary.into());
            colors.insert("accent".into(), accent.into());
        }
        colors.insert("primary".into(), value);
    }

    log::debug!("extracted {} brand colors", colors.len());
    colors
}

/// Hex and functional values pass as written; bare words must be valid color
/// names and are normalized to lowercase.
fn accept_value(raw: &str) -> Option<String> {
    if raw.starts_with('#') || raw.contains('(') {
        return Some(raw.to_string());
    }
    is_valid_color_name(raw).then(|| raw.to_ascii_lowercase())
}

fn role_for_target(caps: &Captures<'_>) -> &'static str {
    let target = caps[2].to_ascii_lowercase();
    if target.starts_with("button") || target.starts_with("cta") || target.starts_with("call") {
        "accent"
    } else if target.starts_with("link") {
        "secondary"
    } else if target.starts_with("background") {
        "background"
    } else {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(extract_brand_colors("").is_empty());
        assert!(extract_brand_colors("   ").is_empty());
        assert!(extract_brand_colors("A clean dashboard for pets.").is_empty());
    }

    #[test]
    fn sentence_and_button_roles() {
        let colors = extract_brand_colors("Primary color is blue. Use RED for buttons.");
        assert_eq!(colors.get("primary").map(String::as_str), Some("blue"));
        assert_eq!(colors.get("accent").map(String::as_str), Some("red"));
        assert_ne!(colors.get("primary"), colors.get("accent"));
    }

    #[test]
    fn explicit_declarations() {
        let colors = extract_brand_colors("#primary: #3366FF and #surface: white");
        assert_eq!(colors.get("primary").map(String::as_str), Some("#3366FF"));
        assert_eq!(colors.get("surface").map(String::as_str), Some("white"));
    }

    #[test]
    fn parenthesized_declarations() {
        let colors = extract_brand_colors("Palette: Ocean (#0077BE), Sand (rgb(194, 178, 128))");
        assert_eq!(colors.get("ocean").map(String::as_str), Some("#0077BE"));
        assert_eq!(colors.get("sand").map(String::as_str), Some("rgb(194, 178, 128)"));
    }

    #[test]
    fn loose_pairs() {
        let colors = extract_brand_colors("#112233, highlight; shadow, #445566");
        assert_eq!(colors.get("highlight").map(String::as_str), Some("#112233"));
        assert_eq!(colors.get("shadow").map(String::as_str), Some("#445566"));
    }

    #[test]
    fn invalid_names_are_ignored_by_inference() {
        let colors = extract_brand_colors("Primary color is awesome. Use bold for links.");
        assert!(colors.get("primary").is_none());
        assert!(colors.get("secondary").is_none());
    }

    #[test]
    fn branding_seeds_complements_for_known_colors() {
        let colors = extract_brand_colors("Our branding is purple.");
        assert_eq!(colors.get("primary").map(String::as_str), Some("purple"));
        assert_eq!(colors.get("secondary").map(String::as_str), Some("#4C1D95"));
        assert_eq!(colors.get("accent").map(String::as_str), Some("#22C55E"));
    }

    #[test]
    fn branding_with_other_color_leaves_complements_unset() {
        let colors = extract_brand_colors("The branding is teal.");
        assert_eq!(colors.get("primary").map(String::as_str), Some("teal"));
        assert!(colors.get("secondary").is_none());
        assert!(colors.get("accent").is_none());
    }

    #[test]
    fn later_patterns_overwrite_earlier_keys() {
        // Explicit declaration first, then the sentence rule overrides it.
        let colors = extract_brand_colors("#primary: #000000. The primary color is green.");
        assert_eq!(colors.get("primary").map(String::as_str), Some("green"));
    }

    #[test]
    fn use_for_links_and_backgrounds() {
        let colors = extract_brand_colors("Use navy for links and use #FAFAFA for backgrounds.");
        assert_eq!(colors.get("secondary").map(String::as_str), Some("navy"));
        assert_eq!(colors.get("background").map(String::as_str), Some("#FAFAFA"));
    }
}
