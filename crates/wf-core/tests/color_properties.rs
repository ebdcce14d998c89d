//! Integration tests: color descriptors and brand extraction through the
//! public API, the way the engine feeds them.

use pretty_assertions::assert_eq;
use wf_core::{Color, ColorInput, extract_brand_colors, parse_color, parse_color_str};

fn close(a: Color, b: Color) -> bool {
    let eps = 1.0 / 255.0 + f32::EPSILON;
    (a.r - b.r).abs() <= eps
        && (a.g - b.g).abs() <= eps
        && (a.b - b.b).abs() <= eps
        && (a.a - b.a).abs() <= eps
}

// ─── Hex forms ──────────────────────────────────────────────────────────

#[test]
fn hex_forms_round_trip_through_rgba_hex() {
    for input in ["#F0A", "#F0A8", "#12AB9F", "#12AB9F80", "#000000", "#ffffff00"] {
        let color = parse_color_str(input, None);
        let again = parse_color_str(&color.to_hex_rgba(), None);
        assert!(close(color, again), "{input} drifted: {color:?} vs {again:?}");
    }
}

#[test]
fn short_hex_duplicates_digits() {
    assert_eq!(parse_color_str("#F0A", None).to_hex(), "#FF00AA");
    assert_eq!(parse_color_str("#F0A8", None).to_hex_rgba(), "#FF00AA88");
}

// ─── Functional forms ───────────────────────────────────────────────────

#[test]
fn rgb_and_rgba_channels() {
    assert!(close(parse_color_str("rgb(255, 0, 0)", None), Color::rgba(1.0, 0.0, 0.0, 1.0)));
    assert!(close(
        parse_color_str("rgba(0,0,0,0.5)", None),
        Color::rgba(0.0, 0.0, 0.0, 0.5)
    ));
}

#[test]
fn hsl_primaries() {
    assert!(close(parse_color_str("hsl(0, 100%, 50%)", None), Color::rgba(1.0, 0.0, 0.0, 1.0)));
    assert!(close(
        parse_color_str("hsl(120, 100%, 50%)", None),
        Color::rgba(0.0, 1.0, 0.0, 1.0)
    ));
    assert!(close(
        parse_color_str("hsla(240, 100%, 50%, 0.25)", None),
        Color::rgba(0.0, 0.0, 1.0, 0.25)
    ));
}

#[test]
fn structured_input_defaults_alpha() {
    let input: ColorInput = serde_json::from_str(r#"{"r": 0.2, "g": 0.4, "b": 0.6}"#).unwrap();
    assert_eq!(parse_color(&input, None), Color::rgba(0.2, 0.4, 0.6, 1.0));
}

#[test]
fn garbage_is_opaque_black() {
    assert_eq!(parse_color_str("not-a-color", None), Color::BLACK);
    assert_eq!(parse_color_str("#GGGGGG", None), Color::BLACK);
    assert_eq!(parse_color_str("", None), Color::BLACK);
}

// ─── Brand colors ───────────────────────────────────────────────────────

#[test]
fn brand_sentences_yield_primary_and_button_role() {
    let brand = extract_brand_colors("Primary color is blue. Use RED for buttons.");
    assert_eq!(brand.get("primary").map(String::as_str), Some("blue"));
    assert_eq!(brand.get("accent").map(String::as_str), Some("red"));
    assert_ne!(brand.get("primary"), brand.get("accent"));
}

#[test]
fn brand_names_resolve_through_the_map() {
    let brand = extract_brand_colors("#primary: #3366FF and the secondary color is teal");
    assert_eq!(parse_color_str("brand:primary", Some(&brand)).to_hex(), "#3366FF");
    assert_eq!(
        parse_color_str("#secondary", Some(&brand)),
        parse_color_str("teal", None)
    );
    assert_eq!(parse_color_str("brand:missing", Some(&brand)), Color::BLACK);
}

#[test]
fn empty_description_is_empty_map() {
    assert!(extract_brand_colors("").is_empty());
    assert!(extract_brand_colors("   ").is_empty());
}
