//! Color parsing and normalization.
//!
//! Every textual or structural color descriptor the engine accepts ends up as
//! a [`Color`] with `f32` channels in `[0.0, 1.0]`. Parsing never fails: an
//! unrecognized descriptor logs a warning and yields opaque black.

use crate::brand::BrandColors;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::LazyLock;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut ch = [15u8; 4];
                for (slot, &b) in ch.iter_mut().zip(bytes) {
                    *slot = hex_val(b)?;
                }
                Some(Self::from_u8(ch[0] * 17, ch[1] * 17, ch[2] * 17, ch[3] * 17))
            }
            6 | 8 => {
                let mut ch = [255u8; 4];
                for (slot, pair) in ch.iter_mut().zip(bytes.chunks(2)) {
                    *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::from_u8(ch[0], ch[1], ch[2], ch[3]))
            }
            _ => None,
        }
    }

    fn channels_u8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Emit as shortest valid hex string (`#RRGGBB` when opaque).
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.channels_u8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Emit as `#RRGGBBAA`, always including alpha.
    pub fn to_hex_rgba(&self) -> String {
        let [r, g, b, a] = self.channels_u8();
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

/// A color as it arrives in a command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// Already-structured channels; `a` defaults to 1.
    Rgba {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        a: Option<f32>,
    },
    /// Any textual form: hex, `rgb()`, `hsl()`, a named color, or a brand reference.
    Text(String),
    /// Anything else. Kept so one bad color does not reject the whole payload.
    Other(Value),
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        ColorInput::Text(s.to_string())
    }
}

impl From<Color> for ColorInput {
    fn from(c: Color) -> Self {
        ColorInput::Rgba {
            r: c.r,
            g: c.g,
            b: c.b,
            a: Some(c.a),
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────

/// Normalize any color descriptor. Never fails.
pub fn parse_color(input: &ColorInput, brand: Option<&BrandColors>) -> Color {
    match input {
        ColorInput::Rgba { r, g, b, a } => Color::rgba(*r, *g, *b, a.unwrap_or(1.0)),
        ColorInput::Text(s) => parse_color_str(s, brand),
        ColorInput::Other(raw) => {
            log::warn!("unrecognized color descriptor {raw}, using black");
            Color::BLACK
        }
    }
}

/// Normalize a textual color descriptor. Never fails.
pub fn parse_color_str(input: &str, brand: Option<&BrandColors>) -> Color {
    let mut seen: SmallVec<[String; 4]> = SmallVec::new();
    match resolve_text(input, brand, &mut seen) {
        Some(c) => c,
        None => {
            log::warn!("unrecognized color `{input}`, falling back to black");
            Color::BLACK
        }
    }
}

fn resolve_text(
    input: &str,
    brand: Option<&BrandColors>,
    seen: &mut SmallVec<[String; 4]>,
) -> Option<Color> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    // Brand references: `brand:primary`, or `#primary` when it is not a hex literal.
    if let Some(name) = brand_reference(s)
        && let Some(value) = brand.and_then(|b| b.get(&name))
    {
        if seen.contains(&name) {
            log::warn!("brand color `{name}` refers to itself");
            return None;
        }
        seen.push(name);
        return resolve_text(value, brand, seen);
    }

    if s.starts_with('#')
        && let Some(c) = Color::from_hex(s)
    {
        return Some(c);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, &["rgba", "rgb"]) {
        return parse_rgb_args(args);
    }
    if let Some(args) = function_args(&lower, &["hsla", "hsl"]) {
        return parse_hsl_args(args);
    }

    named_color(&lower)
}

/// Extract the brand name a descriptor refers to, if it looks like a reference.
fn brand_reference(s: &str) -> Option<String> {
    if let Some(name) = s.strip_prefix("brand:") {
        return Some(name.trim().to_ascii_lowercase());
    }
    let name = s.strip_prefix('#')?;
    if Color::from_hex(name).is_some() || name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Returns the text inside `name(...)` for the first matching function name.
fn function_args<'a>(s: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        s.strip_prefix(name)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
    })
}

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)").unwrap());

fn numbers(args: &str) -> SmallVec<[f32; 4]> {
    NUMBER
        .find_iter(args)
        .filter_map(|m| m.as_str().parse::<f32>().ok())
        .collect()
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let n = numbers(args);
    if n.len() < 3 {
        return None;
    }
    let channel = |v: f32| (v / 255.0).clamp(0.0, 1.0);
    let a = n.get(3).copied().unwrap_or(1.0).clamp(0.0, 1.0);
    Some(Color::rgba(channel(n[0]), channel(n[1]), channel(n[2]), a))
}

fn parse_hsl_args(args: &str) -> Option<Color> {
    let n = numbers(args);
    if n.len() < 3 {
        return None;
    }
    let h = n[0].rem_euclid(360.0) / 360.0;
    let s = (n[1] / 100.0).clamp(0.0, 1.0);
    let l = (n[2] / 100.0).clamp(0.0, 1.0);
    let a = n.get(3).copied().unwrap_or(1.0).clamp(0.0, 1.0);
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(Color::rgba(r, g, b, a))
}

/// HSL → RGB, all inputs and outputs in `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

// ─── Named colors ────────────────────────────────────────────────────────

/// Web primaries plus the semantic palette, `(name, r, g, b, a)`.
const NAMED_COLORS: &[(&str, u8, u8, u8, u8)] = &[
    ("black", 0, 0, 0, 255),
    ("white", 255, 255, 255, 255),
    ("red", 255, 0, 0, 255),
    ("green", 0, 128, 0, 255),
    ("blue", 0, 0, 255, 255),
    ("yellow", 255, 255, 0, 255),
    ("orange", 255, 165, 0, 255),
    ("purple", 128, 0, 128, 255),
    ("pink", 255, 192, 203, 255),
    ("gray", 128, 128, 128, 255),
    ("grey", 128, 128, 128, 255),
    ("brown", 165, 42, 42, 255),
    ("cyan", 0, 255, 255, 255),
    ("aqua", 0, 255, 255, 255),
    ("magenta", 255, 0, 255, 255),
    ("teal", 0, 128, 128, 255),
    ("navy", 0, 0, 128, 255),
    ("maroon", 128, 0, 0, 255),
    ("olive", 128, 128, 0, 255),
    ("lime", 0, 255, 0, 255),
    ("silver", 192, 192, 192, 255),
    ("gold", 255, 215, 0, 255),
    ("indigo", 75, 0, 130, 255),
    ("violet", 238, 130, 238, 255),
    ("transparent", 0, 0, 0, 0),
    // Semantic palette
    ("primary", 59, 130, 246, 255),
    ("secondary", 100, 116, 139, 255),
    ("success", 34, 197, 94, 255),
    ("warning", 245, 158, 11, 255),
    ("error", 239, 68, 68, 255),
    ("info", 14, 165, 233, 255),
];

/// Case-insensitive lookup in the fixed named-color table.
pub fn named_color(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(n, ..)| n.eq_ignore_ascii_case(name))
        .map(|&(_, r, g, b, a)| Color::from_u8(r, g, b, a))
}
