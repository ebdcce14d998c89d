//! Style options and the style application pipeline.
//!
//! [`StyleOptions`] is the typed form of the style bag a caller sends.
//! [`apply_styles`] writes it onto one host node, touching only the
//! properties the node's capabilities allow. Anything it cannot apply is
//! logged and skipped; partial application is the normal outcome.

use crate::config::EngineConfig;
use crate::defaults::first_of;
use crate::error::{CommandError, CommandResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use wf_core::color::{ColorInput, parse_color};
use wf_core::model::*;
use wf_core::{BrandColors, Host, NodeRef};

// ─── Option types ────────────────────────────────────────────────────────

/// `cornerRadius`: one number, or per-corner values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RadiusInput {
    Uniform(f32),
    #[serde(rename_all = "camelCase")]
    Corners {
        top_left: Option<f32>,
        top_right: Option<f32>,
        bottom_right: Option<f32>,
        bottom_left: Option<f32>,
    },
}

/// `padding`: one number, or per-side values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaddingInput {
    Uniform(f32),
    Sides {
        top: Option<f32>,
        right: Option<f32>,
        bottom: Option<f32>,
        left: Option<f32>,
    },
}

/// `shadow`/`innerShadow`: `true` for the default shadow, or a spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShadowInput {
    Enabled(bool),
    Spec(ShadowSpec),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowSpec {
    pub color: Option<ColorInput>,
    #[serde(alias = "x")]
    pub offset_x: Option<f32>,
    #[serde(alias = "y")]
    pub offset_y: Option<f32>,
    #[serde(alias = "radius")]
    pub blur: Option<f32>,
    pub spread: Option<f32>,
}

/// `fontWeight`: numeric (`600`) or a name (`"bold"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(u16),
    Named(String),
}

impl FontWeight {
    /// Host style name for this weight.
    pub fn style(&self) -> &'static str {
        match self {
            FontWeight::Numeric(w) => font_style_for_weight(*w),
            FontWeight::Named(name) => {
                let name = name.to_ascii_lowercase().replace(['-', '_', ' '], "");
                if let Ok(w) = name.parse::<u16>() {
                    return font_style_for_weight(w);
                }
                match name.as_str() {
                    "thin" | "extralight" | "light" => "Light",
                    "medium" => "Medium",
                    "semibold" | "demibold" => "SemiBold",
                    "bold" => "Bold",
                    "extrabold" | "ultrabold" => "ExtraBold",
                    "black" | "heavy" => "Black",
                    _ => "Regular",
                }
            }
        }
    }
}

/// Field decoder for style keys: a value of the wrong shape is logged and
/// treated as absent instead of rejecting the whole payload.
pub(crate) fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(de)?;
    if raw.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            log::warn!("ignoring style value {raw}: {err}");
            Ok(None)
        }
    }
}

/// Every style key the engine recognizes. Unknown keys land in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
    // geometry
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub rotation: Option<f32>,

    // paint
    #[serde(deserialize_with = "lenient")]
    pub fill: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    pub background_color: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    pub color: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    pub stroke: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    pub border_color: Option<ColorInput>,
    #[serde(deserialize_with = "lenient")]
    pub stroke_weight: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub stroke_width: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub border_width: Option<f32>,
    #[serde(alias = "borderRadius", deserialize_with = "lenient")]
    pub corner_radius: Option<RadiusInput>,

    // effects
    #[serde(deserialize_with = "lenient")]
    pub shadow: Option<ShadowInput>,
    #[serde(deserialize_with = "lenient")]
    pub inner_shadow: Option<ShadowInput>,
    #[serde(deserialize_with = "lenient")]
    pub blur: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub background_blur: Option<f32>,

    #[serde(deserialize_with = "lenient")]
    pub opacity: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub visible: Option<bool>,

    // container layout
    #[serde(deserialize_with = "lenient")]
    pub layout_mode: Option<String>,
    #[serde(alias = "justifyContent", deserialize_with = "lenient")]
    pub primary_axis_align_items: Option<String>,
    #[serde(alias = "alignItems", deserialize_with = "lenient")]
    pub counter_axis_align_items: Option<String>,
    #[serde(alias = "gap", deserialize_with = "lenient")]
    pub item_spacing: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub padding: Option<PaddingInput>,
    #[serde(deserialize_with = "lenient")]
    pub padding_top: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub padding_right: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub padding_bottom: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub padding_left: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub layout_sizing: Option<String>,

    // child-side layout
    #[serde(deserialize_with = "lenient")]
    pub layout_align: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub layout_grow: Option<f32>,

    // text
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub characters: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub font_family: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub font_style: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub font_weight: Option<FontWeight>,
    #[serde(deserialize_with = "lenient")]
    pub font_size: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub text_case: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub text_decoration: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub letter_spacing: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub line_height: Option<f32>,
    #[serde(alias = "textAlignHorizontal", deserialize_with = "lenient")]
    pub text_align: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub text_align_vertical: Option<String>,

    /// Keys not recognized above. Logged, never applied.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StyleOptions {
    /// Decode from a JSON object. `null` decodes to empty options.
    pub fn from_value(value: &Value) -> CommandResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    /// Text content under any of its aliases.
    pub fn characters(&self) -> Option<&str> {
        first_of([&self.text, &self.content, &self.characters].map(Option::as_deref))
    }

    fn touches_text(&self) -> bool {
        self.characters().is_some()
            || self.font_family.is_some()
            || self.font_style.is_some()
            || self.font_weight.is_some()
            || self.font_size.is_some()
            || self.text_case.is_some()
            || self.text_decoration.is_some()
            || self.letter_spacing.is_some()
            || self.line_height.is_some()
            || self.text_align.is_some()
            || self.text_align_vertical.is_some()
    }

    fn touches_layout(&self) -> bool {
        self.layout_mode.is_some()
            || self.primary_axis_align_items.is_some()
            || self.counter_axis_align_items.is_some()
            || self.item_spacing.is_some()
            || self.padding.is_some()
            || self.padding_top.is_some()
            || self.padding_right.is_some()
            || self.padding_bottom.is_some()
            || self.padding_left.is_some()
            || self.layout_sizing.is_some()
    }

    /// Requested font for a node currently set in `current`.
    fn font_for(&self, current: &FontName) -> FontName {
        let family = self
            .font_family
            .clone()
            .unwrap_or_else(|| current.family.clone());
        let style = first_of([
            self.font_style.clone(),
            self.font_weight.as_ref().map(|w| w.style().to_string()),
        ])
        .unwrap_or_else(|| current.style.clone());
        FontName::new(family, style)
    }
}

// ─── Keyword mapping ─────────────────────────────────────────────────────

fn normalize(keyword: &str) -> String {
    keyword.trim().to_ascii_lowercase().replace('_', "-")
}

pub fn axis_align(keyword: &str) -> Option<AxisAlign> {
    match normalize(keyword).as_str() {
        "start" | "min" | "flex-start" | "left" | "top" => Some(AxisAlign::Min),
        "center" | "middle" => Some(AxisAlign::Center),
        "end" | "max" | "flex-end" | "right" | "bottom" => Some(AxisAlign::Max),
        "space-between" => Some(AxisAlign::SpaceBetween),
        _ => None,
    }
}

fn sizing_mode(keyword: &str) -> Option<SizingMode> {
    match normalize(keyword).as_str() {
        "hug" | "auto" | "hug-contents" => Some(SizingMode::Hug),
        "fixed" => Some(SizingMode::Fixed),
        "fill" | "fill-container" => Some(SizingMode::Fill),
        _ => None,
    }
}

fn text_case(keyword: &str) -> Option<TextCase> {
    match normalize(keyword).as_str() {
        "original" | "none" => Some(TextCase::Original),
        "upper" | "uppercase" => Some(TextCase::Upper),
        "lower" | "lowercase" => Some(TextCase::Lower),
        "title" | "capitalize" => Some(TextCase::Title),
        _ => None,
    }
}

fn text_decoration(keyword: &str) -> Option<TextDecoration> {
    match normalize(keyword).as_str() {
        "none" => Some(TextDecoration::None),
        "underline" => Some(TextDecoration::Underline),
        "strikethrough" | "line-through" => Some(TextDecoration::Strikethrough),
        _ => None,
    }
}

fn text_align(keyword: &str) -> Option<TextAlign> {
    match normalize(keyword).as_str() {
        "left" | "start" => Some(TextAlign::Left),
        "center" => Some(TextAlign::Center),
        "right" | "end" => Some(TextAlign::Right),
        "justified" | "justify" => Some(TextAlign::Justified),
        _ => None,
    }
}

fn text_valign(keyword: &str) -> Option<TextVAlign> {
    match normalize(keyword).as_str() {
        "top" => Some(TextVAlign::Top),
        "center" | "middle" => Some(TextVAlign::Center),
        "bottom" => Some(TextVAlign::Bottom),
        _ => None,
    }
}

/// Apply `mapper` to an optional keyword, logging values it rejects.
fn keyword<T>(key: &str, value: Option<&String>, mapper: fn(&str) -> Option<T>) -> Option<T> {
    let raw = value?;
    let mapped = mapper(raw);
    if mapped.is_none() {
        log::debug!("ignoring unrecognized {key} `{raw}`");
    }
    mapped
}

fn shadow_from(input: &ShadowInput, brand: &BrandColors) -> Option<Shadow> {
    match input {
        ShadowInput::Enabled(false) => None,
        ShadowInput::Enabled(true) => Some(Shadow::default()),
        ShadowInput::Spec(spec) => {
            let d = Shadow::default();
            Some(Shadow {
                offset_x: spec.offset_x.unwrap_or(d.offset_x),
                offset_y: spec.offset_y.unwrap_or(d.offset_y),
                blur: spec.blur.unwrap_or(d.blur),
                spread: spec.spread.unwrap_or(d.spread),
                color: spec
                    .color
                    .as_ref()
                    .map(|c| parse_color(c, Some(brand)))
                    .unwrap_or(d.color),
            })
        }
    }
}

// ─── Font loading ────────────────────────────────────────────────────────

/// Load `font`, retrying the family's Regular style once. Returns the font
/// that actually loaded, or `None` when neither did.
pub async fn load_font_with_fallback<H: Host>(host: &mut H, font: &FontName) -> Option<FontName> {
    match host.load_font(font).await {
        Ok(()) => return Some(font.clone()),
        Err(err) => log::warn!("{err}; retrying with Regular"),
    }
    let regular = font.regular();
    if regular == *font {
        return None;
    }
    match host.load_font(&regular).await {
        Ok(()) => Some(regular),
        Err(err) => {
            log::warn!("{err}; skipping text properties");
            None
        }
    }
}

// ─── Application ─────────────────────────────────────────────────────────

/// Apply `styles` to node `id`.
///
/// Fails only when the node does not exist. Properties the node cannot take
/// are skipped; a font that cannot be loaded skips the text properties.
pub async fn apply_styles<H: Host>(
    host: &mut H,
    id: NodeRef,
    styles: &StyleOptions,
    brand: &BrandColors,
    config: &EngineConfig,
) -> CommandResult<()> {
    let snapshot = host
        .node(id)
        .cloned()
        .ok_or_else(|| CommandError::NodeNotFound(id.to_string()))?;

    for key in styles.extra.keys() {
        log::debug!("ignoring unknown style key `{key}` on {id}");
    }

    if has_text(&snapshot) && styles.touches_text() {
        apply_text(host, id, &snapshot, styles, config).await?;
    }

    if has_position(&snapshot) && (styles.x.is_some() || styles.y.is_some()) {
        let node = host.node(id).ok_or_else(|| CommandError::NodeNotFound(id.to_string()))?;
        let (x, y) = (styles.x.unwrap_or(node.x), styles.y.unwrap_or(node.y));
        host.set_position(id, x, y)?;
    }
    if has_resize(&snapshot) && (styles.width.is_some() || styles.height.is_some()) {
        let node = host.node(id).ok_or_else(|| CommandError::NodeNotFound(id.to_string()))?;
        let (w, h) = (
            styles.width.unwrap_or(node.width),
            styles.height.unwrap_or(node.height),
        );
        host.resize(id, w, h)?;
    }

    let Some(node) = host.node_mut(id) else {
        return Err(CommandError::NodeNotFound(id.to_string()));
    };
    apply_paint(node, styles, brand);
    apply_effects(node, styles, brand);

    if let Some(rotation) = styles.rotation
        && has_position(node)
    {
        node.rotation = rotation;
    }
    if let Some(opacity) = styles.opacity {
        node.opacity = opacity.clamp(0.0, 1.0);
    }
    if let Some(visible) = styles.visible {
        node.visible = visible;
    }

    let child_side = apply_child_layout(node, styles);
    let container = has_layout(node) && styles.touches_layout() && apply_container_layout(node, styles);

    if container {
        host.relayout(id);
    } else if child_side && let Some(parent) = host.parent_of(id) {
        host.relayout(parent);
    }
    Ok(())
}

async fn apply_text<H: Host>(
    host: &mut H,
    id: NodeRef,
    snapshot: &Node,
    styles: &StyleOptions,
    config: &EngineConfig,
) -> CommandResult<()> {
    let current = snapshot
        .text
        .as_ref()
        .map(|t| t.font.clone())
        .unwrap_or_else(|| FontName::new(config.default_font_family.clone(), "Regular"));
    let requested = styles.font_for(&current);

    let Some(font) = load_font_with_fallback(host, &requested).await else {
        log::warn!("no usable font for {id}; text properties skipped");
        return Ok(());
    };

    // The node may have been removed while the font loaded.
    let Some(node) = host.node_mut(id) else {
        return Err(CommandError::NodeNotFound(id.to_string()));
    };
    let Some(text) = node.text.as_mut() else {
        return Ok(());
    };
    text.font = font;
    if let Some(size) = styles.font_size {
        text.font_size = size.max(1.0);
    }
    if let Some(case) = keyword("textCase", styles.text_case.as_ref(), text_case) {
        text.text_case = case;
    }
    if let Some(decoration) = keyword("textDecoration", styles.text_decoration.as_ref(), text_decoration) {
        text.decoration = decoration;
    }
    if let Some(spacing) = styles.letter_spacing {
        text.letter_spacing = spacing;
    }
    if let Some(line_height) = styles.line_height {
        text.line_height = Some(line_height);
    }
    if let Some(align) = keyword("textAlign", styles.text_align.as_ref(), text_align) {
        text.align = align;
    }
    if let Some(valign) = keyword("textAlignVertical", styles.text_align_vertical.as_ref(), text_valign) {
        text.valign = valign;
    }

    // Re-set the characters so the host re-measures with the new font.
    let characters = styles
        .characters()
        .map(str::to_string)
        .unwrap_or_else(|| text.characters.clone());
    host.set_characters(id, &characters)?;
    Ok(())
}

fn apply_paint(node: &mut Node, styles: &StyleOptions, brand: &BrandColors) {
    if has_fill(node) {
        let fill = if has_text(node) {
            first_of([styles.color.as_ref(), styles.fill.as_ref()])
        } else {
            first_of([
                styles.fill.as_ref(),
                styles.background_color.as_ref(),
                styles.color.as_ref(),
            ])
        };
        if let Some(fill) = fill {
            node.fills = vec![Paint::Solid(parse_color(fill, Some(brand)))];
        }
    }

    if has_stroke(node) {
        if let Some(stroke) = first_of([styles.stroke.as_ref(), styles.border_color.as_ref()]) {
            node.strokes = vec![Paint::Solid(parse_color(stroke, Some(brand)))];
        }
        if let Some(weight) = first_of([styles.stroke_weight, styles.stroke_width, styles.border_width]) {
            node.stroke_weight = weight.max(0.0);
        }
    }

    if has_corner_radius(node)
        && let Some(radius) = &styles.corner_radius
    {
        node.corner_radius = corner_radius(node, radius);
    }
}

/// Resolve a radius request against what the node supports. Per-corner
/// requests on nodes without independent corners collapse to the mean of the
/// supplied corners.
fn corner_radius(node: &Node, radius: &RadiusInput) -> CornerRadius {
    match *radius {
        RadiusInput::Uniform(r) => CornerRadius::Uniform(r.max(0.0)),
        RadiusInput::Corners {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        } => {
            let supplied: Vec<f32> = [top_left, top_right, bottom_right, bottom_left]
                .into_iter()
                .flatten()
                .collect();
            if supplied.is_empty() {
                return node.corner_radius;
            }
            if has_independent_corners(node) {
                let (tl, tr, br, bl) = match node.corner_radius {
                    CornerRadius::Uniform(r) => (r, r, r, r),
                    CornerRadius::Independent {
                        top_left,
                        top_right,
                        bottom_right,
                        bottom_left,
                    } => (top_left, top_right, bottom_right, bottom_left),
                };
                CornerRadius::Independent {
                    top_left: top_left.unwrap_or(tl),
                    top_right: top_right.unwrap_or(tr),
                    bottom_right: bottom_right.unwrap_or(br),
                    bottom_left: bottom_left.unwrap_or(bl),
                }
            } else {
                CornerRadius::Uniform(supplied.iter().sum::<f32>() / supplied.len() as f32)
            }
        }
    }
}

fn apply_effects(node: &mut Node, styles: &StyleOptions, brand: &BrandColors) {
    if !has_effects(node) {
        return;
    }
    let touched = styles.shadow.is_some()
        || styles.inner_shadow.is_some()
        || styles.blur.is_some()
        || styles.background_blur.is_some();
    if !touched {
        return;
    }

    // Each supplied effect key replaces effects of its own type only.
    let mut effects: Vec<Effect> = node
        .effects
        .drain(..)
        .filter(|e| match e {
            Effect::DropShadow(_) => styles.shadow.is_none(),
            Effect::InnerShadow(_) => styles.inner_shadow.is_none(),
            Effect::LayerBlur { .. } => styles.blur.is_none(),
            Effect::BackgroundBlur { .. } => styles.background_blur.is_none(),
        })
        .collect();
    if let Some(shadow) = styles.shadow.as_ref().and_then(|s| shadow_from(s, brand)) {
        effects.push(Effect::DropShadow(shadow));
    }
    if let Some(shadow) = styles.inner_shadow.as_ref().and_then(|s| shadow_from(s, brand)) {
        effects.push(Effect::InnerShadow(shadow));
    }
    if let Some(radius) = styles.blur.filter(|r| *r > 0.0) {
        effects.push(Effect::LayerBlur { radius });
    }
    if let Some(radius) = styles.background_blur.filter(|r| *r > 0.0) {
        effects.push(Effect::BackgroundBlur { radius });
    }
    node.effects = effects;
}

/// Child-side layout properties. Returns whether any were set.
fn apply_child_layout(node: &mut Node, styles: &StyleOptions) -> bool {
    let mut changed = false;
    if let Some(raw) = &styles.layout_align {
        node.layout_align = match normalize(raw).as_str() {
            "stretch" => LayoutAlign::Stretch,
            _ => LayoutAlign::Inherit,
        };
        changed = true;
    }
    if let Some(grow) = styles.layout_grow {
        node.layout_grow = grow.max(0.0);
        changed = true;
    }
    changed
}

/// Container layout properties. Returns whether the layout changed.
fn apply_container_layout(node: &mut Node, styles: &StyleOptions) -> bool {
    let Some(layout) = node.layout.as_mut() else {
        return false;
    };
    let before = *layout;

    if let Some(mode) = &styles.layout_mode {
        match normalize(mode).as_str() {
            "horizontal" | "row" => layout.mode = LayoutMode::Horizontal,
            "vertical" | "column" => layout.mode = LayoutMode::Vertical,
            "none" => layout.mode = LayoutMode::None,
            "grid" => log::info!("grid layout requested for {}; not applied", node.id),
            other => log::debug!("ignoring unrecognized layoutMode `{other}`"),
        }
    }
    if let Some(align) = keyword(
        "primaryAxisAlignItems",
        styles.primary_axis_align_items.as_ref(),
        axis_align,
    ) {
        layout.primary_align = align;
    }
    if let Some(align) = keyword(
        "counterAxisAlignItems",
        styles.counter_axis_align_items.as_ref(),
        axis_align,
    ) {
        layout.counter_align = align;
    }
    if let Some(spacing) = styles.item_spacing {
        layout.item_spacing = spacing;
    }
    match &styles.padding {
        Some(PaddingInput::Uniform(p)) => layout.padding = Padding::all(*p),
        Some(PaddingInput::Sides {
            top,
            right,
            bottom,
            left,
        }) => {
            let p = &mut layout.padding;
            p.top = top.unwrap_or(p.top);
            p.right = right.unwrap_or(p.right);
            p.bottom = bottom.unwrap_or(p.bottom);
            p.left = left.unwrap_or(p.left);
        }
        None => {}
    }
    let p = &mut layout.padding;
    p.top = styles.padding_top.unwrap_or(p.top);
    p.right = styles.padding_right.unwrap_or(p.right);
    p.bottom = styles.padding_bottom.unwrap_or(p.bottom);
    p.left = styles.padding_left.unwrap_or(p.left);

    if let Some(sizing) = keyword("layoutSizing", styles.layout_sizing.as_ref(), sizing_mode) {
        layout.primary_sizing = sizing;
        layout.counter_sizing = sizing;
    }

    *layout != before
}
