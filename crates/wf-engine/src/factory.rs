//! Element factory.
//!
//! Primitive kinds allocate exactly one host node. Composite kinds (button,
//! input, card, navbar, custom) allocate several primitives on the context
//! page, lay them out relative to each other at its origin, group them, and
//! only then hand the group to the real parent. An auto-layout parent sees one
//! child, never the loose parts. The group is what the caller gets back.
//!
//! Text needs its font loaded before characters can be set. Loading
//! suspends, and the document may change meanwhile, so the parent is looked
//! up again after every load.

use crate::defaults::{first_of, first_str};
use crate::engine::Engine;
use crate::error::{CommandError, CommandResult};
use crate::style::{StyleOptions, apply_styles, lenient, load_font_with_fallback};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use strum::{Display, EnumString};
use wf_core::color::{Color, ColorInput, parse_color, parse_color_str};
use wf_core::model::*;
use wf_core::{Host, HostError, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ElementKind {
    #[strum(serialize = "rectangle", serialize = "rect")]
    Rectangle,
    #[strum(serialize = "ellipse", serialize = "circle")]
    Ellipse,
    Polygon,
    Star,
    Vector,
    Line,
    Text,
    Frame,
    Component,
    Instance,
    Group,
    Button,
    Input,
    Card,
    #[strum(serialize = "navbar", serialize = "nav")]
    Navbar,
    #[strum(serialize = "custom", serialize = "container")]
    Custom,
}

impl ElementKind {
    pub fn parse(raw: &str) -> CommandResult<Self> {
        Self::from_str(raw.trim()).map_err(|_| CommandError::UnsupportedElement(raw.to_string()))
    }

    fn primitive(self) -> Option<PrimitiveKind> {
        Some(match self {
            ElementKind::Rectangle => PrimitiveKind::Rectangle,
            ElementKind::Ellipse => PrimitiveKind::Ellipse,
            ElementKind::Polygon => PrimitiveKind::Polygon,
            ElementKind::Star => PrimitiveKind::Star,
            ElementKind::Vector => PrimitiveKind::Vector,
            ElementKind::Line => PrimitiveKind::Line,
            ElementKind::Text => PrimitiveKind::Text,
            ElementKind::Frame => PrimitiveKind::Frame,
            ElementKind::Component => PrimitiveKind::Component,
            _ => return None,
        })
    }
}

/// Element properties: composite fields plus every style key.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementProps {
    pub name: Option<String>,
    /// `top`, `bottom`, `left`, `right` or `center`.
    pub position: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "description")]
    pub body: Option<String>,
    #[serde(alias = "brand")]
    pub logo: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub links: Option<Vec<String>>,
    /// Text content, or the item list of a custom container.
    pub content: Option<Value>,
    pub component_id: Option<String>,
    pub node_ids: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub point_count: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub inner_radius: Option<f32>,
    #[serde(flatten)]
    pub style: StyleOptions,
}

impl ElementProps {
    pub fn from_value(value: &Value) -> CommandResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    /// Text content under any of its aliases.
    pub fn text_content(&self) -> Option<&str> {
        first_of([
            self.style.text.as_deref(),
            self.label.as_deref(),
            self.content.as_ref().and_then(Value::as_str),
            self.style.characters.as_deref(),
        ])
    }

    fn fill(&self) -> Option<&ColorInput> {
        first_of([self.style.fill.as_ref(), self.style.background_color.as_ref()])
    }
}

/// Resolve a caller-supplied node id. Unknown strings were never issued.
pub fn lookup_node<H: Host>(host: &H, raw: &str) -> Option<NodeRef> {
    NodeRef::lookup(raw).filter(|id| host.node(*id).is_some())
}

/// Create an element under `parent` (or the context page) and return the
/// node handed back to the caller.
pub async fn create_element<H: Host>(
    engine: &mut Engine<H>,
    kind: ElementKind,
    parent: Option<NodeRef>,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let parent = resolve_parent(engine, parent);
    let id = build(engine, kind, parent, props).await?;
    log::info!("created {kind} {id} under {parent}");
    Ok(id)
}

fn resolve_parent<H: Host>(engine: &mut Engine<H>, parent: Option<NodeRef>) -> NodeRef {
    match parent {
        Some(p) if engine.host.node(p).is_some_and(has_children) => p,
        Some(p) => {
            log::warn!("parent {p} is missing or cannot hold children; using the context page");
            engine.context_page()
        }
        None => engine.context_page(),
    }
}

async fn build<H: Host>(
    engine: &mut Engine<H>,
    kind: ElementKind,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let id = match kind {
        ElementKind::Button => build_button(engine, parent, props).await?,
        ElementKind::Input => build_input(engine, parent, props).await?,
        ElementKind::Card => build_card(engine, parent, props).await?,
        ElementKind::Navbar => build_navbar(engine, parent, props).await?,
        ElementKind::Custom => build_custom(engine, parent, props).await?,
        ElementKind::Instance => build_instance(engine, parent, props)?,
        ElementKind::Group => build_group(engine, parent, props)?,
        primitive => match primitive.primitive() {
            Some(p) => build_primitive(engine, p, parent, props).await?,
            None => return Err(CommandError::UnsupportedElement(kind.to_string())),
        },
    };
    if let Some(name) = &props.name
        && let Some(node) = engine.host.node_mut(id)
    {
        node.name = name.clone();
    }
    place(engine, id, props)?;
    Ok(id)
}

// ─── Primitives ──────────────────────────────────────────────────────────

async fn build_primitive<H: Host>(
    engine: &mut Engine<H>,
    kind: PrimitiveKind,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let id = engine.host.create_node(kind)?;
    if let Some(node) = engine.host.node_mut(id) {
        match &mut node.kind {
            NodeKind::Polygon { point_count } => {
                *point_count = props.point_count.unwrap_or(*point_count).max(3);
            }
            NodeKind::Star {
                point_count,
                inner_radius,
            } => {
                *point_count = props.point_count.unwrap_or(*point_count).max(3);
                *inner_radius = props.inner_radius.unwrap_or(*inner_radius).clamp(0.0, 1.0);
            }
            _ => {}
        }
        if let Some(text) = node.text.as_mut() {
            text.font.family = engine.config.default_font_family.clone();
        }
    }

    let mut styles = props.style.clone();
    if kind == PrimitiveKind::Text {
        styles.text = Some(props.text_content().unwrap_or("Text").to_string());
    }
    let brand = engine.session.brand_colors().clone();
    if let Err(err) = apply_styles(&mut engine.host, id, &styles, &brand, &engine.config).await {
        engine.host.remove(id);
        return Err(err);
    }

    let parent = engine.live_parent(parent);
    engine.host.append_child(parent, id)?;
    Ok(id)
}

fn build_instance<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let component = match &props.component_id {
        Some(raw) => lookup_node(&engine.host, raw)
            .filter(|id| {
                engine
                    .host
                    .node(*id)
                    .is_some_and(|n| matches!(n.kind, NodeKind::Component))
            })
            .ok_or_else(|| CommandError::NodeNotFound(raw.clone()))?,
        None => {
            let component = engine.host.create_node(PrimitiveKind::Component)?;
            engine.host.append_child(parent, component)?;
            component
        }
    };
    let id = engine.host.create_instance(component)?;
    engine.host.append_child(parent, id)?;
    Ok(id)
}

fn build_group<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let raw = props.node_ids.as_deref().unwrap_or_default();
    let mut nodes = Vec::with_capacity(raw.len());
    for r in raw {
        nodes.push(lookup_node(&engine.host, r).ok_or_else(|| CommandError::NodeNotFound(r.clone()))?);
    }
    if nodes.is_empty() {
        return Err(CommandError::MissingField("nodeIds"));
    }
    Ok(engine.host.group(&nodes, parent)?)
}

// ─── Composite helpers ───────────────────────────────────────────────────

struct TextSpec<'a> {
    content: &'a str,
    style: &'a str,
    size: f32,
    color: Color,
}

/// A text node with its font loaded and characters set, appended to the
/// live parent.
async fn make_text<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    spec: TextSpec<'_>,
) -> CommandResult<NodeRef> {
    let requested = FontName::new(engine.config.default_font_family.clone(), spec.style);
    let Some(font) = load_font_with_fallback(&mut engine.host, &requested).await else {
        return Err(HostError::FontUnavailable {
            family: requested.family,
            style: requested.style,
        }
        .into());
    };

    let id = engine.host.create_node(PrimitiveKind::Text)?;
    if let Some(node) = engine.host.node_mut(id) {
        node.fills = vec![Paint::Solid(spec.color)];
        if let Some(text) = node.text.as_mut() {
            text.font = font;
            text.font_size = spec.size;
        }
    }
    engine.host.set_characters(id, spec.content)?;
    let parent = engine.live_parent(parent);
    engine.host.append_child(parent, id)?;
    Ok(id)
}

fn make_rect<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    size: (f32, f32),
    radius: f32,
    fill: Color,
) -> CommandResult<NodeRef> {
    let id = engine.host.create_node(PrimitiveKind::Rectangle)?;
    engine.host.resize(id, size.0, size.1)?;
    if let Some(node) = engine.host.node_mut(id) {
        node.corner_radius = CornerRadius::Uniform(radius);
        node.fills = vec![Paint::Solid(fill)];
    }
    engine.host.append_child(parent, id)?;
    Ok(id)
}

/// Keep a sub-step's node, or log the failure and carry on without it.
fn keep(parts: &mut Vec<NodeRef>, what: &str, result: CommandResult<NodeRef>) -> Option<NodeRef> {
    match result {
        Ok(id) => {
            parts.push(id);
            Some(id)
        }
        Err(err) => {
            log::warn!("skipping {what}: {err}");
            None
        }
    }
}

/// Color for a brand role, or `fallback` when the session has none.
fn brand_color<H: Host>(engine: &Engine<H>, role: &str, fallback: &str) -> Color {
    let brand = engine.session.brand_colors();
    if brand.contains_key(role) {
        parse_color_str(&format!("brand:{role}"), Some(brand))
    } else {
        parse_color_str(fallback, None)
    }
}

fn color_or<H: Host>(engine: &Engine<H>, input: Option<&ColorInput>, fallback: Color) -> Color {
    input
        .map(|c| parse_color(c, Some(engine.session.brand_colors())))
        .unwrap_or(fallback)
}

fn size_of<H: Host>(engine: &Engine<H>, id: NodeRef) -> (f32, f32) {
    engine
        .host
        .node(id)
        .map(|n| (n.width, n.height))
        .unwrap_or_default()
}

fn move_to<H: Host>(engine: &mut Engine<H>, id: NodeRef, x: f32, y: f32) {
    if let Err(err) = engine.host.set_position(id, x, y) {
        log::warn!("could not position {id}: {err}");
    }
}

fn finish_group<H: Host>(
    engine: &mut Engine<H>,
    parts: &[NodeRef],
    parent: NodeRef,
    name: &str,
) -> CommandResult<NodeRef> {
    let stage = engine.context_page();
    let group = engine.host.group(parts, stage)?;
    if let Some(node) = engine.host.node_mut(group) {
        node.name = name.to_string();
    }
    let parent = engine.live_parent(parent);
    if let Err(err) = engine.host.append_child(parent, group) {
        engine.host.remove(group);
        return Err(err.into());
    }
    Ok(group)
}

// ─── Composites ──────────────────────────────────────────────────────────

async fn build_button<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let s = &props.style;
    let stage = engine.context_page();
    let (w, h) = (s.width.unwrap_or(120.0), s.height.unwrap_or(40.0));
    let fill = color_or(engine, props.fill(), brand_color(engine, "primary", "primary"));
    let bg = make_rect(engine, stage, (w, h), 8.0, fill)?;
    let mut parts = vec![bg];

    let spec = TextSpec {
        content: props.text_content().unwrap_or("Button"),
        style: s.font_weight.as_ref().map_or("Medium", |w| w.style()),
        size: s.font_size.unwrap_or(14.0),
        color: color_or(engine, s.color.as_ref(), Color::WHITE),
    };
    let label = make_text(engine, stage, spec).await;
    if let Some(label) = keep(&mut parts, "button label", label) {
        let (tw, th) = size_of(engine, label);
        move_to(engine, label, (w - tw) / 2.0, (h - th) / 2.0);
    }

    finish_group(engine, &parts, parent, "Button")
}

async fn build_input<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let s = &props.style;
    let stage = engine.context_page();
    let (w, h) = (s.width.unwrap_or(240.0), s.height.unwrap_or(40.0));
    let fill = color_or(engine, props.fill(), Color::WHITE);
    let bg = make_rect(engine, stage, (w, h), 4.0, fill)?;
    if let Some(node) = engine.host.node_mut(bg) {
        let stroke = first_of([s.stroke.as_ref(), s.border_color.as_ref()])
            .map(|c| parse_color(c, None))
            .unwrap_or_else(|| parse_color_str("#D1D5DB", None));
        node.strokes = vec![Paint::Solid(stroke)];
        node.stroke_weight = 1.0;
    }
    let mut parts = vec![bg];

    let spec = TextSpec {
        content: props.placeholder.as_deref().unwrap_or("Enter text..."),
        style: "Regular",
        size: s.font_size.unwrap_or(14.0),
        color: color_or(engine, s.color.as_ref(), parse_color_str("#9CA3AF", None)),
    };
    let placeholder = make_text(engine, stage, spec).await;
    if let Some(placeholder) = keep(&mut parts, "input placeholder", placeholder) {
        let (_, th) = size_of(engine, placeholder);
        move_to(engine, placeholder, 12.0, (h - th) / 2.0);
    }

    if let Some(text) = &props.label {
        let label = make_text(
            engine,
            stage,
            TextSpec {
                content: text,
                style: "Medium",
                size: 12.0,
                color: parse_color_str("#374151", None),
            },
        )
        .await;
        if let Some(label) = keep(&mut parts, "input label", label) {
            let (_, lh) = size_of(engine, label);
            move_to(engine, label, 0.0, -(lh + 4.0));
        }
    }

    finish_group(engine, &parts, parent, "Input")
}

async fn build_card<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    const PAD: f32 = 16.0;
    let s = &props.style;
    let stage = engine.context_page();
    let (w, h) = (s.width.unwrap_or(300.0), s.height.unwrap_or(200.0));
    let fill = color_or(engine, props.fill(), Color::WHITE);
    let bg = make_rect(engine, stage, (w, h), 12.0, fill)?;
    if let Some(node) = engine.host.node_mut(bg) {
        node.effects = vec![Effect::DropShadow(Shadow {
            color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            ..Shadow::default()
        })];
    }
    let mut parts = vec![bg];

    let spec = TextSpec {
        content: props.title.as_deref().or(props.text_content()).unwrap_or("Card Title"),
        style: "Bold",
        size: 18.0,
        color: color_or(engine, s.color.as_ref(), parse_color_str("#111827", None)),
    };
    let title = make_text(engine, stage, spec).await;
    let mut cursor = PAD;
    if let Some(title) = keep(&mut parts, "card title", title) {
        move_to(engine, title, PAD, PAD);
        cursor += size_of(engine, title).1 + 8.0;
    }

    if let Some(body) = &props.body {
        let body = make_text(
            engine,
            stage,
            TextSpec {
                content: body,
                style: "Regular",
                size: 14.0,
                color: parse_color_str("#4B5563", None),
            },
        )
        .await;
        if let Some(body) = keep(&mut parts, "card body", body) {
            move_to(engine, body, PAD, cursor);
        }
    }

    finish_group(engine, &parts, parent, "Card")
}

async fn build_navbar<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    const PAD: f32 = 24.0;
    let s = &props.style;
    let stage = engine.context_page();
    let parent_width = engine
        .host
        .node(parent)
        .filter(|n| !n.is_page())
        .map(|n| n.width);
    let w = first_of([s.width, parent_width]).unwrap_or(1440.0);
    let h = s.height.unwrap_or(64.0);
    let fill = color_or(engine, props.fill(), Color::WHITE);
    let bg = make_rect(engine, stage, (w, h), 0.0, fill)?;
    let mut parts = vec![bg];

    let text_color = color_or(engine, s.color.as_ref(), parse_color_str("#111827", None));
    let logo = make_text(
        engine,
        stage,
        TextSpec {
            content: props.logo.as_deref().or(props.text_content()).unwrap_or("Logo"),
            style: "Bold",
            size: 20.0,
            color: text_color,
        },
    )
    .await;
    if let Some(logo) = keep(&mut parts, "navbar logo", logo) {
        let (_, lh) = size_of(engine, logo);
        move_to(engine, logo, PAD, (h - lh) / 2.0);
    }

    let default_links = ["Home", "About", "Contact"].map(String::from).to_vec();
    let links = props.links.clone().unwrap_or(default_links);
    let mut placed = Vec::with_capacity(links.len());
    for link in &links {
        let result = make_text(
            engine,
            stage,
            TextSpec {
                content: link,
                style: "Regular",
                size: 16.0,
                color: text_color,
            },
        )
        .await;
        if let Some(id) = keep(&mut parts, "navbar link", result) {
            placed.push(id);
        }
    }

    // Right-aligned run: the last link ends at the right padding.
    let spacing = engine.config.navbar_link_spacing;
    let mut widths = Vec::with_capacity(placed.len());
    for &id in &placed {
        widths.push(size_of(engine, id));
    }
    let total: f32 = widths.iter().map(|(lw, _)| lw).sum::<f32>()
        + spacing * placed.len().saturating_sub(1) as f32;
    let mut x = w - PAD - total;
    for (&id, &(lw, lh)) in placed.iter().zip(&widths) {
        move_to(engine, id, x, (h - lh) / 2.0);
        x += lw + spacing;
    }

    finish_group(engine, &parts, parent, "Navbar")
}

async fn build_custom<H: Host>(
    engine: &mut Engine<H>,
    parent: NodeRef,
    props: &ElementProps,
) -> CommandResult<NodeRef> {
    let s = &props.style;
    let stage = engine.context_page();
    let (w, h) = (s.width.unwrap_or(400.0), s.height.unwrap_or(300.0));
    let fill = color_or(engine, props.fill(), Color::WHITE);
    let radius = match s.corner_radius {
        Some(crate::style::RadiusInput::Uniform(r)) => r,
        _ => 0.0,
    };
    let bg = make_rect(engine, stage, (w, h), radius, fill)?;
    let mut parts = vec![bg];

    let items = props
        .content
        .as_ref()
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for item in &items {
        let Some(object) = item.as_object() else {
            log::warn!("skipping custom content item that is not an object");
            continue;
        };
        let Some(raw_kind) = first_str(object, &["type", "elementType"]) else {
            log::warn!("skipping custom content item without a type");
            continue;
        };
        let kind = match ElementKind::parse(raw_kind) {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("skipping custom content item: {err}");
                continue;
            }
        };
        let item_props = match object.get("properties") {
            Some(p) => ElementProps::from_value(p),
            None => ElementProps::from_value(item),
        };
        let item_props = match item_props {
            Ok(p) => p,
            Err(err) => {
                log::warn!("skipping custom content item: {err}");
                continue;
            }
        };
        // Offsets are relative to the container origin, which sits at the
        // page origin until the finished group is moved.
        let stage = engine.live_parent(stage);
        let built = Box::pin(build(engine, kind, stage, &item_props)).await;
        keep(&mut parts, "custom content item", built);
    }

    finish_group(engine, &parts, parent, "Container")
}

// ─── Placement ───────────────────────────────────────────────────────────

/// Explicit `x`/`y` win; otherwise a position keyword places the node
/// against its parent (the viewport when the parent is a page).
fn place<H: Host>(engine: &mut Engine<H>, id: NodeRef, props: &ElementProps) -> CommandResult<()> {
    let node = engine
        .host
        .node(id)
        .ok_or_else(|| CommandError::NodeNotFound(id.to_string()))?;
    let (nx, ny, w, h) = (node.x, node.y, node.width, node.height);

    if props.style.x.is_some() || props.style.y.is_some() {
        let x = props.style.x.unwrap_or(nx);
        let y = props.style.y.unwrap_or(ny);
        engine.host.set_position(id, x, y)?;
        return Ok(());
    }
    let Some(keyword) = props.position.as_deref() else {
        return Ok(());
    };

    let bounds = match engine.host.parent_of(id).and_then(|p| engine.host.node(p)) {
        Some(parent) if !parent.is_page() => Rect {
            x: 0.0,
            y: 0.0,
            width: parent.width,
            height: parent.height,
        },
        _ => engine.host.viewport(),
    };
    match keyword_position(keyword, bounds, (w, h)) {
        Some((x, y)) => engine.host.set_position(id, x, y)?,
        None => log::debug!("ignoring unrecognized position `{keyword}`"),
    }
    Ok(())
}

/// Flush on the named edge, centered on the other axis.
pub fn keyword_position(keyword: &str, bounds: Rect, size: (f32, f32)) -> Option<(f32, f32)> {
    let (w, h) = size;
    let cx = bounds.x + (bounds.width - w) / 2.0;
    let cy = bounds.y + (bounds.height - h) / 2.0;
    match keyword.trim().to_ascii_lowercase().as_str() {
        "top" => Some((cx, bounds.y)),
        "bottom" => Some((cx, bounds.y + bounds.height - h)),
        "left" => Some((bounds.x, cy)),
        "right" => Some((bounds.x + bounds.width - w, cy)),
        "center" => Some((cx, cy)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wf_core::MemoryHost;

    fn engine() -> Engine<MemoryHost> {
        Engine::new(MemoryHost::new(), EngineConfig::default())
    }

    fn props(value: Value) -> ElementProps {
        ElementProps::from_value(&value).unwrap()
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(ElementKind::parse("BUTTON").unwrap(), ElementKind::Button);
        assert_eq!(ElementKind::parse("rect").unwrap(), ElementKind::Rectangle);
        assert_eq!(ElementKind::parse("Nav").unwrap(), ElementKind::Navbar);
        let err = ElementKind::parse("carousel").unwrap_err();
        assert_eq!(err.to_string(), "unsupported element type: carousel");
    }

    #[test]
    fn keyword_positions() {
        let bounds = Rect {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 300.0,
        };
        let size = (100.0, 50.0);
        assert_eq!(keyword_position("top", bounds, size), Some((150.0, 0.0)));
        assert_eq!(keyword_position("bottom", bounds, size), Some((150.0, 250.0)));
        assert_eq!(keyword_position("LEFT", bounds, size), Some((0.0, 125.0)));
        assert_eq!(keyword_position("right", bounds, size), Some((300.0, 125.0)));
        assert_eq!(keyword_position("center", bounds, size), Some((150.0, 125.0)));
        assert_eq!(keyword_position("diagonal", bounds, size), None);
    }

    #[test]
    fn content_string_is_text() {
        let p = props(json!({"content": "Hello"}));
        assert_eq!(p.text_content(), Some("Hello"));
        let p = props(json!({"text": "A", "label": "B"}));
        assert_eq!(p.text_content(), Some("A"));
    }

    #[tokio::test]
    async fn primitive_lands_on_context_page_with_explicit_position() {
        let mut engine = engine();
        let page = engine.context_page();
        let id = create_element(
            &mut engine,
            ElementKind::Rectangle,
            None,
            &props(json!({"x": 10, "y": 20, "width": 50, "height": 60, "fill": "#FF0000"})),
        )
        .await
        .unwrap();

        let node = engine.host.node(id).unwrap();
        assert_eq!(engine.host.parent_of(id), Some(page));
        assert_eq!((node.x, node.y, node.width, node.height), (10.0, 20.0, 50.0, 60.0));
    }

    #[tokio::test]
    async fn text_primitive_loads_font_and_sets_characters() {
        let mut engine = engine();
        let id = create_element(&mut engine, ElementKind::Text, None, &props(json!({"text": "Hi"})))
            .await
            .unwrap();
        let text = engine.host.node(id).unwrap().text.clone().unwrap();
        assert_eq!(text.characters, "Hi");
        assert!(engine.host.is_font_loaded(&text.font));
    }

    #[tokio::test]
    async fn invalid_parent_falls_back_to_context_page() {
        let mut engine = engine();
        let page = engine.context_page();
        let rect = engine.host.create_node(PrimitiveKind::Rectangle).unwrap();
        let id = create_element(&mut engine, ElementKind::Ellipse, Some(rect), &ElementProps::default())
            .await
            .unwrap();
        assert_eq!(engine.host.parent_of(id), Some(page));
    }

    #[tokio::test]
    async fn star_takes_point_count() {
        let mut engine = engine();
        let id = create_element(
            &mut engine,
            ElementKind::Star,
            None,
            &props(json!({"pointCount": 7, "innerRadius": 0.5})),
        )
        .await
        .unwrap();
        assert_eq!(
            engine.host.node(id).unwrap().kind,
            NodeKind::Star {
                point_count: 7,
                inner_radius: 0.5
            }
        );
    }

    #[tokio::test]
    async fn input_with_label_has_three_parts() {
        let mut engine = engine();
        let id = create_element(
            &mut engine,
            ElementKind::Input,
            None,
            &props(json!({"label": "Email", "placeholder": "you@example.com"})),
        )
        .await
        .unwrap();
        let children = engine.host.children(id);
        assert_eq!(children.len(), 3);
        let bg = engine.host.node(children[0]).unwrap();
        assert_eq!((bg.width, bg.height), (240.0, 40.0));
        assert_eq!(bg.strokes.len(), 1);
        let placeholder = engine.host.node(children[1]).unwrap();
        assert_eq!(placeholder.x, 12.0);
    }

    #[tokio::test]
    async fn card_degrades_when_fonts_are_missing() {
        let host = MemoryHost::new().with_fonts([]);
        let mut engine = Engine::new(host, EngineConfig::default());
        let id = create_element(
            &mut engine,
            ElementKind::Card,
            None,
            &props(json!({"title": "Plans", "body": "Pick one"})),
        )
        .await
        .unwrap();
        let children = engine.host.children(id);
        assert_eq!(children.len(), 1);
        assert_eq!(engine.host.node(children[0]).unwrap().kind, NodeKind::Rectangle);
    }

    #[tokio::test]
    async fn navbar_links_are_right_aligned() {
        let mut engine = engine();
        let id = create_element(
            &mut engine,
            ElementKind::Navbar,
            None,
            &props(json!({"logo": "Acme", "links": ["One", "Two"]})),
        )
        .await
        .unwrap();
        let children = engine.host.children(id);
        assert_eq!(children.len(), 4);

        let bar = engine.host.node(children[0]).unwrap();
        assert_eq!((bar.width, bar.height), (1440.0, 64.0));
        let one = engine.host.node(children[2]).unwrap().clone();
        let two = engine.host.node(children[3]).unwrap().clone();
        assert!((two.x + two.width - (1440.0 - 24.0)).abs() < 1e-3);
        assert!((two.x - (one.x + one.width + 32.0)).abs() < 1e-3);
    }

    #[tokio::test]
    async fn custom_container_builds_items_relative_to_origin() {
        let mut engine = engine();
        let id = create_element(
            &mut engine,
            ElementKind::Custom,
            None,
            &props(json!({
                "width": 200,
                "height": 100,
                "x": 500,
                "y": 300,
                "content": [
                    {"type": "rectangle", "properties": {"x": 10, "y": 10, "width": 20, "height": 20}},
                    {"type": "hologram"},
                    {"type": "text", "text": "Caption", "x": 10, "y": 50}
                ]
            })),
        )
        .await
        .unwrap();

        let children = engine.host.children(id);
        assert_eq!(children.len(), 3);
        let rect = engine.host.node(children[1]).unwrap();
        assert_eq!((rect.x, rect.y), (510.0, 310.0));
        let group = engine.host.node(id).unwrap();
        assert_eq!((group.x, group.y), (500.0, 300.0));
    }

    #[tokio::test]
    async fn group_requires_known_nodes() {
        let mut engine = engine();
        let err = create_element(
            &mut engine,
            ElementKind::Group,
            None,
            &props(json!({"nodeIds": ["nope:1"]})),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::NodeNotFound(_)));
    }

    #[tokio::test]
    async fn instance_of_fresh_component() {
        let mut engine = engine();
        let id = create_element(&mut engine, ElementKind::Instance, None, &ElementProps::default())
            .await
            .unwrap();
        let NodeKind::Instance { main_component } = engine.host.node(id).unwrap().kind.clone() else {
            panic!("expected an instance");
        };
        let main = main_component.unwrap();
        assert_eq!(engine.host.node(main).unwrap().kind, NodeKind::Component);
    }
}
