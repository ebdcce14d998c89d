//! Capability-typed node model.
//!
//! The host document is a tree of [`Node`]s. Node kinds form a closed set,
//! but their properties overlap: frames and rectangles both take fills, only
//! frames and components lay out children, only text nodes carry a font.
//! Every [`NodeKind`] declares its [`Capability`] set statically, and
//! writers check it through the `has_*` predicates before touching a
//! property.

use crate::color::Color;
use crate::id::NodeRef;
use serde::{Deserialize, Serialize};

// ─── Paint ───────────────────────────────────────────────────────────────

/// Fill or stroke paint. Every color descriptor resolves to a solid paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
}

impl Paint {
    pub fn color(&self) -> Color {
        match self {
            Paint::Solid(c) => *c,
        }
    }
}

// ─── Corner radius ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CornerRadius {
    Uniform(f32),
    Independent {
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    },
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(0.0)
    }
}

impl CornerRadius {
    /// Single representative radius (mean of the corners when independent).
    pub fn uniform(&self) -> f32 {
        match *self {
            CornerRadius::Uniform(r) => r,
            CornerRadius::Independent {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => (top_left + top_right + bottom_right + bottom_left) / 4.0,
        }
    }
}

// ─── Effects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 8.0,
            spread: 0.0,
            color: Color::rgba(0.0, 0.0, 0.0, 0.25),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: f32 },
    BackgroundBlur { radius: f32 },
}

// ─── Auto layout ─────────────────────────────────────────────────────────

/// Container layout mode. `Grid` is accepted from callers but never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Alignment of children along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

/// How a container sizes itself along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizingMode {
    #[default]
    Fixed,
    Hug,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Auto-layout properties of a layout container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoLayout {
    pub mode: LayoutMode,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub item_spacing: f32,
    pub padding: Padding,
    pub primary_sizing: SizingMode,
    pub counter_sizing: SizingMode,
}

/// How a child sits inside an auto-layout parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutAlign {
    #[default]
    Inherit,
    Stretch,
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// Same family in the "Regular" style, the fallback when a weight is missing.
    pub fn regular(&self) -> Self {
        Self::new(self.family.clone(), "Regular")
    }
}

impl Default for FontName {
    fn default() -> Self {
        Self::new("Inter", "Regular")
    }
}

/// Map a numeric CSS font weight onto the named style bucket hosts use.
pub fn font_style_for_weight(weight: u16) -> &'static str {
    match weight {
        0..=300 => "Light",
        301..=400 => "Regular",
        401..=500 => "Medium",
        501..=600 => "SemiBold",
        601..=700 => "Bold",
        701..=800 => "ExtraBold",
        _ => "Black",
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextVAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub characters: String,
    pub font: FontName,
    pub font_size: f32,
    pub text_case: TextCase,
    pub decoration: TextDecoration,
    pub letter_spacing: f32,
    /// Line height in pixels; `None` is the font's natural line height.
    pub line_height: Option<f32>,
    pub align: TextAlign,
    pub valign: TextVAlign,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            characters: String::new(),
            font: FontName::default(),
            font_size: 14.0,
            text_case: TextCase::Original,
            decoration: TextDecoration::None,
            letter_spacing: 0.0,
            line_height: None,
            align: TextAlign::Left,
            valign: TextVAlign::Top,
        }
    }
}

// ─── Capabilities ────────────────────────────────────────────────────────

/// A property group a node kind may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Position,
    Resize,
    Fill,
    Stroke,
    CornerRadius,
    IndependentCorners,
    Effects,
    Layout,
    Text,
    Children,
}

use Capability as C;

const CONTAINER_CAPS: &[Capability] = &[
    C::Position,
    C::Resize,
    C::Fill,
    C::Stroke,
    C::CornerRadius,
    C::IndependentCorners,
    C::Effects,
    C::Layout,
    C::Children,
];
const RECT_CAPS: &[Capability] = &[
    C::Position,
    C::Resize,
    C::Fill,
    C::Stroke,
    C::CornerRadius,
    C::IndependentCorners,
    C::Effects,
];
const SHAPE_CAPS: &[Capability] = &[
    C::Position,
    C::Resize,
    C::Fill,
    C::Stroke,
    C::CornerRadius,
    C::Effects,
];
const ELLIPSE_CAPS: &[Capability] = &[C::Position, C::Resize, C::Fill, C::Stroke, C::Effects];
const LINE_CAPS: &[Capability] = &[C::Position, C::Resize, C::Stroke, C::Effects];
const TEXT_CAPS: &[Capability] = &[
    C::Position,
    C::Resize,
    C::Fill,
    C::Stroke,
    C::Effects,
    C::Text,
];
const GROUP_CAPS: &[Capability] = &[C::Position, C::Resize, C::Effects, C::Children];
const PAGE_CAPS: &[Capability] = &[C::Children];

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The closed set of node kinds a host document contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Page,
    Frame,
    Group,
    Rectangle,
    Ellipse,
    Polygon { point_count: u32 },
    Star { point_count: u32, inner_radius: f32 },
    Vector,
    Line,
    Text,
    Component,
    Instance { main_component: Option<NodeRef> },
}

impl NodeKind {
    /// The capability set of this kind.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            NodeKind::Document => &[],
            NodeKind::Page => PAGE_CAPS,
            NodeKind::Frame | NodeKind::Component | NodeKind::Instance { .. } => CONTAINER_CAPS,
            NodeKind::Group => GROUP_CAPS,
            NodeKind::Rectangle => RECT_CAPS,
            NodeKind::Polygon { .. } | NodeKind::Star { .. } | NodeKind::Vector => {
                SHAPE_CAPS
            }
            NodeKind::Ellipse => ELLIPSE_CAPS,
            NodeKind::Line => LINE_CAPS,
            NodeKind::Text => TEXT_CAPS,
        }
    }

    pub fn supports(&self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }

    /// Host-facing type name, as reported to callers.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Page => "PAGE",
            NodeKind::Frame => "FRAME",
            NodeKind::Group => "GROUP",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Polygon { .. } => "POLYGON",
            NodeKind::Star { .. } => "STAR",
            NodeKind::Vector => "VECTOR",
            NodeKind::Line => "LINE",
            NodeKind::Text => "TEXT",
            NodeKind::Component => "COMPONENT",
            NodeKind::Instance { .. } => "INSTANCE",
        }
    }
}

/// Kinds a caller can ask the host to allocate directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Frame,
    Rectangle,
    Ellipse,
    Polygon,
    Star,
    Vector,
    Line,
    Text,
    Component,
}

impl From<PrimitiveKind> for NodeKind {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Frame => NodeKind::Frame,
            PrimitiveKind::Rectangle => NodeKind::Rectangle,
            PrimitiveKind::Ellipse => NodeKind::Ellipse,
            PrimitiveKind::Polygon => NodeKind::Polygon { point_count: 3 },
            PrimitiveKind::Star => NodeKind::Star {
                point_count: 5,
                inner_radius: 0.382,
            },
            PrimitiveKind::Vector => NodeKind::Vector,
            PrimitiveKind::Line => NodeKind::Line,
            PrimitiveKind::Text => NodeKind::Text,
            PrimitiveKind::Component => NodeKind::Component,
        }
    }
}

/// A node in the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeRef,
    pub name: String,
    pub kind: NodeKind,

    /// Position relative to the nearest frame or page.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,

    pub opacity: f32,
    pub visible: bool,
    pub locked: bool,

    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f32,
    pub corner_radius: CornerRadius,
    pub effects: Vec<Effect>,

    /// Present on layout containers only.
    pub layout: Option<AutoLayout>,
    pub layout_align: LayoutAlign,
    pub layout_grow: f32,

    /// Present on text nodes only.
    pub text: Option<TextData>,
}

impl Node {
    /// A node with the host's defaults for `kind`.
    pub fn new(id: NodeRef, kind: NodeKind) -> Self {
        let gray = Paint::Solid(Color::from_u8(0xD9, 0xD9, 0xD9, 0xFF));
        let (width, height, fills, strokes) = match &kind {
            NodeKind::Frame | NodeKind::Component | NodeKind::Instance { .. } => {
                (100.0, 100.0, vec![Paint::Solid(Color::WHITE)], Vec::new())
            }
            NodeKind::Text => (0.0, 0.0, vec![Paint::Solid(Color::BLACK)], Vec::new()),
            NodeKind::Line => (100.0, 0.0, Vec::new(), vec![Paint::Solid(Color::BLACK)]),
            NodeKind::Document | NodeKind::Page | NodeKind::Group => {
                (0.0, 0.0, Vec::new(), Vec::new())
            }
            _ => (100.0, 100.0, vec![gray], Vec::new()),
        };
        let layout = kind.supports(Capability::Layout).then(AutoLayout::default);
        let text = matches!(kind, NodeKind::Text).then(TextData::default);
        let name = default_name(&kind).to_string();

        Self {
            id,
            name,
            kind,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            fills,
            strokes,
            stroke_weight: 1.0,
            corner_radius: CornerRadius::default(),
            effects: Vec::new(),
            layout,
            layout_align: LayoutAlign::Inherit,
            layout_grow: 0.0,
            text,
        }
    }

    pub fn supports(&self, cap: Capability) -> bool {
        self.kind.supports(cap)
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self.kind, NodeKind::Page)
    }
}

fn default_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Document => "Document",
        NodeKind::Page => "Page",
        NodeKind::Frame => "Frame",
        NodeKind::Group => "Group",
        NodeKind::Rectangle => "Rectangle",
        NodeKind::Ellipse => "Ellipse",
        NodeKind::Polygon { .. } => "Polygon",
        NodeKind::Star { .. } => "Star",
        NodeKind::Vector => "Vector",
        NodeKind::Line => "Line",
        NodeKind::Text => "Text",
        NodeKind::Component => "Component",
        NodeKind::Instance { .. } => "Instance",
    }
}

// ─── Capability predicates ───────────────────────────────────────────────

pub fn has_position(node: &Node) -> bool {
    node.supports(Capability::Position)
}

pub fn has_resize(node: &Node) -> bool {
    node.supports(Capability::Resize)
}

pub fn has_fill(node: &Node) -> bool {
    node.supports(Capability::Fill)
}

pub fn has_stroke(node: &Node) -> bool {
    node.supports(Capability::Stroke)
}

pub fn has_corner_radius(node: &Node) -> bool {
    node.supports(Capability::CornerRadius)
}

pub fn has_independent_corners(node: &Node) -> bool {
    node.supports(Capability::IndependentCorners)
}

pub fn has_effects(node: &Node) -> bool {
    node.supports(Capability::Effects)
}

pub fn has_layout(node: &Node) -> bool {
    node.supports(Capability::Layout)
}

pub fn has_text(node: &Node) -> bool {
    node.supports(Capability::Text)
}

pub fn has_children(node: &Node) -> bool {
    node.supports(Capability::Children)
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_buckets() {
        assert_eq!(font_style_for_weight(100), "Light");
        assert_eq!(font_style_for_weight(300), "Light");
        assert_eq!(font_style_for_weight(400), "Regular");
        assert_eq!(font_style_for_weight(500), "Medium");
        assert_eq!(font_style_for_weight(600), "SemiBold");
        assert_eq!(font_style_for_weight(700), "Bold");
        assert_eq!(font_style_for_weight(800), "ExtraBold");
        assert_eq!(font_style_for_weight(900), "Black");
    }

    #[test]
    fn capability_sets_by_kind() {
        let frame = Node::new(NodeRef::intern("m:1"), NodeKind::Frame);
        assert!(has_layout(&frame));
        assert!(has_independent_corners(&frame));
        assert!(frame.layout.is_some());

        let ellipse = Node::new(NodeRef::intern("m:2"), NodeKind::Ellipse);
        assert!(has_fill(&ellipse));
        assert!(!has_corner_radius(&ellipse));
        assert!(!has_layout(&ellipse));

        let star = Node::new(NodeRef::intern("m:3"), PrimitiveKind::Star.into());
        assert!(has_corner_radius(&star));
        assert!(!has_independent_corners(&star));

        let text = Node::new(NodeRef::intern("m:4"), NodeKind::Text);
        assert!(has_text(&text));
        assert!(text.text.is_some());
        assert!(!has_corner_radius(&text));

        let group = Node::new(NodeRef::intern("m:5"), NodeKind::Group);
        assert!(!has_fill(&group));
        assert!(has_children(&group));

        let line = Node::new(NodeRef::intern("m:6"), NodeKind::Line);
        assert!(!has_fill(&line));
        assert!(has_stroke(&line));
    }

    #[test]
    fn independent_corners_average() {
        let r = CornerRadius::Independent {
            top_left: 4.0,
            top_right: 8.0,
            bottom_right: 12.0,
            bottom_left: 16.0,
        };
        assert_eq!(r.uniform(), 10.0);
    }

    #[test]
    fn rect_union() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let b = Rect {
            x: 5.0,
            y: -5.0,
            width: 10.0,
            height: 10.0,
        };
        let u = a.union(&b);
        assert_eq!(
            u,
            Rect {
                x: 0.0,
                y: -5.0,
                width: 15.0,
                height: 15.0
            }
        );
    }
}
