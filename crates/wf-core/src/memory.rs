//! In-memory reference host.
//!
//! `MemoryHost` implements [`Host`] over a `petgraph` tree. It backs the
//! bridge binary when no external editor is attached and every engine test.
//!
//! Coordinates follow the usual design-tool convention: a node's `x`/`y` are
//! relative to its nearest frame-like ancestor (frame, component, instance)
//! or page. Groups are transparent: their children live in the group's
//! parent space, and the group's own bounds are the union of its children.

use crate::host::{ExportFormat, ExportSettings, Host, HostError};
use crate::id::NodeRef;
use crate::model::*;
use async_trait::async_trait;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Document number used in issued ids (`1:<n>`).
const DOC_SESSION: u32 = 1;

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.6;
/// Natural line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

pub struct MemoryHost {
    /// Parent → child edges. The edge weight is an insertion sequence
    /// number, so children are ordered by when they were appended.
    pub(crate) graph: StableDiGraph<Node, u64>,
    pub(crate) root: NodeIndex,
    id_index: HashMap<NodeRef, NodeIndex>,
    current_page: NodeIndex,
    selection: Vec<NodeRef>,
    viewport: Rect,
    available_fonts: HashSet<FontName>,
    loaded_fonts: HashSet<FontName>,
    seq: u64,
}

impl MemoryHost {
    /// A document with one page ("Page 1") and the default font set.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_ref = NodeRef::issue(DOC_SESSION);
        let root = graph.add_node(Node::new(root_ref, NodeKind::Document));

        let mut id_index = HashMap::new();
        id_index.insert(root_ref, root);

        let mut host = Self {
            graph,
            root,
            id_index,
            current_page: root,
            selection: Vec::new(),
            viewport: Rect {
                x: 0.0,
                y: 0.0,
                width: 1440.0,
                height: 900.0,
            },
            available_fonts: default_fonts(),
            loaded_fonts: HashSet::new(),
            seq: 0,
        };
        let page = host.create_page("Page 1");
        host.current_page = host.id_index[&page];
        host
    }

    /// Replace the set of fonts `load_font` can find.
    pub fn with_fonts(mut self, fonts: impl IntoIterator<Item = FontName>) -> Self {
        self.available_fonts = fonts.into_iter().collect();
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        };
        self
    }

    pub fn set_selection(&mut self, selection: Vec<NodeRef>) {
        self.selection = selection;
    }

    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.loaded_fonts.contains(font)
    }

    // ─── Graph helpers ───────────────────────────────────────────────────

    pub(crate) fn index_of(&self, id: NodeRef) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub(crate) fn parent_index(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    /// Children in append order.
    /// True when `idx` is `ancestor` or sits somewhere below it.
    pub(crate) fn is_within(&self, idx: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut current = Some(idx);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.parent_index(i);
        }
        false
    }

    pub(crate) fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        children.sort_by_key(|(seq, _)| *seq);
        children.into_iter().map(|(_, c)| c).collect()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn insert(&mut self, parent: NodeIndex, node: Node) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        let seq = self.next_seq();
        self.graph.add_edge(parent, idx, seq);
        self.id_index.insert(id, idx);
        idx
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeRef {
        let id = NodeRef::issue(DOC_SESSION);
        let page = self.current_page;
        self.insert(page, Node::new(id, kind));
        id
    }

    fn detach(&mut self, child: NodeIndex) {
        if let Some(old_parent) = self.parent_index(child)
            && let Some(edge) = self.graph.find_edge(old_parent, child)
        {
            self.graph.remove_edge(edge);
        }
    }

    /// Absolute origin of the coordinate space `idx`'s children live in.
    pub(crate) fn child_origin(&self, idx: NodeIndex) -> (f32, f32) {
        let node = &self.graph[idx];
        match node.kind {
            NodeKind::Document | NodeKind::Page => (0.0, 0.0),
            NodeKind::Group => self
                .parent_index(idx)
                .map(|p| self.child_origin(p))
                .unwrap_or((0.0, 0.0)),
            _ => {
                let (ox, oy) = self
                    .parent_index(idx)
                    .map(|p| self.child_origin(p))
                    .unwrap_or((0.0, 0.0));
                (ox + node.x, oy + node.y)
            }
        }
    }

    /// Absolute bounds of a node.
    pub(crate) fn absolute_bounds(&self, idx: NodeIndex) -> Rect {
        let (ox, oy) = self
            .parent_index(idx)
            .map(|p| self.child_origin(p))
            .unwrap_or((0.0, 0.0));
        let b = self.graph[idx].bounds();
        Rect {
            x: ox + b.x,
            y: oy + b.y,
            ..b
        }
    }

    /// Recompute a group's bounds from its children, then its ancestors'.
    fn refit_groups(&mut self, idx: NodeIndex) {
        let mut current = Some(idx);
        while let Some(idx) = current {
            if !matches!(self.graph[idx].kind, NodeKind::Group) {
                break;
            }
            let union = self
                .child_indices(idx)
                .into_iter()
                .map(|c| self.graph[c].bounds())
                .reduce(|a, b| a.union(&b));
            if let Some(u) = union {
                let g = &mut self.graph[idx];
                g.x = u.x;
                g.y = u.y;
                g.width = u.width;
                g.height = u.height;
            }
            current = self.parent_index(idx);
        }
    }

    /// Move a node within its parent space. Groups carry their members along.
    pub(crate) fn place(&mut self, idx: NodeIndex, x: f32, y: f32) {
        let (dx, dy) = {
            let node = &self.graph[idx];
            (x - node.x, y - node.y)
        };
        if matches!(self.graph[idx].kind, NodeKind::Group) {
            let mut stack = self.child_indices(idx);
            while let Some(c) = stack.pop() {
                if matches!(self.graph[c].kind, NodeKind::Group) {
                    stack.extend(self.child_indices(c));
                }
                let child = &mut self.graph[c];
                child.x += dx;
                child.y += dy;
            }
        }
        let node = &mut self.graph[idx];
        node.x = x;
        node.y = y;
    }

    /// Called after anything that can change a child's size or membership.
    fn after_child_change(&mut self, parent: NodeIndex) {
        self.refit_groups(parent);
        crate::layout::reflow_upwards(self, parent);
    }

    fn measure_text(text: &TextData) -> (f32, f32) {
        let lines: Vec<&str> = text.characters.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f32;
        let width = longest * (text.font_size * GLYPH_ADVANCE + text.letter_spacing);
        let line_height = text.line_height.unwrap_or(text.font_size * LINE_HEIGHT);
        (width.max(0.0), line_height * lines.len() as f32)
    }

    fn subtree_json(&self, idx: NodeIndex) -> serde_json::Value {
        let children: Vec<serde_json::Value> = self
            .child_indices(idx)
            .into_iter()
            .map(|c| self.subtree_json(c))
            .collect();
        serde_json::json!({
            "node": self.graph[idx],
            "children": children,
        })
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

fn default_fonts() -> HashSet<FontName> {
    let inter = [
        "Light",
        "Regular",
        "Medium",
        "SemiBold",
        "Bold",
        "ExtraBold",
        "Black",
    ]
    .into_iter()
    .map(|style| FontName::new("Inter", style));
    let roboto = ["Regular", "Bold"]
        .into_iter()
        .map(|style| FontName::new("Roboto", style));
    inter.chain(roboto).collect()
}

#[async_trait(?Send)]
impl Host for MemoryHost {
    fn root(&self) -> NodeRef {
        self.graph[self.root].id
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn current_page(&self) -> NodeRef {
        self.graph[self.current_page].id
    }

    fn set_current_page(&mut self, page: NodeRef) -> Result<(), HostError> {
        let idx = self.index_of(page).ok_or(HostError::NodeNotFound(page))?;
        if !self.graph[idx].is_page() {
            return Err(HostError::NotAPage(page));
        }
        self.current_page = idx;
        self.selection.clear();
        Ok(())
    }

    fn pages(&self) -> Vec<NodeRef> {
        self.child_indices(self.root)
            .into_iter()
            .map(|idx| self.graph[idx].id)
            .collect()
    }

    fn selection(&self) -> Vec<NodeRef> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.id_index.contains_key(id))
            .collect()
    }

    fn create_page(&mut self, name: &str) -> NodeRef {
        let id = NodeRef::issue(DOC_SESSION);
        let mut page = Node::new(id, NodeKind::Page);
        page.name = name.to_string();
        let root = self.root;
        self.insert(root, page);
        id
    }

    fn create_node(&mut self, kind: PrimitiveKind) -> Result<NodeRef, HostError> {
        Ok(self.alloc(kind.into()))
    }

    fn create_instance(&mut self, component: NodeRef) -> Result<NodeRef, HostError> {
        let main = self
            .node(component)
            .filter(|n| matches!(n.kind, NodeKind::Component))
            .cloned()
            .ok_or(HostError::NodeNotFound(component))?;
        let id = self.alloc(NodeKind::Instance {
            main_component: Some(component),
        });
        if let Some(node) = self.node_mut(id) {
            node.name = main.name;
            node.width = main.width;
            node.height = main.height;
            node.fills = main.fills;
            node.strokes = main.strokes;
            node.corner_radius = main.corner_radius;
        }
        Ok(id)
    }

    fn node(&self, id: NodeRef) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    fn node_mut(&mut self, id: NodeRef) -> Option<&mut Node> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    fn parent_of(&self, id: NodeRef) -> Option<NodeRef> {
        let idx = self.index_of(id)?;
        self.parent_index(idx).map(|p| self.graph[p].id)
    }

    fn children(&self, id: NodeRef) -> Vec<NodeRef> {
        self.index_of(id)
            .map(|idx| {
                self.child_indices(idx)
                    .into_iter()
                    .map(|c| self.graph[c].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn append_child(&mut self, parent: NodeRef, child: NodeRef) -> Result<(), HostError> {
        let p = self.index_of(parent).ok_or(HostError::NodeNotFound(parent))?;
        let c = self.index_of(child).ok_or(HostError::NodeNotFound(child))?;
        if !has_children(&self.graph[p]) || self.is_within(p, c) {
            return Err(HostError::InvalidParent(parent));
        }
        let old_parent = self.parent_index(c);
        self.detach(c);
        let seq = self.next_seq();
        self.graph.add_edge(p, c, seq);
        if let Some(old) = old_parent
            && old != p
        {
            self.after_child_change(old);
        }
        self.after_child_change(p);
        Ok(())
    }

    fn group(&mut self, nodes: &[NodeRef], parent: NodeRef) -> Result<NodeRef, HostError> {
        if nodes.is_empty() {
            return Err(HostError::EmptyGroup);
        }
        let p = self.index_of(parent).ok_or(HostError::NodeNotFound(parent))?;
        if !has_children(&self.graph[p]) {
            return Err(HostError::InvalidParent(parent));
        }
        let members = nodes
            .iter()
            .map(|&id| self.index_of(id).ok_or(HostError::NodeNotFound(id)))
            .collect::<Result<Vec<_>, _>>()?;
        if members.iter().any(|&m| self.is_within(p, m)) {
            return Err(HostError::InvalidParent(parent));
        }

        let id = NodeRef::issue(DOC_SESSION);
        let group = self.insert(p, Node::new(id, NodeKind::Group));
        for member in members {
            let old = self.parent_index(member);
            self.detach(member);
            let seq = self.next_seq();
            self.graph.add_edge(group, member, seq);
            if let Some(old) = old
                && old != p
            {
                self.after_child_change(old);
            }
        }
        self.after_child_change(group);
        Ok(id)
    }

    fn remove(&mut self, id: NodeRef) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if idx == self.root {
            return false;
        }
        let parent = self.parent_index(idx);

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            stack.extend(self.child_indices(current));
            if let Some(removed) = self.graph.remove_node(current) {
                self.id_index.remove(&removed.id);
                self.selection.retain(|s| *s != removed.id);
            }
        }

        if !self.graph.contains_node(self.current_page) {
            // The focused page went away: fall back to the first page left,
            // creating one if the document is now empty.
            self.current_page = match self.child_indices(self.root).first() {
                Some(&page) => page,
                None => {
                    let page = self.create_page("Page 1");
                    self.id_index[&page]
                }
            };
        }
        if let Some(parent) = parent {
            self.after_child_change(parent);
        }
        true
    }

    fn set_position(&mut self, id: NodeRef, x: f32, y: f32) -> Result<(), HostError> {
        let idx = self.index_of(id).ok_or(HostError::NodeNotFound(id))?;
        self.place(idx, x, y);
        if let Some(parent) = self.parent_index(idx) {
            self.refit_groups(parent);
        }
        Ok(())
    }

    fn resize(&mut self, id: NodeRef, width: f32, height: f32) -> Result<(), HostError> {
        let idx = self.index_of(id).ok_or(HostError::NodeNotFound(id))?;
        let node = &mut self.graph[idx];
        node.width = width.max(0.0);
        node.height = height.max(0.0);
        crate::layout::reflow(self, idx);
        if let Some(parent) = self.parent_index(idx) {
            self.after_child_change(parent);
        }
        Ok(())
    }

    fn set_characters(&mut self, id: NodeRef, characters: &str) -> Result<(), HostError> {
        let idx = self.index_of(id).ok_or(HostError::NodeNotFound(id))?;
        let font = match &self.graph[idx].text {
            Some(text) => text.font.clone(),
            None => return Err(HostError::NodeNotFound(id)),
        };
        if !self.loaded_fonts.contains(&font) {
            return Err(HostError::FontNotLoaded {
                family: font.family,
                style: font.style,
            });
        }
        let node = &mut self.graph[idx];
        if let Some(text) = node.text.as_mut() {
            text.characters = characters.to_string();
            let (w, h) = Self::measure_text(text);
            node.width = w;
            node.height = h;
        }
        if let Some(parent) = self.parent_index(idx) {
            self.after_child_change(parent);
        }
        Ok(())
    }

    fn relayout(&mut self, id: NodeRef) {
        if let Some(idx) = self.index_of(id) {
            crate::layout::reflow_upwards(self, idx);
        }
    }

    /// Only vector output is rendered here.
    fn default_export_format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    async fn load_font(&mut self, font: &FontName) -> Result<(), HostError> {
        if !self.available_fonts.contains(font) {
            return Err(HostError::FontUnavailable {
                family: font.family.clone(),
                style: font.style.clone(),
            });
        }
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    async fn export(&self, id: NodeRef, settings: ExportSettings) -> Result<Vec<u8>, HostError> {
        let idx = self.index_of(id).ok_or(HostError::NodeNotFound(id))?;
        match settings.format {
            ExportFormat::Svg => Ok(crate::svg::render_svg(self, idx, settings.scale).into_bytes()),
            ExportFormat::Json => serde_json::to_vec(&self.subtree_json(idx)).map_err(|e| {
                HostError::ExportFailed {
                    node: id,
                    reason: e.to_string(),
                }
            }),
            other => Err(HostError::UnsupportedFormat(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_document_has_one_focused_page() {
        let host = MemoryHost::new();
        assert_eq!(host.pages().len(), 1);
        assert_eq!(host.pages()[0], host.current_page());
        assert!(host.page_exists(host.current_page()));
    }

    #[test]
    fn created_nodes_land_on_current_page() {
        let mut host = MemoryHost::new();
        let rect = host.create_node(PrimitiveKind::Rectangle).unwrap();
        assert_eq!(host.parent_of(rect), Some(host.current_page()));
        assert_eq!(host.children(host.current_page()), vec![rect]);
    }

    #[test]
    fn append_child_moves_to_end() {
        let mut host = MemoryHost::new();
        let frame = host.create_node(PrimitiveKind::Frame).unwrap();
        let a = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let b = host.create_node(PrimitiveKind::Ellipse).unwrap();
        host.append_child(frame, b).unwrap();
        host.append_child(frame, a).unwrap();
        assert_eq!(host.children(frame), vec![b, a]);
    }

    #[test]
    fn append_to_leaf_is_rejected() {
        let mut host = MemoryHost::new();
        let rect = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let other = host.create_node(PrimitiveKind::Rectangle).unwrap();
        assert_eq!(
            host.append_child(rect, other),
            Err(HostError::InvalidParent(rect))
        );
    }

    #[test]
    fn containers_cannot_move_under_their_own_descendants() {
        let mut host = MemoryHost::new();
        let outer = host.create_node(PrimitiveKind::Frame).unwrap();
        let inner = host.create_node(PrimitiveKind::Frame).unwrap();
        let rect = host.create_node(PrimitiveKind::Rectangle).unwrap();
        host.append_child(outer, inner).unwrap();
        host.append_child(inner, rect).unwrap();

        assert_eq!(host.append_child(outer, outer), Err(HostError::InvalidParent(outer)));
        assert_eq!(host.append_child(inner, outer), Err(HostError::InvalidParent(inner)));
        assert_eq!(host.parent_of(outer), Some(host.current_page()));
        assert_eq!(host.parent_of(inner), Some(outer));
    }

    #[test]
    fn group_parent_inside_a_member_is_rejected() {
        let mut host = MemoryHost::new();
        let frame = host.create_node(PrimitiveKind::Frame).unwrap();
        let inner = host.create_node(PrimitiveKind::Frame).unwrap();
        host.append_child(frame, inner).unwrap();
        let before = host.children(inner).len();

        assert_eq!(host.group(&[frame], inner), Err(HostError::InvalidParent(inner)));
        assert_eq!(host.children(inner).len(), before);
        assert_eq!(host.parent_of(frame), Some(host.current_page()));
    }

    #[test]
    fn group_bounds_are_union_of_members() {
        let mut host = MemoryHost::new();
        let page = host.current_page();
        let a = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let b = host.create_node(PrimitiveKind::Rectangle).unwrap();
        host.set_position(a, 10.0, 10.0).unwrap();
        host.set_position(b, 200.0, 50.0).unwrap();
        let g = host.group(&[a, b], page).unwrap();
        let group = host.node(g).unwrap();
        assert_eq!(group.bounds(), Rect { x: 10.0, y: 10.0, width: 290.0, height: 140.0 });
        assert_eq!(host.children(g), vec![a, b]);
    }

    #[test]
    fn moving_a_group_moves_members() {
        let mut host = MemoryHost::new();
        let page = host.current_page();
        let a = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let g = host.group(&[a], page).unwrap();
        host.set_position(g, 40.0, 60.0).unwrap();
        let rect = host.node(a).unwrap();
        assert_eq!((rect.x, rect.y), (40.0, 60.0));
    }

    #[test]
    fn removing_focused_page_refocuses() {
        let mut host = MemoryHost::new();
        let first = host.current_page();
        let second = host.create_page("Second");
        host.set_current_page(second).unwrap();
        assert!(host.remove(second));
        assert_eq!(host.current_page(), first);
        assert!(!host.page_exists(second));
    }

    #[test]
    fn set_characters_requires_loaded_font() {
        let mut host = MemoryHost::new();
        let text = host.create_node(PrimitiveKind::Text).unwrap();
        assert!(matches!(
            host.set_characters(text, "Hello"),
            Err(HostError::FontNotLoaded { .. })
        ));
    }

    #[tokio::test]
    async fn text_is_measured_after_font_load() {
        let mut host = MemoryHost::new();
        let text = host.create_node(PrimitiveKind::Text).unwrap();
        host.load_font(&FontName::default()).await.unwrap();
        host.set_characters(text, "Hello").unwrap();
        let node = host.node(text).unwrap();
        assert!((node.width - 5.0 * 14.0 * 0.6).abs() < 1e-3);
        assert!((node.height - 14.0 * 1.2).abs() < 1e-3);
    }

    #[tokio::test]
    async fn missing_font_fails_to_load() {
        let mut host = MemoryHost::new().with_fonts([FontName::default()]);
        let err = host
            .load_font(&FontName::new("Inter", "Black"))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::FontUnavailable { .. }));
    }

    #[tokio::test]
    async fn export_svg_and_reject_raster() {
        let mut host = MemoryHost::new();
        let rect = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let svg = host
            .export(rect, ExportSettings { format: ExportFormat::Svg, scale: 1.0 })
            .await
            .unwrap();
        assert!(String::from_utf8(svg).unwrap().starts_with("<svg"));

        let err = host.export(rect, ExportSettings::default()).await.unwrap_err();
        assert_eq!(err, HostError::UnsupportedFormat(ExportFormat::Png));
    }
}
