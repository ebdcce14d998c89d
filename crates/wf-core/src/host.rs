//! The host scene-graph interface.
//!
//! The engine never owns the document. Everything it does goes through this
//! trait: allocating nodes, wiring parents, loading fonts, exporting. Hosts
//! run on a single logical thread, so the async methods are `?Send`. They
//! are suspension points, not parallelism.

use crate::id::NodeRef;
use crate::model::{FontName, Node, PrimitiveKind, Rect};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("node {0} not found")]
    NodeNotFound(NodeRef),
    #[error("font {family} {style} is not available")]
    FontUnavailable { family: String, style: String },
    #[error("font {family} {style} must be loaded before editing text")]
    FontNotLoaded { family: String, style: String },
    /// A leaf, or a container that would end up inside its own child.
    #[error("node {0} cannot take that child")]
    InvalidParent(NodeRef),
    #[error("node {0} is not a page")]
    NotAPage(NodeRef),
    #[error("cannot group an empty node list")]
    EmptyGroup,
    #[error("export format {0} is not supported")]
    UnsupportedFormat(ExportFormat),
    #[error("export of {node} failed: {reason}")]
    ExportFailed { node: NodeRef, reason: String },
}

/// Export encodings a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    #[default]
    #[serde(alias = "png")]
    Png,
    #[serde(alias = "jpg", alias = "JPEG", alias = "jpeg")]
    Jpg,
    #[serde(alias = "svg")]
    Svg,
    #[serde(alias = "pdf")]
    Pdf,
    #[serde(alias = "json")]
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpg => "JPG",
            ExportFormat::Svg => "SVG",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Json => "JSON",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub scale: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: 1.0,
        }
    }
}

/// Capability-typed object store the engine drives.
#[async_trait(?Send)]
pub trait Host {
    /// The document root.
    fn root(&self) -> NodeRef;

    /// Visible canvas bounds, used when a page has no size of its own.
    fn viewport(&self) -> Rect;

    /// The page the user is currently looking at.
    fn current_page(&self) -> NodeRef;

    fn set_current_page(&mut self, page: NodeRef) -> Result<(), HostError>;

    /// All pages in document order.
    fn pages(&self) -> Vec<NodeRef>;

    fn selection(&self) -> Vec<NodeRef>;

    /// Append a new page to the document.
    fn create_page(&mut self, name: &str) -> NodeRef;

    /// Allocate a primitive on the current page.
    fn create_node(&mut self, kind: PrimitiveKind) -> Result<NodeRef, HostError>;

    /// Allocate an instance of `component` on the current page.
    fn create_instance(&mut self, component: NodeRef) -> Result<NodeRef, HostError>;

    fn node(&self, id: NodeRef) -> Option<&Node>;

    fn node_mut(&mut self, id: NodeRef) -> Option<&mut Node>;

    fn parent_of(&self, id: NodeRef) -> Option<NodeRef>;

    fn children(&self, id: NodeRef) -> Vec<NodeRef>;

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: NodeRef, child: NodeRef) -> Result<(), HostError>;

    /// Wrap `nodes` in a new group under `parent`.
    fn group(&mut self, nodes: &[NodeRef], parent: NodeRef) -> Result<NodeRef, HostError>;

    /// Delete a node and its subtree. Returns whether it existed.
    fn remove(&mut self, id: NodeRef) -> bool;

    fn set_position(&mut self, id: NodeRef, x: f32, y: f32) -> Result<(), HostError>;

    fn resize(&mut self, id: NodeRef, width: f32, height: f32) -> Result<(), HostError>;

    /// Replace a text node's characters. The node's font must be loaded.
    fn set_characters(&mut self, id: NodeRef, characters: &str) -> Result<(), HostError>;

    /// Make a font usable for text edits. Suspends; fails if unavailable.
    async fn load_font(&mut self, font: &FontName) -> Result<(), HostError>;

    /// Render a node. Suspends.
    async fn export(&self, id: NodeRef, settings: ExportSettings) -> Result<Vec<u8>, HostError>;

    /// Recompute auto layout after a container's layout properties changed
    /// through `node_mut`. Hosts that lay out on their own ignore it.
    fn relayout(&mut self, _id: NodeRef) {}

    /// Format used when an export request names none.
    fn default_export_format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    /// Whether `id` still names a page.
    fn page_exists(&self, id: NodeRef) -> bool {
        self.node(id).is_some_and(Node::is_page)
    }
}
