//! Session and context tracking.
//!
//! Remembers which wireframe and page later commands should target when the
//! caller does not say. The host document can change between commands (a
//! user deletes a page by hand), so the stored page is re-validated on every
//! read and silently replaced by the host's focused page when stale.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use wf_core::{BrandColors, Host, NodeRef};

/// A wireframe created by `CREATE_WIREFRAME`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireframeRecord {
    pub name: String,
    pub page_ids: Vec<NodeRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Session {
    active_wireframe: Option<NodeRef>,
    active_page: Option<NodeRef>,
    wireframes: HashMap<NodeRef, WireframeRecord>,
    brand_colors: BrandColors,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a wireframe and page active. The wireframe is registered only
    /// the first time it is seen; an existing record keeps its page list.
    pub fn set_active_wireframe(&mut self, wireframe: NodeRef, page: NodeRef, name: &str) {
        self.active_wireframe = Some(wireframe);
        self.active_page = Some(page);
        self.wireframes.entry(wireframe).or_insert_with(|| {
            let now = Utc::now();
            WireframeRecord {
                name: name.to_string(),
                page_ids: Vec::new(),
                created_at: now,
                updated_at: now,
            }
        });
        log::debug!("active wireframe {wireframe} on page {page}");
    }

    /// The page context-sensitive commands should target.
    ///
    /// Returns the stored page while it still names a page in the host;
    /// otherwise clears it and returns the host's focused page.
    pub fn active_page_id<H: Host>(&mut self, host: &H) -> NodeRef {
        if let Some(page) = self.active_page {
            if host.page_exists(page) {
                return page;
            }
            log::warn!("active page {page} no longer exists; using the host's current page");
            self.active_page = None;
        }
        host.current_page()
    }

    /// Record `node` under a wireframe. No-op when either is absent or the
    /// wireframe is unknown.
    pub fn add_node_to_wireframe(&mut self, wireframe: Option<NodeRef>, node: Option<NodeRef>) {
        let (Some(wireframe), Some(node)) = (wireframe, node) else {
            return;
        };
        if let Some(record) = self.wireframes.get_mut(&wireframe) {
            record.page_ids.push(node);
            record.updated_at = Utc::now();
        }
    }

    /// Focus `page` in the host and make it active. False when `page` does
    /// not name an existing page.
    pub fn switch_to_page<H: Host>(&mut self, host: &mut H, page: NodeRef) -> bool {
        if !host.page_exists(page) {
            return false;
        }
        if let Err(err) = host.set_current_page(page) {
            log::warn!("could not focus page {page}: {err}");
            return false;
        }
        self.active_page = Some(page);
        true
    }

    pub fn active_wireframe_id(&self) -> Option<NodeRef> {
        self.active_wireframe
    }

    pub fn wireframe(&self, id: NodeRef) -> Option<&WireframeRecord> {
        self.wireframes.get(&id)
    }

    pub fn wireframes(&self) -> impl Iterator<Item = (&NodeRef, &WireframeRecord)> {
        self.wireframes.iter()
    }

    pub fn brand_colors(&self) -> &BrandColors {
        &self.brand_colors
    }

    pub fn set_brand_colors(&mut self, colors: BrandColors) {
        self.brand_colors = colors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wf_core::{MemoryHost, PrimitiveKind};

    #[test]
    fn first_registration_wins() {
        let mut session = Session::new();
        let wf = NodeRef::intern("wf:1");
        let page = NodeRef::intern("wf:page");
        session.set_active_wireframe(wf, page, "First");
        session.add_node_to_wireframe(Some(wf), Some(NodeRef::intern("wf:node")));
        session.set_active_wireframe(wf, page, "Second");

        let record = session.wireframe(wf).unwrap();
        assert_eq!(record.name, "First");
        assert_eq!(record.page_ids.len(), 1);
        assert_eq!(session.active_wireframe_id(), Some(wf));
    }

    #[test]
    fn add_node_ignores_unknown_or_absent() {
        let mut session = Session::new();
        let wf = NodeRef::intern("wf:2");
        session.add_node_to_wireframe(Some(wf), Some(NodeRef::intern("x")));
        assert!(session.wireframe(wf).is_none());

        session.set_active_wireframe(wf, NodeRef::intern("p"), "W");
        session.add_node_to_wireframe(Some(wf), None);
        session.add_node_to_wireframe(None, Some(NodeRef::intern("x")));
        assert!(session.wireframe(wf).unwrap().page_ids.is_empty());
    }

    #[test]
    fn stale_page_falls_back_and_clears() {
        let mut host = MemoryHost::new();
        let original = host.current_page();
        let page = host.create_page("Doomed");
        let mut session = Session::new();
        assert!(session.switch_to_page(&mut host, page));
        assert_eq!(session.active_page_id(&host), page);

        host.remove(page);
        assert_eq!(session.active_page_id(&host), original);
        assert_eq!(session.active_page, None);
    }

    #[test]
    fn switch_rejects_non_pages() {
        let mut host = MemoryHost::new();
        let rect = host.create_node(PrimitiveKind::Rectangle).unwrap();
        let mut session = Session::new();
        assert!(!session.switch_to_page(&mut host, rect));
        assert!(!session.switch_to_page(&mut host, NodeRef::intern("nowhere")));
        assert_eq!(session.active_page, None);
    }
}
