use crate::config::EngineConfig;
use crate::session::Session;
use wf_core::{Host, NodeRef};

/// The command engine: a host, the session tracked against it, and the
/// tunables. One instance lives for the whole plugin run.
pub struct Engine<H: Host> {
    pub host: H,
    pub session: Session,
    pub config: EngineConfig,
}

impl<H: Host> Engine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            session: Session::new(),
            config,
        }
    }

    /// The page context-free commands target. Re-validated on every call.
    pub fn context_page(&mut self) -> NodeRef {
        self.session.active_page_id(&self.host)
    }

    /// `parent` if it still exists, otherwise the context page.
    pub fn live_parent(&mut self, parent: NodeRef) -> NodeRef {
        if self.host.node(parent).is_some() {
            parent
        } else {
            log::warn!("parent {parent} disappeared; attaching to the context page");
            self.context_page()
        }
    }
}
