//! Wireforge command engine.
//!
//! Decodes inbound command envelopes, routes them to handlers that drive a
//! [`wf_core::Host`], and answers each with exactly one [`Response`]. The
//! engine also tracks the wireframe session so later commands land on the
//! right page without the caller repeating context.

pub mod config;
pub mod defaults;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod factory;
pub mod handlers;
pub mod protocol;
pub mod session;
pub mod style;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{CommandError, CommandResult};
pub use factory::{ElementKind, ElementProps, create_element};
pub use protocol::{CommandKind, Envelope, Notification, Response};
pub use session::Session;
pub use style::{StyleOptions, apply_styles};
