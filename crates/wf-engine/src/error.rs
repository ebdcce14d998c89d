use thiserror::Error;
use wf_core::{HostError, NodeRef};

/// A failure that ends a command. The dispatcher turns it into a failure
/// response; nothing here tears the process down.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("node {0} not found")]
    NodeNotFound(String),
    #[error("page {0} not found")]
    PageNotFound(String),
    #[error("unsupported element type: {0}")]
    UnsupportedElement(String),
    #[error("node {0} cannot contain children")]
    NotAContainer(NodeRef),
    #[error("no valid nodes to export")]
    NothingToExport,
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub type CommandResult<T> = Result<T, CommandError>;
