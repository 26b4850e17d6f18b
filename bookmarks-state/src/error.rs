use thiserror::Error;

use crate::model::NodeId;

/// A reducer precondition that the incoming action or the current tree
/// does not satisfy.
///
/// These are caller contract violations rather than recoverable
/// conditions: the store keeps its previous state and notifies nobody.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateInvariantError {
    #[error("node `{id}` does not exist")]
    UnknownNode { id: NodeId },

    #[error("node `{id}` is a bookmark, not a folder")]
    NotAFolder { id: NodeId },

    #[error("folder `{parent_id}` has no child at index {index} (len {len})")]
    IndexOutOfRange {
        parent_id: NodeId,
        index: usize,
        len: usize,
    },

    #[error(
        "folder `{parent_id}` holds `{found}` at index {index}, \
         expected `{expected}`"
    )]
    ChildMismatch {
        parent_id: NodeId,
        index: usize,
        expected: NodeId,
        found: NodeId,
    },

    #[error("parent chain starting at `{id}` loops back on itself")]
    ParentCycle { id: NodeId },

    #[error("node id `{id}` appears more than once in the tree")]
    DuplicateNode { id: NodeId },
}

/// Errors originating from the `bookmarks-state` crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Invariant(#[from] StateInvariantError),

    #[error("store is not initialized")]
    NotInitialized,

    #[error("store is already initialized")]
    AlreadyInitialized,

    #[error("action `{action}` dispatched while observers were notified")]
    ReentrantDispatch { action: &'static str },

    #[error("dispatch queue is full ({limit} pending actions)")]
    QueueFull { limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
