use serde::{Deserialize, Serialize};

use crate::action::{self, Action, ChangeInfo};
use crate::error::StateInvariantError;
use crate::model::NodeId;
use crate::snapshot::{BookmarkTreeNode, normalize_nodes};

/// Tree mutation reported by the browser's bookmarks model.
///
/// The browser keeps both sides of every parent/child link consistent
/// before reporting, so each event maps to exactly one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BookmarkEvent {
    /// Title and/or url of a node changed.
    #[serde(rename_all = "camelCase")]
    Changed { id: NodeId, change_info: ChangeInfo },
    /// A node was removed from its parent.
    #[serde(rename_all = "camelCase")]
    Removed {
        id: NodeId,
        parent_id: NodeId,
        index: usize,
    },
    /// The whole tree was re-read.
    TreeSynced { root: BookmarkTreeNode },
}

impl BookmarkEvent {
    /// Translate the event into the action that applies it.
    pub fn into_action(self) -> Result<Action, StateInvariantError> {
        match self {
            BookmarkEvent::Changed { id, change_info } => {
                Ok(action::edit_bookmark(id, change_info))
            },
            BookmarkEvent::Removed {
                id,
                parent_id,
                index,
            } => Ok(action::remove_bookmark(id, parent_id, index)),
            BookmarkEvent::TreeSynced { root } => {
                Ok(action::refresh_nodes(normalize_nodes(&root)?))
            },
        }
    }
}
