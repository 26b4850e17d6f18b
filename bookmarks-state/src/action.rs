//! Actions describing a single requested state change, plus one
//! constructor per variant.
//!
//! Constructors never validate: preconditions are checked by the reducers
//! when the action is applied.

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, NodeTable};

/// Fields of a node an `edit-bookmark` action may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ChangeInfo {
    /// Change only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: None,
        }
    }

    /// Change only the url.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: Some(url.into()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A requested transition of the page state.
///
/// Serialized with the variant name in a `name` field. Names this type
/// does not know deserialize to [`Action::Unknown`], which every reducer
/// treats as a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum Action {
    /// Overwrite the title and/or url of a node.
    #[serde(rename_all = "camelCase")]
    EditBookmark { id: NodeId, change_info: ChangeInfo },
    /// Drop the child at `index` from its parent's children.
    #[serde(rename_all = "camelCase")]
    RemoveBookmark {
        id: NodeId,
        parent_id: NodeId,
        index: usize,
    },
    /// Replace the whole node table after a bulk sync.
    RefreshNodes { nodes: NodeTable },
    /// Make a folder the active one.
    SelectFolder { id: NodeId },
    /// Expand (`open == true`) or collapse a folder.
    ChangeFolderOpen { id: NodeId, open: bool },
    /// An action name this version does not handle.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Return the wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::EditBookmark { .. } => "edit-bookmark",
            Action::RemoveBookmark { .. } => "remove-bookmark",
            Action::RefreshNodes { .. } => "refresh-nodes",
            Action::SelectFolder { .. } => "select-folder",
            Action::ChangeFolderOpen { .. } => "change-folder-open",
            Action::Unknown => "unknown",
        }
    }
}

pub fn edit_bookmark(id: impl Into<NodeId>, change_info: ChangeInfo) -> Action {
    Action::EditBookmark {
        id: id.into(),
        change_info,
    }
}

/// `index` is the child's position in the parent's children at removal
/// time.
pub fn remove_bookmark(
    id: impl Into<NodeId>,
    parent_id: impl Into<NodeId>,
    index: usize,
) -> Action {
    Action::RemoveBookmark {
        id: id.into(),
        parent_id: parent_id.into(),
        index,
    }
}

pub fn refresh_nodes(nodes: NodeTable) -> Action {
    Action::RefreshNodes { nodes }
}

pub fn select_folder(id: impl Into<NodeId>) -> Action {
    Action::SelectFolder { id: id.into() }
}

pub fn change_folder_open(id: impl Into<NodeId>, open: bool) -> Action {
    Action::ChangeFolderOpen {
        id: id.into(),
        open,
    }
}
