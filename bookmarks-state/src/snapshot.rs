//! Conversion of the browser's nested bookmark tree into the flat
//! [`NodeTable`] the reducers work on.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StateInvariantError};
use crate::model::{BookmarkNode, ClosedFolders, NodeId, NodeTable, PageState};

/// A node as delivered by a bulk tree sync: folders carry their children
/// inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkTreeNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkTreeNode>>,
}

impl BookmarkTreeNode {
    /// Parse a tree from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Flatten `root` into a node table.
///
/// Each child's `parent_id` is taken from the folder that contains it;
/// a conflicting value in the input is logged and overridden. A node with
/// both a url and children is rejected.
pub fn normalize_nodes(
    root: &BookmarkTreeNode,
) -> std::result::Result<NodeTable, StateInvariantError> {
    let mut seen = HashSet::new();
    let mut flat = Vec::new();
    let mut stack = vec![(root, root.parent_id.clone())];

    while let Some((node, parent_id)) = stack.pop() {
        flat.push(flatten_node(node, parent_id, &mut seen)?);
        let children = node.children.as_deref().unwrap_or_default();
        for child in children.iter().rev() {
            stack.push((child, Some(node.id.clone())));
        }
    }
    Ok(flat.into_iter().collect())
}

fn flatten_node(
    node: &BookmarkTreeNode,
    parent_id: Option<NodeId>,
    seen: &mut HashSet<NodeId>,
) -> std::result::Result<BookmarkNode, StateInvariantError> {
    if !seen.insert(node.id.clone()) {
        return Err(StateInvariantError::DuplicateNode {
            id: node.id.clone(),
        });
    }
    let children = node.children.as_deref().unwrap_or_default();
    if node.url.is_some() && !children.is_empty() {
        return Err(StateInvariantError::NotAFolder {
            id: node.id.clone(),
        });
    }
    if node.parent_id.is_some() && node.parent_id != parent_id {
        log::warn!(
            "node `{}` claims parent {:?} but is nested in {:?}",
            node.id,
            node.parent_id,
            parent_id
        );
    }

    Ok(BookmarkNode {
        id: node.id.clone(),
        parent_id,
        url: node.url.clone(),
        title: node.title.clone(),
        children: children.iter().map(|child| child.id.clone()).collect(),
    })
}

/// Build the first page state after a tree load.
///
/// The selection is the first folder directly under the root (the
/// bookmarks bar in a browser profile), or the root itself when it has no
/// child folders.
pub fn initial_state(nodes: NodeTable) -> PageState {
    let selected = nodes.root().map(|root| {
        root.children()
            .iter()
            .find(|id| nodes.get(id).is_some_and(|node| node.is_folder()))
            .cloned()
            .unwrap_or_else(|| root.id().to_string())
    });
    PageState::new(nodes, selected, ClosedFolders::new())
}
