use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a bookmark or folder, stable for the node's lifetime.
pub type NodeId = String;

/// One entry of the bookmark tree: a folder when `url` is absent, a
/// bookmark otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub(crate) id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<NodeId>,
}

impl BookmarkNode {
    /// Create a folder without a parent or children.
    pub fn folder(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            url: None,
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Create a bookmark pointing at `url`.
    pub fn bookmark(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            url: Some(url.into()),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Attach the node to a parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Replace the ordered child ids.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ordered child ids; always empty for bookmarks.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Map from node id to node, shared between state versions.
///
/// Cloning is a pointer copy. Every derived table produced by
/// [`NodeTable::with_node`] keeps the untouched nodes reference-identical
/// to the source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable(Arc<HashMap<NodeId, Arc<BookmarkNode>>>);

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node stored under `id`.
    pub fn get(&self, id: &str) -> Option<&Arc<BookmarkNode>> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Arc<BookmarkNode>)> {
        self.0.iter()
    }

    /// Return the parentless node with the smallest id, if any.
    pub fn root(&self) -> Option<&Arc<BookmarkNode>> {
        self.0
            .values()
            .filter(|node| node.parent_id.is_none())
            .min_by(|left, right| left.id.cmp(&right.id))
    }

    /// Return whether both tables are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Return a new table with `node` stored under its id.
    pub fn with_node(&self, node: BookmarkNode) -> Self {
        let mut entries = HashMap::clone(&self.0);
        entries.insert(node.id.clone(), Arc::new(node));
        Self(Arc::new(entries))
    }
}

impl FromIterator<BookmarkNode> for NodeTable {
    fn from_iter<I: IntoIterator<Item = BookmarkNode>>(iter: I) -> Self {
        Self(Arc::new(
            iter.into_iter()
                .map(|node| (node.id.clone(), Arc::new(node)))
                .collect(),
        ))
    }
}

/// Per-folder "is closed" flags. Folders without an entry are open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosedFolders(Arc<HashMap<NodeId, bool>>);

impl ClosedFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return whether the folder is collapsed.
    pub fn is_closed(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Return the stored flag, distinguishing "explicitly open" from
    /// "never touched".
    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &bool)> {
        self.0.iter()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Return a new set with a single flag replaced.
    pub fn with_flag(&self, id: impl Into<NodeId>, closed: bool) -> Self {
        self.with_flags([(id.into(), closed)])
    }

    /// Return a new set with every given flag replaced.
    pub fn with_flags<I>(&self, flags: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, bool)>,
    {
        let mut entries = HashMap::clone(&self.0);
        entries.extend(flags);
        Self(Arc::new(entries))
    }
}

impl FromIterator<(NodeId, bool)> for ClosedFolders {
    fn from_iter<I: IntoIterator<Item = (NodeId, bool)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// Aggregate state of the bookmarks page.
///
/// A value is never mutated after construction; the root reducer builds a
/// new one for every action and shares unchanged slices with the old one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    nodes: NodeTable,
    #[serde(default)]
    selected_folder: Option<NodeId>,
    #[serde(default)]
    closed_folders: ClosedFolders,
}

impl PageState {
    pub fn new(
        nodes: NodeTable,
        selected_folder: Option<NodeId>,
        closed_folders: ClosedFolders,
    ) -> Self {
        Self {
            nodes,
            selected_folder,
            closed_folders,
        }
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.selected_folder.as_deref()
    }

    pub fn closed_folders(&self) -> &ClosedFolders {
        &self.closed_folders
    }
}
