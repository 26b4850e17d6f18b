use crate::action::Action;
use crate::error::StateInvariantError;
use crate::model::{ClosedFolders, NodeId, NodeTable};
use crate::tree::walk_up;

/// Reduce an action into the next set of closed folders.
pub fn update_closed_folders(
    state: &ClosedFolders,
    action: &Action,
    nodes: &NodeTable,
) -> Result<ClosedFolders, StateInvariantError> {
    match action {
        Action::ChangeFolderOpen { id, open } => {
            Ok(state.with_flag(id.clone(), !open))
        },
        Action::SelectFolder { id } => open_ancestors_of(state, nodes, id),
        Action::EditBookmark { .. }
        | Action::RemoveBookmark { .. }
        | Action::RefreshNodes { .. }
        | Action::Unknown => Ok(state.clone()),
    }
}

/// Open every closed strict ancestor of `id` so the node stays visible.
///
/// Returns `state` itself when no ancestor was closed.
fn open_ancestors_of(
    state: &ClosedFolders,
    nodes: &NodeTable,
    id: &str,
) -> Result<ClosedFolders, StateInvariantError> {
    let node = nodes.get(id).ok_or_else(|| StateInvariantError::UnknownNode {
        id: id.to_string(),
    })?;
    let Some(parent_id) = node.parent_id() else {
        return Ok(state.clone());
    };

    let mut reopened: Vec<(NodeId, bool)> = Vec::new();
    for ancestor in walk_up(nodes, parent_id) {
        let ancestor = ancestor?;
        if state.is_closed(ancestor) {
            reopened.push((ancestor.to_string(), false));
        }
    }

    if reopened.is_empty() {
        return Ok(state.clone());
    }
    Ok(state.with_flags(reopened))
}
