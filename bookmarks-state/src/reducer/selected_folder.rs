use crate::action::Action;
use crate::error::StateInvariantError;
use crate::model::{NodeId, NodeTable};
use crate::tree::is_ancestor_of;

/// Reduce an action into the next selected folder.
///
/// `nodes` must be the table the action was issued against, not the one
/// the node reducer produced for it.
pub fn update_selected_folder(
    selected_folder: Option<&str>,
    action: &Action,
    nodes: &NodeTable,
) -> Result<Option<NodeId>, StateInvariantError> {
    match action {
        Action::SelectFolder { id } => select_folder(nodes, id).map(Some),
        Action::ChangeFolderOpen { id, open: false } => {
            collapse_folder(selected_folder, nodes, id)
        },
        Action::ChangeFolderOpen { open: true, .. }
        | Action::EditBookmark { .. }
        | Action::RemoveBookmark { .. }
        | Action::RefreshNodes { .. }
        | Action::Unknown => Ok(selected_folder.map(str::to_string)),
    }
}

/// The previous selection never matters; the target must be a folder.
fn select_folder(
    nodes: &NodeTable,
    id: &str,
) -> Result<NodeId, StateInvariantError> {
    let node = nodes.get(id).ok_or_else(|| StateInvariantError::UnknownNode {
        id: id.to_string(),
    })?;
    if !node.is_folder() {
        return Err(StateInvariantError::NotAFolder { id: id.to_string() });
    }
    Ok(id.to_string())
}

/// Collapsing a folder that contains the selection selects that folder.
fn collapse_folder(
    selected_folder: Option<&str>,
    nodes: &NodeTable,
    id: &str,
) -> Result<Option<NodeId>, StateInvariantError> {
    let Some(selected) = selected_folder else {
        return Ok(None);
    };

    if is_ancestor_of(nodes, id, selected)? {
        return Ok(Some(id.to_string()));
    }
    Ok(Some(selected.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        ChangeInfo, change_folder_open, edit_bookmark, remove_bookmark,
        select_folder,
    };
    use crate::model::BookmarkNode;

    fn tree() -> NodeTable {
        [
            BookmarkNode::folder("root", "").with_children(["A", "D"]),
            BookmarkNode::folder("A", "A")
                .with_parent("root")
                .with_children(["B"]),
            BookmarkNode::folder("B", "B")
                .with_parent("A")
                .with_children(["C", "leaf"]),
            BookmarkNode::folder("C", "C").with_parent("B"),
            BookmarkNode::bookmark("leaf", "Leaf", "https://leaf.example")
                .with_parent("B"),
            BookmarkNode::folder("D", "D").with_parent("root"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn given_any_selection_when_folder_selected_then_it_becomes_selected() {
        let nodes = tree();

        let next =
            update_selected_folder(Some("D"), &select_folder("C"), &nodes);

        assert_eq!(next, Ok(Some(String::from("C"))));
    }

    #[test]
    fn given_bookmark_when_selected_then_not_a_folder_is_reported() {
        let result =
            update_selected_folder(None, &select_folder("leaf"), &tree());

        assert_eq!(
            result,
            Err(StateInvariantError::NotAFolder {
                id: String::from("leaf"),
            })
        );
    }

    #[test]
    fn given_selection_below_folder_when_collapsed_then_folder_is_selected() {
        let next = update_selected_folder(
            Some("C"),
            &change_folder_open("A", false),
            &tree(),
        );

        assert_eq!(next, Ok(Some(String::from("A"))));
    }

    #[test]
    fn given_selected_folder_when_itself_collapsed_then_selection_stays() {
        let next = update_selected_folder(
            Some("B"),
            &change_folder_open("B", false),
            &tree(),
        );

        assert_eq!(next, Ok(Some(String::from("B"))));
    }

    #[test]
    fn given_selection_elsewhere_when_folder_collapsed_then_unchanged() {
        let next = update_selected_folder(
            Some("D"),
            &change_folder_open("A", false),
            &tree(),
        );

        assert_eq!(next, Ok(Some(String::from("D"))));
    }

    #[test]
    fn given_selection_below_folder_when_expanded_then_unchanged() {
        let next = update_selected_folder(
            Some("C"),
            &change_folder_open("A", true),
            &tree(),
        );

        assert_eq!(next, Ok(Some(String::from("C"))));
    }

    #[test]
    fn given_no_selection_when_folder_collapsed_then_nothing_selected() {
        let collapse = change_folder_open("A", false);

        let next = update_selected_folder(None, &collapse, &tree());

        assert_eq!(next, Ok(None));
    }

    #[test]
    fn given_node_actions_when_reduced_then_selection_unchanged() {
        let nodes = tree();

        for action in [
            edit_bookmark("C", ChangeInfo::title("x")),
            remove_bookmark("C", "B", 0),
            Action::Unknown,
        ] {
            let next = update_selected_folder(Some("C"), &action, &nodes);
            assert_eq!(next, Ok(Some(String::from("C"))));
        }
    }
}
