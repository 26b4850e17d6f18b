use crate::action::{Action, ChangeInfo};
use crate::error::StateInvariantError;
use crate::model::{BookmarkNode, NodeTable};

/// Reduce an action into a new node table.
///
/// Only the node an action targets is replaced; every other entry stays
/// reference-identical to `nodes`.
pub fn update_nodes(
    nodes: &NodeTable,
    action: &Action,
) -> Result<NodeTable, StateInvariantError> {
    match action {
        Action::EditBookmark { id, change_info } => {
            edit_bookmark(nodes, id, change_info)
        },
        Action::RemoveBookmark {
            id,
            parent_id,
            index,
        } => remove_bookmark(nodes, id, parent_id, *index),
        Action::RefreshNodes { nodes } => Ok(nodes.clone()),
        Action::SelectFolder { .. }
        | Action::ChangeFolderOpen { .. }
        | Action::Unknown => Ok(nodes.clone()),
    }
}

/// Merge `change_info` into the node. A url is never applied to a folder.
fn edit_bookmark(
    nodes: &NodeTable,
    id: &str,
    change_info: &ChangeInfo,
) -> Result<NodeTable, StateInvariantError> {
    let node = nodes.get(id).ok_or_else(|| unknown(id))?;

    let mut edited = BookmarkNode::clone(node);
    if let Some(title) = &change_info.title {
        edited.title = title.clone();
    }
    match (&change_info.url, node.is_folder()) {
        (Some(_), true) => {
            log::warn!("ignoring url change for folder `{id}`");
        },
        (Some(url), false) => edited.url = Some(url.clone()),
        (None, _) => {},
    }

    Ok(nodes.with_node(edited))
}

/// Splice the child at `index` out of the parent's children.
///
/// `index` is authoritative, but the child found there must be `id`:
/// a stale index is rejected instead of removing a sibling.
fn remove_bookmark(
    nodes: &NodeTable,
    id: &str,
    parent_id: &str,
    index: usize,
) -> Result<NodeTable, StateInvariantError> {
    let parent = nodes.get(parent_id).ok_or_else(|| unknown(parent_id))?;

    match parent.children().get(index) {
        Some(found) if found == id => {},
        Some(found) => {
            return Err(StateInvariantError::ChildMismatch {
                parent_id: parent_id.to_string(),
                index,
                expected: id.to_string(),
                found: found.clone(),
            });
        },
        None => {
            return Err(StateInvariantError::IndexOutOfRange {
                parent_id: parent_id.to_string(),
                index,
                len: parent.children().len(),
            });
        },
    }

    let mut edited = BookmarkNode::clone(parent);
    edited.children.remove(index);
    Ok(nodes.with_node(edited))
}

fn unknown(id: &str) -> StateInvariantError {
    StateInvariantError::UnknownNode { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::{
        change_folder_open, edit_bookmark, refresh_nodes, remove_bookmark,
        select_folder,
    };

    fn table() -> NodeTable {
        [
            BookmarkNode::folder("P", "Parent").with_children(["a", "b", "c"]),
            BookmarkNode::bookmark("a", "A", "https://a.example")
                .with_parent("P"),
            BookmarkNode::bookmark("b", "B", "https://b.example")
                .with_parent("P"),
            BookmarkNode::folder("c", "C").with_parent("P"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn given_bookmark_when_edited_then_only_target_is_replaced() {
        let nodes = table();

        let next = update_nodes(
            &nodes,
            &edit_bookmark(
                "a",
                ChangeInfo::title("Renamed").with_url("https://new.example"),
            ),
        )
        .expect("edit should apply");

        let edited = next.get("a").expect("node a");
        assert_eq!(edited.title(), "Renamed");
        assert_eq!(edited.url(), Some("https://new.example"));
        assert_eq!(edited.parent_id(), Some("P"));
        assert_eq!(nodes.get("a").map(|n| n.title()), Some("A"));
        for id in ["P", "b", "c"] {
            assert!(Arc::ptr_eq(
                nodes.get(id).expect("old"),
                next.get(id).expect("new"),
            ));
        }
    }

    #[test]
    fn given_folder_when_url_edit_applied_then_folder_keeps_no_url() {
        let nodes = table();

        let next = update_nodes(
            &nodes,
            &edit_bookmark(
                "c",
                ChangeInfo::title("Still a folder").with_url("http://x"),
            ),
        )
        .expect("edit should apply");

        let folder = next.get("c").expect("node c");
        assert!(folder.is_folder());
        assert_eq!(folder.url(), None);
        assert_eq!(folder.title(), "Still a folder");
    }

    #[test]
    fn given_unknown_node_when_edited_then_error_is_returned() {
        let result = update_nodes(
            &table(),
            &edit_bookmark("zzz", ChangeInfo::title("x")),
        );

        assert_eq!(
            result,
            Err(StateInvariantError::UnknownNode {
                id: String::from("zzz"),
            })
        );
    }

    #[test]
    fn given_middle_child_when_removed_then_siblings_keep_order() {
        let nodes = table();

        let next = update_nodes(&nodes, &remove_bookmark("b", "P", 1))
            .expect("remove should apply");

        let parent = next.get("P").expect("parent");
        assert_eq!(parent.children(), ["a", "c"]);
        assert_eq!(
            nodes.get("P").map(|n| n.children().len()),
            Some(3),
            "source table must not change"
        );
        assert!(Arc::ptr_eq(
            nodes.get("b").expect("old"),
            next.get("b").expect("new"),
        ));
    }

    #[test]
    fn given_stale_index_when_removed_then_mismatch_is_reported() {
        let result = update_nodes(&table(), &remove_bookmark("b", "P", 0));

        assert_eq!(
            result,
            Err(StateInvariantError::ChildMismatch {
                parent_id: String::from("P"),
                index: 0,
                expected: String::from("b"),
                found: String::from("a"),
            })
        );
    }

    #[test]
    fn given_index_past_end_when_removed_then_out_of_range_is_reported() {
        let result = update_nodes(&table(), &remove_bookmark("b", "P", 7));

        assert_eq!(
            result,
            Err(StateInvariantError::IndexOutOfRange {
                parent_id: String::from("P"),
                index: 7,
                len: 3,
            })
        );
    }

    #[test]
    fn given_refresh_when_reduced_then_exact_table_is_returned() {
        let replacement: NodeTable =
            [BookmarkNode::folder("0", "")].into_iter().collect();

        let next = update_nodes(&table(), &refresh_nodes(replacement.clone()))
            .expect("refresh should apply");

        assert!(next.ptr_eq(&replacement));
    }

    #[test]
    fn given_unrelated_actions_when_reduced_then_table_is_identical() {
        let nodes = table();

        for action in [
            select_folder("c"),
            change_folder_open("c", false),
            Action::Unknown,
        ] {
            let next = update_nodes(&nodes, &action).expect("no-op");
            assert!(next.ptr_eq(&nodes), "{} changed nodes", action.name());
        }
    }
}
