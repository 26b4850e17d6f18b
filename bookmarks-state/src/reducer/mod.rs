//! Pure functions computing the next page state from the current one and
//! an action. Reducers never modify their inputs: unchanged slices are
//! returned as clones of the same shared allocation.

mod closed_folders;
mod nodes;
mod selected_folder;

pub use closed_folders::update_closed_folders;
pub use nodes::update_nodes;
pub use selected_folder::update_selected_folder;

use crate::action::Action;
use crate::error::StateInvariantError;
use crate::model::PageState;

/// Root reducer for the bookmarks page.
///
/// Each slice is computed from `state` as it was before the action, so the
/// selection and closed-folder reducers walk the same tree the action was
/// issued against.
pub fn reduce_action(
    state: &PageState,
    action: &Action,
) -> Result<PageState, StateInvariantError> {
    let nodes = update_nodes(state.nodes(), action)?;
    let selected_folder = update_selected_folder(
        state.selected_folder(),
        action,
        state.nodes(),
    )?;
    let closed_folders =
        update_closed_folders(state.closed_folders(), action, state.nodes())?;

    Ok(PageState::new(nodes, selected_folder, closed_folders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        ChangeInfo, change_folder_open, edit_bookmark, refresh_nodes,
        remove_bookmark, select_folder,
    };
    use crate::model::{BookmarkNode, ClosedFolders, NodeTable};

    fn tree() -> NodeTable {
        [
            BookmarkNode::folder("root", "").with_children(["A"]),
            BookmarkNode::folder("A", "A")
                .with_parent("root")
                .with_children(["B"]),
            BookmarkNode::folder("B", "B")
                .with_parent("A")
                .with_children(["C", "n1"]),
            BookmarkNode::folder("C", "C").with_parent("B"),
            BookmarkNode::bookmark("n1", "Link", "https://n1.example")
                .with_parent("B"),
        ]
        .into_iter()
        .collect()
    }

    fn state(selected: Option<&str>, closed: &[(&str, bool)]) -> PageState {
        PageState::new(
            tree(),
            selected.map(str::to_string),
            closed
                .iter()
                .map(|(id, flag)| ((*id).to_string(), *flag))
                .collect(),
        )
    }

    #[test]
    fn given_unknown_action_when_reduced_then_every_slice_is_identical() {
        let before = state(Some("C"), &[("A", true)]);

        let after =
            reduce_action(&before, &Action::Unknown).expect("identity");

        assert!(after.nodes().ptr_eq(before.nodes()));
        assert!(after.closed_folders().ptr_eq(before.closed_folders()));
        assert_eq!(after.selected_folder(), before.selected_folder());
    }

    #[test]
    fn given_edit_when_reduced_then_only_node_slice_changes() {
        let before = state(Some("C"), &[("A", false)]);

        let after = reduce_action(
            &before,
            &edit_bookmark("n1", ChangeInfo::title("Renamed")),
        )
        .expect("edit should apply");

        assert!(!after.nodes().ptr_eq(before.nodes()));
        assert!(after.closed_folders().ptr_eq(before.closed_folders()));
        assert_eq!(
            before.nodes().get("n1").map(|n| n.title()),
            Some("Link"),
            "input state must not change"
        );
    }

    #[test]
    fn given_folder_url_edit_when_reduced_then_node_stays_a_folder() {
        let before = state(None, &[]);

        let edit = edit_bookmark("C", ChangeInfo::url("http://x"));

        let after = reduce_action(&before, &edit).expect("edit should apply");

        assert_eq!(after.nodes().get("C").and_then(|n| n.url()), None);
    }

    #[test]
    fn given_deep_selection_when_ancestor_collapsed_then_ancestor_selected() {
        let before = state(Some("C"), &[]);

        let after = reduce_action(&before, &change_folder_open("A", false))
            .expect("collapse should apply");

        assert_eq!(after.selected_folder(), Some("A"));
        assert!(after.closed_folders().is_closed("A"));
    }

    #[test]
    fn given_closed_ancestors_when_folder_selected_then_they_reopen() {
        let before = state(Some("root"), &[("A", true), ("B", true)]);

        let after = reduce_action(&before, &select_folder("C"))
            .expect("select should apply");

        assert_eq!(after.selected_folder(), Some("C"));
        assert_eq!(after.closed_folders().get("A"), Some(false));
        assert_eq!(after.closed_folders().get("B"), Some(false));
    }

    #[test]
    fn given_refresh_when_reduced_then_slices_use_previous_tree() {
        let before = state(Some("C"), &[]);
        let replacement: NodeTable =
            [BookmarkNode::folder("root", "")].into_iter().collect();

        let after = reduce_action(&before, &refresh_nodes(replacement.clone()))
            .expect("refresh should apply");

        assert!(after.nodes().ptr_eq(&replacement));
        assert_eq!(after.selected_folder(), Some("C"));
    }

    #[test]
    fn given_selection_and_removal_when_reduced_then_children_are_spliced() {
        let before = state(Some("B"), &[]);

        let after = reduce_action(&before, &remove_bookmark("n1", "B", 1))
            .expect("remove should apply");

        assert_eq!(
            after.nodes().get("B").map(|n| n.children().to_vec()),
            Some(vec![String::from("C")])
        );
        assert_eq!(after.selected_folder(), Some("B"));
    }

    #[test]
    fn given_invalid_action_when_reduced_then_error_leaves_input_intact() {
        let before = state(Some("C"), &[]);

        let result = reduce_action(&before, &select_folder("n1"));

        assert_eq!(
            result,
            Err(StateInvariantError::NotAFolder {
                id: String::from("n1"),
            })
        );
        assert_eq!(before.selected_folder(), Some("C"));
    }

    #[test]
    fn given_empty_closed_set_when_collapsing_then_new_set_is_allocated() {
        let before = PageState::new(tree(), None, ClosedFolders::new());

        let after = reduce_action(&before, &change_folder_open("B", false))
            .expect("collapse should apply");

        assert!(!after.closed_folders().ptr_eq(before.closed_folders()));
        assert!(after.nodes().ptr_eq(before.nodes()));
    }

    #[test]
    fn given_dangling_parent_when_it_is_collapsed_then_selection_stays() {
        let nodes: NodeTable =
            [BookmarkNode::folder("C", "C").with_parent("gone")]
                .into_iter()
                .collect();
        let before = PageState::new(
            nodes,
            Some(String::from("C")),
            ClosedFolders::new(),
        );

        let after = reduce_action(&before, &change_folder_open("gone", false))
            .expect("collapse should apply");

        assert_eq!(after.selected_folder(), Some("C"));
        assert!(after.nodes().contains("C"));
    }
}
