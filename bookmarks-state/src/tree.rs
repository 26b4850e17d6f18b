use std::collections::HashSet;

use crate::error::StateInvariantError;
use crate::model::NodeTable;

/// Iterator over a node and its ancestors, nearest first.
///
/// Only ids present in the table are yielded: the walk ends at a node
/// without a parent or before a parent id missing from the table.
/// Revisiting a node yields a single
/// [`StateInvariantError::ParentCycle`] and ends the walk.
pub(crate) struct ParentWalk<'a> {
    nodes: &'a NodeTable,
    next: Option<&'a str>,
    visited: HashSet<&'a str>,
}

/// Walk from `id` (inclusive) up through its `parent_id` links. Yields
/// nothing when `id` is unknown.
pub(crate) fn walk_up<'a>(nodes: &'a NodeTable, id: &'a str) -> ParentWalk<'a> {
    ParentWalk {
        nodes,
        next: Some(id),
        visited: HashSet::new(),
    }
}

impl<'a> Iterator for ParentWalk<'a> {
    type Item = Result<&'a str, StateInvariantError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let node = self.nodes.get(current)?;
        if !self.visited.insert(current) {
            return Some(Err(StateInvariantError::ParentCycle {
                id: current.to_string(),
            }));
        }

        self.next = node.parent_id();
        Some(Ok(current))
    }
}

/// Return whether `ancestor_id` equals `child_id` or is one of its
/// ancestors.
pub(crate) fn is_ancestor_of(
    nodes: &NodeTable,
    ancestor_id: &str,
    child_id: &str,
) -> Result<bool, StateInvariantError> {
    for step in walk_up(nodes, child_id) {
        if step? == ancestor_id {
            return Ok(true);
        }
    }
    Ok(false)
}
