//! Tri-state selection over the namespace tree.
//!
//! Only leaf membership is stored; every node's status is computed from
//! its leaf descendants on demand. That keeps the invariant structural: a
//! node can never claim `Full` while a leaf under it is unselected.

use std::collections::HashSet;

use super::tree::TreeIndex;

/// Derived status of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Unselected,
    Partial,
    Full,
}

/// User-driven filter state: selected namespace leaves plus selected
/// severity levels. Single-writer by design; concurrent mutation needs
/// external serialization.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    leaves: HashSet<String>,
    levels: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computed status of a node. A leaf is `Full` exactly when selected.
    pub fn status(&self, index: &TreeIndex, node: usize) -> SelectionStatus {
        let leaves = index.leaf_descendants(node);
        let selected = leaves
            .iter()
            .filter(|id| self.leaves.contains(index.path(**id)))
            .count();

        if selected == 0 {
            SelectionStatus::Unselected
        } else if selected == leaves.len() {
            SelectionStatus::Full
        } else {
            SelectionStatus::Partial
        }
    }

    /// Flip an interior node: select every leaf descendant unless the node
    /// is already fully selected, in which case deselect them all.
    pub fn toggle_interior(&mut self, index: &TreeIndex, node: usize) {
        let select = self.status(index, node) != SelectionStatus::Full;
        for leaf in index.leaf_descendants(node) {
            let path = index.path(leaf).to_string();
            if select {
                self.leaves.insert(path);
            } else {
                self.leaves.remove(&path);
            }
        }
    }

    /// Flip a single leaf.
    pub fn toggle_leaf(&mut self, index: &TreeIndex, node: usize) {
        let path = index.path(node).to_string();
        if !self.leaves.remove(&path) {
            self.leaves.insert(path);
        }
    }

    /// The minimal covering path set, in tree order: a fully-selected node
    /// contributes its own path and nothing beneath it; a partially
    /// selected node recurses into its children.
    pub fn resolve_selected_paths(&self, index: &TreeIndex) -> Vec<String> {
        let mut out = Vec::new();
        for root in index.roots() {
            self.resolve_into(index, root, &mut out);
        }
        out
    }

    fn resolve_into(&self, index: &TreeIndex, node: usize, out: &mut Vec<String>) {
        match self.status(index, node) {
            SelectionStatus::Full => out.push(index.path(node).to_string()),
            SelectionStatus::Partial => {
                for child in index.children(node) {
                    self.resolve_into(index, *child, out);
                }
            }
            SelectionStatus::Unselected => {}
        }
    }

    /// Re-derive the leaf set from a serialized path list against the
    /// current tree. Interior paths expand to all their leaf descendants;
    /// paths the tree no longer contains are silently dropped.
    pub fn restore_from_paths(&mut self, index: &TreeIndex, paths: &[String]) {
        self.leaves.clear();
        for path in paths {
            if let Some(node) = index.node_by_path(path) {
                for leaf in index.leaf_descendants(node) {
                    self.leaves.insert(index.path(leaf).to_string());
                }
            }
        }
    }

    /// Flat multi-select over severity levels, insertion-ordered.
    pub fn toggle_level(&mut self, level: &str) {
        if let Some(at) = self.levels.iter().position(|l| l == level) {
            self.levels.remove(at);
        } else {
            self.levels.push(level.to_string());
        }
    }

    pub fn selected_levels(&self) -> &[String] {
        &self.levels
    }

    pub fn has_selection(&self) -> bool {
        !self.leaves.is_empty() || !self.levels.is_empty()
    }

    /// Clear namespace and level selection.
    pub fn reset(&mut self) {
        self.leaves.clear();
        self.levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tree::NamespaceTree;

    fn index(paths: &[&str]) -> TreeIndex {
        let mut tree = NamespaceTree::default();
        for path in paths {
            tree.insert_path(path);
        }
        TreeIndex::build(&tree)
    }

    // ── Tri-state status ─────────────────────────────────────────

    #[test]
    fn test_status_starts_unselected() {
        let idx = index(&["A.B", "A.C"]);
        let selection = FilterSelection::new();
        let a = idx.node_by_path("A").unwrap();
        assert_eq!(selection.status(&idx, a), SelectionStatus::Unselected);
    }

    #[test]
    fn test_one_leaf_makes_parent_partial() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();
        let b = idx.node_by_path("A.B").unwrap();
        let a = idx.node_by_path("A").unwrap();

        selection.toggle_leaf(&idx, b);
        assert_eq!(selection.status(&idx, b), SelectionStatus::Full);
        assert_eq!(selection.status(&idx, a), SelectionStatus::Partial);
    }

    #[test]
    fn test_all_leaves_make_parent_full() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();
        let a = idx.node_by_path("A").unwrap();

        selection.toggle_leaf(&idx, idx.node_by_path("A.B").unwrap());
        selection.toggle_leaf(&idx, idx.node_by_path("A.C").unwrap());
        assert_eq!(selection.status(&idx, a), SelectionStatus::Full);
    }

    #[test]
    fn test_full_iff_every_leaf_selected() {
        let idx = index(&["A.B.C", "A.B.D", "A.E"]);
        let mut selection = FilterSelection::new();
        let a = idx.node_by_path("A").unwrap();
        let b = idx.node_by_path("A.B").unwrap();

        selection.toggle_interior(&idx, b);
        assert_eq!(selection.status(&idx, b), SelectionStatus::Full);
        assert_eq!(selection.status(&idx, a), SelectionStatus::Partial);

        selection.toggle_leaf(&idx, idx.node_by_path("A.E").unwrap());
        assert_eq!(selection.status(&idx, a), SelectionStatus::Full);
    }

    // ── Toggles ──────────────────────────────────────────────────

    #[test]
    fn test_toggle_interior_selects_then_deselects() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();
        let a = idx.node_by_path("A").unwrap();

        selection.toggle_interior(&idx, a);
        assert_eq!(selection.status(&idx, a), SelectionStatus::Full);

        selection.toggle_interior(&idx, a);
        assert_eq!(selection.status(&idx, a), SelectionStatus::Unselected);
    }

    #[test]
    fn test_toggle_interior_from_partial_selects_all() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();
        let a = idx.node_by_path("A").unwrap();

        selection.toggle_leaf(&idx, idx.node_by_path("A.B").unwrap());
        selection.toggle_interior(&idx, a);
        assert_eq!(selection.status(&idx, a), SelectionStatus::Full);
    }

    // ── Path resolution ──────────────────────────────────────────

    #[test]
    fn test_resolve_collapses_full_subtree() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();

        selection.toggle_interior(&idx, idx.node_by_path("A").unwrap());
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["A"]);
    }

    #[test]
    fn test_resolve_recurses_into_partial() {
        let idx = index(&["A.B", "A.C", "A.D"]);
        let mut selection = FilterSelection::new();

        selection.toggle_leaf(&idx, idx.node_by_path("A.B").unwrap());
        selection.toggle_leaf(&idx, idx.node_by_path("A.D").unwrap());
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["A.B", "A.D"]);
    }

    #[test]
    fn test_resolve_includes_root_leaf() {
        let idx = index(&["Solo", "A.B"]);
        let mut selection = FilterSelection::new();

        selection.toggle_leaf(&idx, idx.node_by_path("Solo").unwrap());
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["Solo"]);
    }

    #[test]
    fn test_resolve_never_emits_parent_and_child() {
        let idx = index(&["A.B.C", "A.B.D", "A.E"]);
        let mut selection = FilterSelection::new();

        selection.toggle_interior(&idx, idx.node_by_path("A.B").unwrap());
        let paths = selection.resolve_selected_paths(&idx);
        assert_eq!(paths, vec!["A.B"]);

        selection.toggle_leaf(&idx, idx.node_by_path("A.E").unwrap());
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["A"]);
    }

    // ── Restore ──────────────────────────────────────────────────

    #[test]
    fn test_restore_round_trip() {
        let idx = index(&["A.B.C", "A.B.D", "A.E", "F"]);
        let mut selection = FilterSelection::new();

        selection.toggle_interior(&idx, idx.node_by_path("A.B").unwrap());
        selection.toggle_leaf(&idx, idx.node_by_path("F").unwrap());
        let paths = selection.resolve_selected_paths(&idx);

        let mut restored = FilterSelection::new();
        restored.restore_from_paths(&idx, &paths);
        assert_eq!(
            restored.resolve_selected_paths(&idx),
            selection.resolve_selected_paths(&idx)
        );
    }

    #[test]
    fn test_restore_expands_interior_path() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();

        selection.restore_from_paths(&idx, &["A".to_string()]);
        assert_eq!(
            selection.status(&idx, idx.node_by_path("A").unwrap()),
            SelectionStatus::Full
        );
    }

    #[test]
    fn test_restore_drops_stale_paths() {
        let idx = index(&["A.B"]);
        let mut selection = FilterSelection::new();

        selection.restore_from_paths(&idx, &["Gone.Node".to_string(), "A.B".to_string()]);
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["A.B"]);
    }

    #[test]
    fn test_restore_replaces_prior_selection() {
        let idx = index(&["A.B", "A.C"]);
        let mut selection = FilterSelection::new();

        selection.toggle_leaf(&idx, idx.node_by_path("A.B").unwrap());
        selection.restore_from_paths(&idx, &["A.C".to_string()]);
        assert_eq!(selection.resolve_selected_paths(&idx), vec!["A.C"]);
    }

    // ── Levels and reset ─────────────────────────────────────────

    #[test]
    fn test_level_toggle_is_flat_multi_select() {
        let mut selection = FilterSelection::new();
        selection.toggle_level("Error");
        selection.toggle_level("Warning");
        assert_eq!(selection.selected_levels(), ["Error", "Warning"]);

        selection.toggle_level("Error");
        assert_eq!(selection.selected_levels(), ["Warning"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let idx = index(&["A.B"]);
        let mut selection = FilterSelection::new();

        selection.toggle_leaf(&idx, idx.node_by_path("A.B").unwrap());
        selection.toggle_level("Error");
        assert!(selection.has_selection());

        selection.reset();
        assert!(!selection.has_selection());
        assert!(selection.resolve_selected_paths(&idx).is_empty());
        assert!(selection.selected_levels().is_empty());
    }
}
