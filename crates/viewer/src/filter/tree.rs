//! The namespace tree and its flattened index.
//!
//! The tree itself is owned top-down: every node owns its children and is
//! rebuilt, never mutated, when a new batch of records arrives. Tri-state
//! propagation needs to walk from leaves back to the root, so selection
//! logic runs over [`TreeIndex`], a preorder flattening with
//! parent-by-index links, keeping ownership in the tree unidirectional.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// One tree node: a path segment (or leaf value) and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNode {
    pub label: String,
    pub children: Vec<NamespaceNode>,
}

impl NamespaceNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// The namespace forest. Root order, like child order, is first-seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTree {
    pub roots: Vec<NamespaceNode>,
}

impl NamespaceTree {
    /// Insert a dotted path, creating missing nodes in first-seen order.
    pub fn insert_path(&mut self, path: &str) {
        let mut children = &mut self.roots;
        for segment in path.split('.') {
            let position = children.iter().position(|n| n.label == segment);
            let index = match position {
                Some(i) => i,
                None => {
                    children.push(NamespaceNode::leaf(segment));
                    children.len() - 1
                }
            };
            children = &mut children[index].children;
        }
    }

    /// Build a forest mirroring a nested JSON map, one node per key.
    ///
    /// Object values recurse into children; a non-null, non-object value
    /// becomes a leaf labelled by the value's string form. This mirrors
    /// hierarchical fields whose parts map to arbitrary nested shapes, not
    /// only flat dotted strings.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            roots: forest_from_map(map),
        }
    }
}

fn forest_from_map(map: &Map<String, Value>) -> Vec<NamespaceNode> {
    map.iter()
        .map(|(key, value)| match value {
            Value::Object(children) => NamespaceNode {
                label: key.clone(),
                children: forest_from_map(children),
            },
            Value::Null => NamespaceNode::leaf(key.clone()),
            Value::String(s) => NamespaceNode::leaf(s.clone()),
            other => NamespaceNode::leaf(other.to_string()),
        })
        .collect()
}

/// A flattened, preorder view of a [`NamespaceTree`].
///
/// Node identity is positional; the index is rebuilt together with the
/// tree. Paths are dot-joined labels and uniquely identify a node.
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub label: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub path: String,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    nodes: Vec<FlatNode>,
    by_path: HashMap<String, usize>,
}

impl TreeIndex {
    pub fn build(tree: &NamespaceTree) -> Self {
        let mut index = Self::default();
        for root in &tree.roots {
            index.push_subtree(root, None);
        }
        index
    }

    fn push_subtree(&mut self, node: &NamespaceNode, parent: Option<usize>) -> usize {
        let path = match parent {
            Some(p) => format!("{}.{}", self.nodes[p].path, node.label),
            None => node.label.clone(),
        };
        let depth = parent.map(|p| self.nodes[p].depth + 1).unwrap_or(0);

        let id = self.nodes.len();
        self.nodes.push(FlatNode {
            label: node.label.clone(),
            depth,
            parent,
            path: path.clone(),
            children: Vec::new(),
        });
        self.by_path.insert(path, id);

        for child in &node.children {
            let child_id = self.push_subtree(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> &FlatNode {
        &self.nodes[id]
    }

    pub fn path(&self, id: usize) -> &str {
        &self.nodes[id].path
    }

    pub fn node_by_path(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn is_leaf(&self, id: usize) -> bool {
        self.nodes[id].children.is_empty()
    }

    pub fn children(&self, id: usize) -> &[usize] {
        &self.nodes[id].children
    }

    /// Root node ids in tree order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Leaf descendants of a node in tree order; a leaf yields itself.
    pub fn leaf_descendants(&self, id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out);
        out
    }

    fn collect_leaves(&self, id: usize, out: &mut Vec<usize>) {
        if self.is_leaf(id) {
            out.push(id);
            return;
        }
        for child in &self.nodes[id].children {
            self.collect_leaves(*child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_preserves_first_seen_order() {
        let mut tree = NamespaceTree::default();
        tree.insert_path("A.B");
        tree.insert_path("A.C");
        tree.insert_path("A.B");

        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert_eq!(root.label, "A");
        let labels: Vec<&str> = root.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "C"]);
    }

    #[test]
    fn test_multiple_roots_in_order() {
        let mut tree = NamespaceTree::default();
        tree.insert_path("Z");
        tree.insert_path("A.X");
        tree.insert_path("Z.Y");

        let labels: Vec<&str> = tree.roots.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Z", "A"]);
        assert_eq!(tree.roots[0].children[0].label, "Y");
    }

    #[test]
    fn test_from_map_expands_nested_values() {
        let map = match json!({
            "App": { "Orders": {}, "Users": { "Admin": {} } },
            "Tag": "standalone"
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let tree = NamespaceTree::from_map(&map);

        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].label, "App");
        assert_eq!(tree.roots[0].children.len(), 2);
        assert_eq!(tree.roots[0].children[1].children[0].label, "Admin");
        // Non-object value becomes the leaf's label
        assert_eq!(tree.roots[1].label, "standalone");
    }

    #[test]
    fn test_index_paths_and_parents() {
        let mut tree = NamespaceTree::default();
        tree.insert_path("A.B.C");
        tree.insert_path("A.D");
        let index = TreeIndex::build(&tree);

        let a = index.node_by_path("A").unwrap();
        let b = index.node_by_path("A.B").unwrap();
        let c = index.node_by_path("A.B.C").unwrap();
        let d = index.node_by_path("A.D").unwrap();

        assert_eq!(index.node(a).parent, None);
        assert_eq!(index.node(b).parent, Some(a));
        assert_eq!(index.node(c).parent, Some(b));
        assert_eq!(index.node(d).parent, Some(a));
        assert_eq!(index.node(c).depth, 2);
        assert!(index.is_leaf(c));
        assert!(index.is_leaf(d));
        assert!(!index.is_leaf(a));
    }

    #[test]
    fn test_leaf_descendants_in_tree_order() {
        let mut tree = NamespaceTree::default();
        tree.insert_path("A.B.C");
        tree.insert_path("A.D");
        let index = TreeIndex::build(&tree);

        let a = index.node_by_path("A").unwrap();
        let leaves: Vec<&str> = index
            .leaf_descendants(a)
            .into_iter()
            .map(|id| index.path(id))
            .collect();
        assert_eq!(leaves, vec!["A.B.C", "A.D"]);
    }

    #[test]
    fn test_leaf_yields_itself() {
        let mut tree = NamespaceTree::default();
        tree.insert_path("Solo");
        let index = TreeIndex::build(&tree);
        let solo = index.node_by_path("Solo").unwrap();
        assert_eq!(index.leaf_descendants(solo), vec![solo]);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let mut tree = NamespaceTree::default();
        for path in ["M.N", "M.O", "P", "M.N.Q"] {
            tree.insert_path(path);
        }
        let first = TreeIndex::build(&tree);
        let second = TreeIndex::build(&tree);
        let paths = |idx: &TreeIndex| -> Vec<String> {
            (0..idx.len()).map(|i| idx.path(i).to_string()).collect()
        };
        assert_eq!(paths(&first), paths(&second));
    }
}
