//! The filter index builder.
//!
//! Derives the namespace forest and the set of distinct severity levels
//! from a batch of normalized records. Accumulation goes through an
//! insertion-ordered JSON map mirroring the source property's shape, so
//! nested structures expand into the tree exactly as they appear and two
//! builds over the same input always produce the same result.

use serde_json::{Map, Value};

use crate::record::LogRecord;

use super::tree::NamespaceTree;

/// The rebuilt-per-batch filter inputs: the namespace tree and the
/// distinct levels observed, both in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FilterIndex {
    pub tree: NamespaceTree,
    pub levels: Vec<String>,
}

/// Build the filter index over a batch of records.
pub fn build_index(records: &[LogRecord]) -> FilterIndex {
    let mut accum: Map<String, Value> = Map::new();
    let mut levels: Vec<String> = Vec::new();

    for record in records {
        if let Some(context) = record.source_context() {
            insert_context(&mut accum, context);
        }
        if !levels.iter().any(|l| l == &record.level) {
            levels.push(record.level.clone());
        }
    }

    FilterIndex {
        tree: NamespaceTree::from_map(&accum),
        levels,
    }
}

fn insert_context(map: &mut Map<String, Value>, context: &str) {
    let mut current = map;
    for segment in context.split('.') {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match slot.as_object_mut() {
            Some(next) => current = next,
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::normalize;
    use serde_json::json;

    fn record(context: &str, level: &str) -> LogRecord {
        normalize(json!({
            "@m": "msg",
            "@l": level,
            "SourceContext": context
        }))
        .unwrap()
    }

    #[test]
    fn test_tree_built_in_first_seen_order() {
        let records = vec![
            record("A.B", "Informational"),
            record("A.C", "Informational"),
            record("A.B", "Informational"),
        ];
        let index = build_index(&records);

        assert_eq!(index.tree.roots.len(), 1);
        let root = &index.tree.roots[0];
        assert_eq!(root.label, "A");
        let labels: Vec<&str> = root.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "C"]);
    }

    #[test]
    fn test_levels_distinct_first_seen() {
        let records = vec![
            record("A", "Warning"),
            record("B", "Informational"),
            record("C", "Warning"),
            record("D", "Error"),
        ];
        let index = build_index(&records);
        assert_eq!(index.levels, vec!["Warning", "Informational", "Error"]);
    }

    #[test]
    fn test_records_without_context_still_contribute_levels() {
        let records = vec![normalize(json!({ "@m": "x", "@l": "Debug" })).unwrap()];
        let index = build_index(&records);
        assert!(index.tree.roots.is_empty());
        assert_eq!(index.levels, vec!["Debug"]);
    }

    #[test]
    fn test_non_string_context_ignored() {
        let records = vec![normalize(json!({ "@m": "x", "SourceContext": 42 })).unwrap()];
        let index = build_index(&records);
        assert!(index.tree.roots.is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            record("S.T.U", "A"),
            record("S.V", "B"),
            record("W", "A"),
        ];
        let first = build_index(&records);
        let second = build_index(&records);
        assert_eq!(first.tree, second.tree);
        assert_eq!(first.levels, second.levels);
    }
}
