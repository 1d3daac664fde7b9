//! The hierarchical filter engine.
//!
//! A namespace tree is derived from the dotted `SourceContext` paths found
//! in ingested records; the user narrows the displayed set through
//! tri-state selection over that tree plus a flat multi-select over
//! severity levels. Both are combined by logical AND when a record is
//! tested, together with an optional free-text search.

pub mod index;
pub mod search;
pub mod selection;
pub mod tree;

// Re-export commonly used types
pub use index::{build_index, FilterIndex};
pub use search::{SearchError, SearchFilter};
pub use selection::{FilterSelection, SelectionStatus};
pub use tree::{NamespaceNode, NamespaceTree, TreeIndex};

use crate::record::LogRecord;

/// Whether a record passes the active structural filter.
///
/// `paths` is the resolved minimal covering set from
/// [`FilterSelection::resolve_selected_paths`]; an empty set means "no
/// namespace restriction", and likewise for `levels`. Context matching is
/// by string prefix on the dot-joined path.
pub fn record_passes(record: &LogRecord, paths: &[String], levels: &[String]) -> bool {
    let namespace_ok = paths.is_empty()
        || record
            .source_context()
            .map(|context| paths.iter().any(|p| context.starts_with(p.as_str())))
            .unwrap_or(false);

    let level_ok = levels.is_empty() || levels.iter().any(|l| l == &record.level);

    namespace_ok && level_ok
}
