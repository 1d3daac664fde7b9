//! CLEF record parsing and normalization.
//!
//! Converts one line of CLEF (newline-delimited JSON with reserved
//! `@`-prefixed keys) into a canonical [`LogRecord`]. The normalizer is
//! total: every input either becomes exactly one record or fails with a
//! [`RecordError`] that the ingestion engine reports per line.

pub mod model;
pub mod normalize;
pub mod template;

// Re-export commonly used types
pub use model::{LogRecord, RecordError};
pub use normalize::{normalize, parse_line};

// Reserved CLEF keys. Removed from the working object before the
// remainder becomes record properties.
pub const TIMESTAMP_KEY: &str = "@t";
pub const MESSAGE_KEY: &str = "@m";
pub const TEMPLATE_KEY: &str = "@mt";
pub const LEVEL_KEY: &str = "@l";
pub const EXCEPTION_KEY: &str = "@x";
pub const EVENT_ID_KEY: &str = "@i";
pub const RENDERINGS_KEY: &str = "@r";

/// Level assigned to records carrying no `@l`.
pub const DEFAULT_LEVEL: &str = "Informational";

/// Appended to the visible first line of a multi-line message.
pub const CONTINUATION_MARKER: &str = " (for following lines see @LogMessage)";

/// Property holding the remainder of a multi-line message, from the first
/// line break onward.
pub const LOG_MESSAGE_KEY: &str = "@LogMessage";

/// Property the `@x` exception payload is copied into.
pub const EXCEPTION_PROPERTY: &str = "Exception";

/// Property carrying the dotted namespace path the filter tree is built from.
pub const SOURCE_CONTEXT_KEY: &str = "SourceContext";
