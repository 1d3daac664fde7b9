use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::SOURCE_CONTEXT_KEY;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Record is not a JSON object")]
    NotAnObject,

    /// Neither `@m` nor `@mt` present, or the resolved message is empty.
    /// The original viewer faulted here; we reject the line instead so a
    /// content-free record never enters a batch.
    #[error("Record carries no message (@m) and no template (@mt)")]
    MissingMessage,

    #[error("Reserved field {0} has an unsupported type")]
    InvalidField(&'static str),
}

/// One normalized log entry.
///
/// `rendered_message` is always non-empty and single-line; multi-line
/// messages are truncated at the first line break, with the remainder
/// stored under the `@LogMessage` property.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// From `@t`; ingestion wall-clock time when absent or unparsable.
    pub timestamp: DateTime<Utc>,

    /// Final human-readable message.
    pub rendered_message: String,

    /// Original `@mt` template, if the source carried one.
    pub message_template: Option<String>,

    /// Severity label; `"Informational"` when the source has no `@l`.
    pub level: String,

    /// Opaque `@x` exception payload.
    pub exception: Option<Value>,

    /// Opaque `@i` event id.
    pub event_id: Option<Value>,

    /// `@r` pre-rendered strings, order preserved.
    pub renderings: Option<Vec<String>>,

    /// Every non-reserved source field, insertion-ordered. Also holds the
    /// synthetic `Exception` and `@LogMessage` entries.
    pub properties: Map<String, Value>,
}

impl LogRecord {
    /// The dotted namespace path used by the filter tree, when present
    /// and a string.
    pub fn source_context(&self) -> Option<&str> {
        self.properties.get(SOURCE_CONTEXT_KEY).and_then(Value::as_str)
    }
}
