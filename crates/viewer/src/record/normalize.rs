//! The record normalizer: one parsed JSON object in, one [`LogRecord`] out.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::model::{LogRecord, RecordError};
use super::template;
use super::{
    CONTINUATION_MARKER, DEFAULT_LEVEL, EVENT_ID_KEY, EXCEPTION_KEY, EXCEPTION_PROPERTY,
    LEVEL_KEY, LOG_MESSAGE_KEY, MESSAGE_KEY, RENDERINGS_KEY, TEMPLATE_KEY, TIMESTAMP_KEY,
};

/// Parse one CLEF line: JSON first, then normalization.
pub fn parse_line(raw: &[u8]) -> Result<LogRecord, RecordError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| RecordError::Json(e.to_string()))?;
    normalize(value)
}

/// Normalize one parsed JSON object into a [`LogRecord`].
///
/// Reserved `@`-keys are extracted and removed; the remainder of the object
/// becomes `properties` in source order. When `@m` is absent the `@mt`
/// template is rendered against the properties. The first line break
/// truncates the message, moving the remainder into `@LogMessage`.
pub fn normalize(value: Value) -> Result<LogRecord, RecordError> {
    let Value::Object(mut obj) = value else {
        return Err(RecordError::NotAnObject);
    };

    let timestamp = take_timestamp(&mut obj);
    let rendered = take_scalar(&mut obj, MESSAGE_KEY)?;
    let message_template = take_scalar(&mut obj, TEMPLATE_KEY)?;
    let level = take_scalar(&mut obj, LEVEL_KEY)?.unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let exception = take_opaque(&mut obj, EXCEPTION_KEY);
    let event_id = take_opaque(&mut obj, EVENT_ID_KEY);
    let renderings = take_renderings(&mut obj)?;

    // Remainder is the property map; the exception payload is mirrored into
    // it before template rendering so {Exception} tokens can resolve.
    let mut properties = obj;
    if let Some(x) = &exception {
        properties.insert(EXCEPTION_PROPERTY.to_string(), x.clone());
    }

    let mut rendered_message = match (rendered, &message_template) {
        (Some(m), _) => m,
        (None, Some(t)) => template::render(t, &properties),
        (None, None) => return Err(RecordError::MissingMessage),
    };
    if rendered_message.is_empty() {
        return Err(RecordError::MissingMessage);
    }

    if let Some(break_at) = rendered_message.find(|c| c == '\r' || c == '\n') {
        let remainder = rendered_message[break_at..].to_string();
        rendered_message.truncate(break_at);
        rendered_message.push_str(CONTINUATION_MARKER);
        properties.insert(LOG_MESSAGE_KEY.to_string(), Value::String(remainder));
    }

    Ok(LogRecord {
        timestamp,
        rendered_message,
        message_template,
        level,
        exception,
        event_id,
        renderings,
        properties,
    })
}

/// `@t` as RFC-3339; absent or unparsable falls back to wall-clock time.
fn take_timestamp(obj: &mut Map<String, Value>) -> DateTime<Utc> {
    match obj.remove(TIMESTAMP_KEY) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        _ => Utc::now(),
    }
}

/// Remove a reserved key whose value must be scalar when present.
/// `null` counts as absent; arrays and objects are rejected.
fn take_scalar(
    obj: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, RecordError> {
    match obj.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::Bool(false)) => Ok(Some("false".to_string())),
        Some(_) => Err(RecordError::InvalidField(key)),
    }
}

/// Remove a reserved key kept as an opaque payload. `null` counts as absent.
fn take_opaque(obj: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match obj.remove(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

/// `@r`: an array of pre-rendered strings. Non-string items keep their
/// compact JSON form.
fn take_renderings(obj: &mut Map<String, Value>) -> Result<Option<Vec<String>>, RecordError> {
    match obj.remove(RENDERINGS_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        )),
        Some(_) => Err(RecordError::InvalidField(RENDERINGS_KEY)),
    }
}
