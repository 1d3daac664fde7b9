//! Message template rendering.
//!
//! Substitutes `{name}` tokens in a CLEF `@mt` template with values from
//! the record's properties. Tokens are matched non-greedily: a token runs
//! from a `{` to the next `}` with no nesting.

use serde_json::{Map, Value};

/// Render a message template against the given properties.
///
/// Substitution rules, per token:
/// - a property with the token's name renders in place of the token;
/// - a token whose name contains `@` and has no matching property renders
///   as the literal token name (structural placeholder convention);
/// - any other unmatched token is left untouched, braces included.
pub fn render(template: &str, properties: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            // No closing brace anywhere after this point
            out.push_str(&rest[open..]);
            return out;
        };

        let inner = &after[..close];
        // Mirrors the token-name cleanup of the source format: braces are
        // stripped from the matched text before the property lookup.
        let name: String = inner.chars().filter(|c| *c != '{').collect();

        match properties.get(&name) {
            Some(value) if !value.is_null() => out.push_str(&render_value(value)),
            _ if name.contains('@') => out.push_str(&name),
            _ => {
                out.push('{');
                out.push_str(inner);
                out.push('}');
            }
        }

        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Display form of a property value inside a rendered message.
/// Nested structures render as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        other => other.to_string(),
    }
}
