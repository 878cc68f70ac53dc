use serde_json::Value;

use crate::error::StoreError;

/// Shallow-merge `patch` onto `current`.
///
/// Top-level keys present in the patch replace the corresponding keys of the
/// current state; everything nested under a patched key is replaced wholesale.
/// Callers that want to keep deeper levels must spread them into the patch
/// themselves.
pub(crate) fn shallow_merge(current: Value, patch: Value) -> Result<Value, StoreError> {
    let mut base = match current {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::InvalidPatch {
                kind: value_kind(&other),
            })
        }
    };

    match patch {
        Value::Object(fields) => {
            for (key, value) in fields {
                base.insert(key, value);
            }
            Ok(Value::Object(base))
        }
        other => Err(StoreError::InvalidPatch {
            kind: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
