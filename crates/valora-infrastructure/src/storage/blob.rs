//! Encoding of the state tree as a storage blob.
//!
//! The `redux-persist` format stores every top-level slice as a JSON string
//! inside the outer object; `plain` stores the tree as is. Reads detect the
//! format, so a store can switch formats between writes.

use serde_json::{Map, Value};
use valora_core::config::BlobFormat;
use valora_core::error::{Result, StateError};
use valora_core::state::{PersistedState, json_type_name};

pub fn encode(state: &PersistedState, format: BlobFormat) -> Result<String> {
    match format {
        BlobFormat::Plain => Ok(serde_json::to_string(state)?),
        BlobFormat::ReduxPersist => {
            let mut outer = Map::new();
            for (name, slice) in state.as_map() {
                outer.insert(name.clone(), Value::String(serde_json::to_string(slice)?));
            }
            Ok(serde_json::to_string(&Value::Object(outer))?)
        }
    }
}

/// Decodes a blob, reporting which format it was in.
///
/// A non-empty object whose values are all strings holding valid JSON is
/// read as `redux-persist`; anything else that is an object is `plain`.
pub fn decode(raw: &str) -> Result<(PersistedState, BlobFormat)> {
    let outer = match serde_json::from_str::<Value>(raw)? {
        Value::Object(outer) => outer,
        other => {
            return Err(StateError::invalid_state(format!(
                "state blob must be an object, found {}",
                json_type_name(&other)
            )));
        }
    };

    if let Some(inner) = decode_nested(&outer) {
        return Ok((PersistedState::from_value(Value::Object(inner))?, BlobFormat::ReduxPersist));
    }
    Ok((PersistedState::from_value(Value::Object(outer))?, BlobFormat::Plain))
}

fn decode_nested(outer: &Map<String, Value>) -> Option<Map<String, Value>> {
    if outer.is_empty() {
        return None;
    }
    outer
        .iter()
        .map(|(name, value)| {
            let encoded = value.as_str()?;
            let slice = serde_json::from_str::<Value>(encoded).ok()?;
            Some((name.clone(), slice))
        })
        .collect()
}
