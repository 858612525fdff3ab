//! The persisted state tree.
//!
//! The tree is a JSON object with one sub-tree ("slice") per feature area plus
//! the `_persist` bookkeeping entry. Slices are deliberately untyped here: each
//! schema version has a different shape, and the migration chain is what moves
//! a tree from one shape to the next.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::version::SchemaVersion;
use crate::error::{Result, StateError};

/// Key of the bookkeeping entry at the root of the tree.
pub const PERSIST_KEY: &str = "_persist";

/// Contents of `_persist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistMeta {
    pub version: SchemaVersion,
    #[serde(default)]
    pub rehydrated: bool,
}

impl PersistMeta {
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            rehydrated: false,
        }
    }
}

/// A versioned, nested key-value tree as written to device storage.
///
/// Mutating helpers follow object-spread semantics: touching a slice that is
/// missing (or is not an object) materializes it as an empty object, and
/// removing a field is how a field gets "set to undefined".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedState {
    root: Map<String, Value>,
}

impl PersistedState {
    /// Creates an empty tree without `_persist`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a raw JSON value. The root must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(StateError::invalid_state(format!(
                "persisted state root must be an object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Reads the stored version.
    ///
    /// Returns `Ok(None)` when `_persist` or its version is absent and an error
    /// when the version is present but not an integer.
    pub fn version(&self) -> Result<Option<SchemaVersion>> {
        let Some(version) = self.root.get(PERSIST_KEY).and_then(|meta| meta.get("version")) else {
            return Ok(None);
        };
        if version.is_null() {
            return Ok(None);
        }
        version
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(|v| Some(SchemaVersion::new(v)))
            .ok_or_else(|| {
                StateError::invalid_state(format!("_persist.version is not an integer: {}", version))
            })
    }

    /// The version migrations should start from: the stored one, or the default.
    pub fn stored_version(&self) -> Result<SchemaVersion> {
        Ok(self.version()?.unwrap_or_default())
    }

    pub fn meta(&self) -> Option<PersistMeta> {
        self.root
            .get(PERSIST_KEY)
            .and_then(|meta| serde_json::from_value(meta.clone()).ok())
    }

    pub fn set_meta(&mut self, meta: PersistMeta) {
        self.root.insert(
            PERSIST_KEY.to_string(),
            serde_json::json!({ "version": meta.version.get(), "rehydrated": meta.rehydrated }),
        );
    }

    /// Names of all slices, `_persist` excluded.
    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.root
            .keys()
            .map(String::as_str)
            .filter(|name| *name != PERSIST_KEY)
    }

    pub fn contains_slice(&self, name: &str) -> bool {
        self.root.contains_key(name)
    }

    pub fn slice_value(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// The slice as an object, if it is one.
    pub fn slice(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    /// Mutable access to a slice, materializing it as `{}` when needed.
    pub fn slice_mut(&mut self, name: &str) -> &mut Map<String, Value> {
        let entry = self
            .root
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(map) => map,
            _ => unreachable!("slice was just replaced with an object"),
        }
    }

    pub fn set_slice(&mut self, name: &str, value: Value) {
        self.root.insert(name.to_string(), value);
    }

    pub fn remove_slice(&mut self, name: &str) -> Option<Value> {
        self.root.remove(name)
    }

    pub fn field(&self, slice: &str, key: &str) -> Option<&Value> {
        self.slice(slice).and_then(|map| map.get(key))
    }

    pub fn set_field(&mut self, slice: &str, key: &str, value: impl Into<Value>) {
        self.slice_mut(slice).insert(key.to_string(), value.into());
    }

    pub fn remove_field(&mut self, slice: &str, key: &str) -> Option<Value> {
        self.slice_mut(slice).remove(key)
    }

    /// Removes every listed key from a slice (materializing the slice).
    pub fn remove_fields(&mut self, slice: &str, keys: &[&str]) {
        let map = self.slice_mut(slice);
        for key in keys {
            map.remove(*key);
        }
    }

    /// JSON-pointer lookup from the root, e.g. `/web3/account`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return None;
        }
        let mut segments = pointer.trim_start_matches('/').split('/');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// Human-readable JSON type name used in error and violation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
