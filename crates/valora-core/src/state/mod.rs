//! Persisted state tree and its version tag.

pub mod model;
pub mod version;

pub use model::{PERSIST_KEY, PersistMeta, PersistedState, json_type_name};
pub use version::SchemaVersion;
