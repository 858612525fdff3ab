//! Storage layer for atomic file operations and blob encoding.

mod atomic_json;
pub mod blob;
mod blob_store;

pub use atomic_json::AtomicJsonFile;
pub use blob_store::{BlobStore, file_name_for_key};
