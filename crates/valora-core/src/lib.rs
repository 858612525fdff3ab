pub mod account;
pub mod config;
pub mod error;
pub mod state;

pub use error::{Result, StateError};
