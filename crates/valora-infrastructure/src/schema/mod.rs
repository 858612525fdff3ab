//! Post-migration schema validation.

mod root_state;
mod validator;

pub use root_state::root_state_schema;
pub use validator::{SchemaValidator, ValidationReport, Violation};
