//! Validation of a migrated tree against a compiled JSON Schema.
//!
//! Not fail-fast: every violation is collected with the JSON pointer of the
//! node it was found at.

use serde_json::Value;
use std::fmt;
use valora_core::error::{Result, StateError};
use valora_core::state::PersistedState;

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// JSON pointer of the offending node; empty for the root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// First `limit` violations joined with `; `, plus a count of the rest.
    pub fn summary(&self, limit: usize) -> String {
        let mut parts: Vec<String> = self
            .violations
            .iter()
            .take(limit)
            .map(|v| v.to_string())
            .collect();
        if self.violations.len() > limit {
            parts.push(format!("... {} more", self.violations.len() - limit));
        }
        parts.join("; ")
    }
}

/// A schema document compiled once and reused for every check.
pub struct SchemaValidator {
    schema: Value,
    compiled: jsonschema::Validator,
}

impl SchemaValidator {
    pub fn new(schema: Value) -> Result<Self> {
        let compiled = jsonschema::validator_for(&schema)
            .map_err(|e| StateError::internal(format!("invalid state schema: {}", e)))?;
        Ok(Self { schema, compiled })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn validate(&self, value: &Value) -> ValidationReport {
        let violations = self
            .compiled
            .iter_errors(value)
            .map(|error| Violation {
                path: error.instance_path().to_string(),
                message: error.to_string(),
            })
            .collect();
        ValidationReport { violations }
    }

    pub fn validate_state(&self, state: &PersistedState) -> ValidationReport {
        self.validate(&Value::Object(state.as_map().clone()))
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
