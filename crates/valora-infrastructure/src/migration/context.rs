use chrono::{DateTime, Utc};

/// Inputs a migration step may need from outside the tree.
///
/// Captured once when the registry is built so the steps themselves stay
/// pure and replayable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationContext {
    pub now: DateTime<Utc>,
}

impl MigrationContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Context stamped with the current wall clock.
    pub fn current() -> Self {
        Self { now: Utc::now() }
    }

    pub fn now_millis(&self) -> i64 {
        self.now.timestamp_millis()
    }
}

impl Default for MigrationContext {
    fn default() -> Self {
        Self::current()
    }
}
