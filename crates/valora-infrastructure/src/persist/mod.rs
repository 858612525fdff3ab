//! Persistence adapter: hydration at startup and writes afterwards.

mod hydrate;
mod reconcile;

pub use hydrate::{
    HydrationOutcome, HydrationStatus, PersistenceAdapter, ResetReason, RestoredState,
};
pub use reconcile::{reconcile, strip_blacklisted};
