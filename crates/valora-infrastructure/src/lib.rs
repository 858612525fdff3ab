pub mod account_guard;
pub mod config_service;
pub mod defaults;
pub mod file_account_repository;
pub mod initial_state;
pub mod memory_account_repository;
pub mod migration;
pub mod paths;
pub mod persist;
pub mod schema;
pub mod storage;
pub mod store;

pub use crate::account_guard::{AccountGuard, GuardVerdict};
pub use crate::config_service::ConfigService;
pub use crate::file_account_repository::FileAccountRepository;
pub use crate::initial_state::initial_root_state;
pub use crate::memory_account_repository::InMemoryAccountRepository;
pub use crate::paths::ValoraPaths;
pub use crate::persist::{
    HydrationOutcome, HydrationStatus, PersistenceAdapter, ResetReason, RestoredState,
};
pub use crate::store::StateStore;
