//! Wallet accounts held in secure storage.

pub mod model;
pub mod repository;

pub use model::{StoredAccount, normalize_address};
pub use repository::AccountRepository;
