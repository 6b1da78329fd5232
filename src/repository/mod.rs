// Tenant-scoped data access over a pluggable record store

pub mod error;
pub mod scoped;
pub mod store;

pub use error::RepositoryError;
pub use scoped::{RepositorySettings, ScopedRepository, SYSTEM_FIELDS};
pub use store::{MemoryStore, RecordStore};
