//! Raffle Store - winner history persistence
//!
//! Implementations of [`raffle_kernel::persistence::WinnerStore`]:
//! - [`JsonFileStore`]: one JSON record per storage key on disk
//! - [`MemoryStore`]: process-local, for ephemeral runs and tests
//!
//! Both wrap the `{ "winners": [...] }` record in an [`Envelope`] carrying
//! the storage key and an expiry instant. Expired records read as empty.

pub mod envelope;
pub mod file;
pub mod memory;

pub use envelope::{Envelope, DEFAULT_TTL_DAYS, MAX_TTL_DAYS};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
