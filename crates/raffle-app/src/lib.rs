//! Raffle App - console stage for the raffle kernel
//!
//! - [`config`]: TOML roster and tunables
//! - [`presenter`]: console rendering, celebration and confirmation
//! - [`roller`]: rolling roster display during a draw
//! - [`app`]: single-task event loop owning the Draw Controller

pub mod app;
pub mod config;
pub mod presenter;
pub mod roller;

pub use app::{App, AppController, Command};
pub use config::{ConfigError, ParticipantEntry, RaffleConfig};
pub use presenter::{Answered, ConsoleCelebration, ConsolePresenter, Presenter, StdinConfirmation};
pub use roller::NameRoller;

use raffle_kernel::persistence::WinnerStore;
use raffle_store::{JsonFileStore, MemoryStore};
use std::path::PathBuf;

/// Where winner history lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// JSON record under this directory
    Dir(PathBuf),
    /// Nothing survives the process
    Ephemeral,
}

/// Open the store described by `location` using the config's key and expiry
#[must_use]
pub fn open_store(location: &StoreLocation, config: &RaffleConfig) -> Box<dyn WinnerStore> {
    match location {
        StoreLocation::Dir(dir) => {
            let store = JsonFileStore::new(dir)
                .with_key(config.storage_key.clone())
                .with_ttl(config.history_ttl());
            tracing::debug!("Winner history at {}", store.path().display());
            Box::new(store)
        }
        StoreLocation::Ephemeral => Box::new(MemoryStore::new().with_ttl(config.history_ttl())),
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
