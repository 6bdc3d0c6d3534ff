//! Raffle Kernel (raffle-kernel)
//!
//! The draw lifecycle of a prize raffle, free of any presentation concerns:
//! 1. **Snapshot**: an immutable [`RaffleState`] replaced wholesale by [`reduce`]
//! 2. **Controller**: [`DrawController`] picks winners, schedules the
//!    presentation delay and persists history
//! 3. **Seams**: randomness, timers, storage, celebration and confirmation
//!    are injected traits
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raffle_kernel::prelude::*;
//!
//! let roster = Roster::new(prizes, participants)?;
//! let (timer, mut events) = TokioTimer::channel();
//! let mut controller = DrawController::new(
//!     roster, DrawSettings::new(), store, StdRandom::from_entropy(), timer, Silent,
//! );
//! controller.start();
//! controller.draw_winner();
//! if let Some(event) = events.recv().await {
//!     let winner = controller.handle_event(event);
//! }
//! ```

// Core modules
pub mod controller;
pub mod effects;
pub mod error;
pub mod persistence;
pub mod random;
pub mod roster;
pub mod state;
pub mod state_machine;
pub mod timer;
pub mod types;
pub mod view;

// Re-exports
pub use controller::{DrawController, DrawSettings, RESET_PROMPT};
pub use error::*;
pub use roster::Roster;
pub use state::{reduce, Action, PendingDraw, RaffleState};
pub use types::*;
pub use view::RaffleView;

/// Common imports for driving a raffle
pub mod prelude {
    pub use crate::controller::{DrawController, DrawSettings};
    pub use crate::effects::{AlwaysConfirm, Celebration, Confirmation, NeverConfirm, Silent};
    pub use crate::error::{RosterError, StateMachineError, StoreError};
    pub use crate::persistence::{load_or_default, WinnerRecord, WinnerStore, DEFAULT_STORAGE_KEY};
    pub use crate::random::{RandomSource, StdRandom};
    pub use crate::roster::Roster;
    pub use crate::state::{reduce, Action, RaffleState};
    pub use crate::timer::{ManualTimer, RaffleEvent, Timer, TimerHandle, TokioTimer};
    pub use crate::types::{
        AppState, CelebrationTier, DrawId, Participant, ParticipantId, Prize, PrizeRank, Winner,
    };
    pub use crate::view::RaffleView;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if running with strict debugging enabled
pub const fn strict_debug() -> bool {
    cfg!(feature = "strict-debug")
}
