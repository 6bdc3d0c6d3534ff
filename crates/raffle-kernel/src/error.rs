//! Error types for the raffle kernel
//!
//! Drawing itself never fails: unmet preconditions are silent no-ops.
//! Errors only come from loading a roster, illegal phase transitions,
//! and the persistence adapter.

use crate::types::{AppState, ParticipantId, PrizeRank};
use std::path::PathBuf;

/// Roster validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// Two participants share an identifier
    #[error("duplicate participant id: {0}")]
    DuplicateParticipant(ParticipantId),

    /// Two prizes share a rank
    #[error("duplicate prize rank: {0}")]
    DuplicatePrize(PrizeRank),

    /// Participant without a usable name
    #[error("participant #{index} has an empty name")]
    EmptyName { index: usize },
}

/// Phase transition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition not in the allowed table
    #[error("illegal transition: {from} -> {to}")]
    IllegalTransition { from: AppState, to: AppState },

    /// Action does not apply to the current snapshot
    #[error("action {action} not applicable in {state}")]
    NotApplicable {
        action: &'static str,
        state: AppState,
    },
}

/// Persistence adapter errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded or decoded
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed-record error
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::Malformed(message.to_string())
    }
}
