//! Read-only projection of a snapshot for presenters

use crate::state::RaffleState;
use crate::types::{AppState, Prize, Winner};
use serde::Serialize;

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaffleView {
    /// Current phase
    pub phase: AppState,
    /// Prize the next draw (or the one in flight) is for
    pub next_prize: Option<Prize>,
    /// Winners, newest first
    pub history: Vec<Winner>,
    /// Names still in the running, for the roster display
    pub eligible_names: Vec<String>,
    /// Prizes not yet awarded
    pub remaining_prizes: usize,
    /// Total prizes configured
    pub total_prizes: usize,
}

impl From<&RaffleState> for RaffleView {
    fn from(state: &RaffleState) -> Self {
        let next_prize = state
            .pending()
            .map(|p| p.prize.clone())
            .or_else(|| state.next_prize().cloned());
        let total_prizes = state.roster().prizes().len();

        Self {
            phase: state.phase(),
            next_prize,
            history: state.winners().iter().rev().cloned().collect(),
            eligible_names: state.eligible().into_iter().map(|p| p.name.clone()).collect(),
            remaining_prizes: total_prizes.saturating_sub(state.winners().len()),
            total_prizes,
        }
    }
}

impl RaffleView {
    /// Whether the roster display should be rolling
    #[inline]
    #[must_use]
    pub fn is_rolling(&self) -> bool {
        self.phase == AppState::Drawing
    }
}
