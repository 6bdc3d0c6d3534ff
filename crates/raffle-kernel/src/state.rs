//! Immutable raffle snapshot and its transition function
//!
//! Callers never mutate a [`RaffleState`]; they feed an [`Action`] to
//! [`reduce`] and replace their snapshot with the result.

use crate::error::StateMachineError;
use crate::roster::Roster;
use crate::state_machine::validate_transition;
use crate::types::{AppState, DrawId, Participant, Prize, Winner};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// A draw that has picked its winner but not committed it yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDraw {
    /// Draw identifier, echoed back by the timer
    pub id: DrawId,
    /// Chosen participant
    pub participant: Participant,
    /// Prize being drawn
    pub prize: Prize,
}

/// Inputs to [`reduce`]
#[derive(Debug, Clone)]
pub enum Action {
    /// Roster loaded together with restored history
    Load {
        roster: Arc<Roster>,
        winners: Vec<Winner>,
    },
    /// Draw started
    BeginDraw(PendingDraw),
    /// Presentation delay elapsed; record the pending winner
    Commit {
        draw: DrawId,
        timestamp: DateTime<Utc>,
        message: Option<String>,
    },
    /// Clear all winners
    Reset,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Load { .. } => "load",
            Action::BeginDraw(_) => "begin-draw",
            Action::Commit { .. } => "commit",
            Action::Reset => "reset",
        }
    }
}

/// Snapshot of the whole raffle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaffleState {
    phase: AppState,
    roster: Arc<Roster>,
    winners: Vec<Winner>,
    pending: Option<PendingDraw>,
}

impl Default for RaffleState {
    fn default() -> Self {
        Self {
            phase: AppState::Setup,
            roster: Arc::new(Roster::default()),
            winners: Vec::new(),
            pending: None,
        }
    }
}

impl RaffleState {
    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> AppState {
        self.phase
    }

    /// Loaded roster
    #[inline]
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Winner history, oldest first
    #[inline]
    #[must_use]
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Draw in flight, if any
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&PendingDraw> {
        self.pending.as_ref()
    }

    /// Highest-ranked unclaimed prize
    #[must_use]
    pub fn next_prize(&self) -> Option<&Prize> {
        self.roster.next_prize(&self.winners)
    }

    /// Participants without a prize
    #[must_use]
    pub fn eligible(&self) -> Vec<&Participant> {
        self.roster.eligible(&self.winners).collect()
    }

    /// Whether a draw may start right now
    #[must_use]
    pub fn can_draw(&self) -> bool {
        self.phase == AppState::Ready
            && self.next_prize().is_some()
            && self.roster.eligible(&self.winners).next().is_some()
    }

    fn settled_phase(roster: &Roster, winners: &[Winner]) -> AppState {
        if !winners.is_empty() && roster.next_prize(winners).is_none() {
            AppState::Finished
        } else {
            AppState::Ready
        }
    }

    fn not_applicable(&self, action: &Action) -> StateMachineError {
        StateMachineError::NotApplicable {
            action: action.name(),
            state: self.phase,
        }
    }
}

/// Apply one action to a snapshot, producing the next snapshot
///
/// # Errors
/// Returns [`StateMachineError`] when the action does not fit the current
/// phase or would break the one-prize-per-participant invariants. The input
/// snapshot is left untouched either way.
pub fn reduce(state: &RaffleState, action: Action) -> Result<RaffleState, StateMachineError> {
    match action {
        Action::Load { roster, winners } => {
            if state.phase != AppState::Setup {
                return Err(state.not_applicable(&Action::Load { roster, winners }));
            }
            let (winners, _) = sanitize_history(&roster, winners);
            let phase = RaffleState::settled_phase(&roster, &winners);
            validate_transition(state.phase, phase)?;
            Ok(RaffleState {
                phase,
                roster,
                winners,
                pending: None,
            })
        }
        Action::BeginDraw(pending) => {
            validate_transition(state.phase, AppState::Drawing)?;
            let prize_ok = state
                .next_prize()
                .is_some_and(|next| next.rank == pending.prize.rank);
            let participant_ok = state
                .roster
                .eligible(&state.winners)
                .any(|p| p.id == pending.participant.id);
            if state.pending.is_some() || !prize_ok || !participant_ok {
                return Err(state.not_applicable(&Action::BeginDraw(pending)));
            }
            Ok(RaffleState {
                phase: AppState::Drawing,
                pending: Some(pending),
                ..state.clone()
            })
        }
        Action::Commit {
            draw,
            timestamp,
            message,
        } => {
            let pending = match &state.pending {
                Some(p) if state.phase == AppState::Drawing && p.id == draw => p.clone(),
                _ => {
                    return Err(state.not_applicable(&Action::Commit {
                        draw,
                        timestamp,
                        message,
                    }))
                }
            };
            let mut winners = state.winners.clone();
            winners.push(Winner {
                participant: pending.participant,
                prize: pending.prize,
                timestamp,
                message,
            });
            let phase = RaffleState::settled_phase(&state.roster, &winners);
            validate_transition(state.phase, phase)?;
            Ok(RaffleState {
                phase,
                roster: Arc::clone(&state.roster),
                winners,
                pending: None,
            })
        }
        Action::Reset => {
            // Only a settled raffle can be reset; a pending draw is never dropped
            if !matches!(state.phase, AppState::Ready | AppState::Finished)
                || state.pending.is_some()
            {
                return Err(state.not_applicable(&Action::Reset));
            }
            validate_transition(state.phase, AppState::Ready)?;
            Ok(RaffleState {
                phase: AppState::Ready,
                roster: Arc::clone(&state.roster),
                winners: Vec::new(),
                pending: None,
            })
        }
    }
}

/// Split restored history into records consistent with `roster` and the rest
///
/// A record is kept when its participant and prize both exist in the roster
/// and neither was claimed by an earlier kept record. Kept records carry the
/// roster's current participant and prize data.
#[must_use]
pub fn sanitize_history(roster: &Roster, winners: Vec<Winner>) -> (Vec<Winner>, Vec<Winner>) {
    let mut kept = Vec::with_capacity(winners.len());
    let mut dropped = Vec::new();
    let mut seen_participants = HashSet::new();
    let mut seen_prizes = HashSet::new();

    for winner in winners {
        let participant = roster.participant(&winner.participant.id).cloned();
        let prize = roster.prize(winner.prize.rank).cloned();
        match (participant, prize) {
            (Some(participant), Some(prize))
                if !seen_participants.contains(&participant.id)
                    && !seen_prizes.contains(&prize.rank) =>
            {
                seen_participants.insert(participant.id.clone());
                seen_prizes.insert(prize.rank);
                kept.push(Winner {
                    participant,
                    prize,
                    ..winner
                });
            }
            _ => dropped.push(winner),
        }
    }

    (kept, dropped)
}
