//! Draw Controller
//!
//! Owns the current [`RaffleState`] snapshot and drives it through the
//! reducer in response to operator commands and timer events:
//! - Picks the winner when a draw starts
//! - Commits it once the presentation delay elapses
//! - Persists history after every change
//! - Triggers the celebration for the awarded prize tier
//!
//! All calls happen on one logical thread. Unmet preconditions are silent
//! no-ops, logged at debug level only.

use crate::effects::{Celebration, Confirmation};
use crate::persistence::{self, WinnerStore};
use crate::random::{self, RandomSource};
use crate::roster::Roster;
use crate::state::{reduce, sanitize_history, Action, PendingDraw, RaffleState};
use crate::timer::{RaffleEvent, Timer, TimerHandle};
use crate::types::{AppState, DrawId, Participant, Prize, Winner};
use crate::view::RaffleView;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Prompt shown before clearing history
pub const RESET_PROMPT: &str = "Clear all winners and start over?";

/// Tunables for the draw lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSettings {
    /// Time between picking and committing a winner
    pub draw_delay: Duration,
    /// Congratulation templates; `{name}` and `{prize}` are expanded
    pub messages: Vec<String>,
}

impl DrawSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With presentation delay
    #[inline]
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.draw_delay = delay;
        self
    }

    /// With congratulation templates
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            draw_delay: Duration::from_millis(3000),
            messages: Vec::new(),
        }
    }
}

/// The raffle's single source of truth
#[derive(Debug)]
pub struct DrawController<S, R, T, C> {
    state: RaffleState,
    roster: Arc<Roster>,
    settings: DrawSettings,
    store: S,
    random: R,
    timer: T,
    celebration: C,
    in_flight: Option<TimerHandle>,
}

impl<S, R, T, C> DrawController<S, R, T, C>
where
    S: WinnerStore,
    R: RandomSource,
    T: Timer,
    C: Celebration,
{
    /// Create a controller in SETUP; call [`start`](Self::start) next
    #[must_use]
    pub fn new(
        roster: Roster,
        settings: DrawSettings,
        store: S,
        random: R,
        timer: T,
        celebration: C,
    ) -> Self {
        Self {
            state: RaffleState::default(),
            roster: Arc::new(roster),
            settings,
            store,
            random,
            timer,
            celebration,
            in_flight: None,
        }
    }

    /// Load persisted history and enter READY (or FINISHED)
    ///
    /// Only the first call has any effect.
    pub fn start(&mut self) -> AppState {
        if self.state.phase() != AppState::Setup {
            return self.state.phase();
        }

        let restored = persistence::load_or_default(&self.store);
        let (winners, dropped) = sanitize_history(&self.roster, restored);
        for winner in &dropped {
            tracing::warn!(
                "Dropping stored winner {} / prize {}: not consistent with roster",
                winner.participant.id,
                winner.prize.rank
            );
        }

        let action = Action::Load {
            roster: Arc::clone(&self.roster),
            winners,
        };
        match reduce(&self.state, action) {
            Ok(next) => {
                tracing::info!(
                    "Raffle loaded: {} participants, {} prizes, {} winners restored",
                    self.roster.participants().len(),
                    self.roster.prizes().len(),
                    next.winners().len()
                );
                self.state = next;
            }
            Err(e) => tracing::error!("Failed to load roster: {}", e),
        }

        if !dropped.is_empty() {
            self.persist();
        }
        self.state.phase()
    }

    /// Start a draw for the next prize
    ///
    /// Picks one eligible participant uniformly at random and schedules the
    /// commit after the presentation delay. Returns `None` without touching
    /// anything when no draw is possible.
    pub fn draw_winner(&mut self) -> Option<DrawId> {
        if !self.state.can_draw() {
            tracing::debug!(
                "Draw ignored in {} (next prize: {:?}, eligible: {})",
                self.state.phase(),
                self.state.next_prize().map(|p| p.rank),
                self.state.eligible().len()
            );
            return None;
        }

        let prize = self.state.next_prize()?.clone();
        let eligible: Vec<Participant> = self.state.eligible().into_iter().cloned().collect();
        let participant = random::pick(&mut self.random, &eligible)?.clone();

        let pending = PendingDraw {
            id: DrawId::new(),
            participant,
            prize,
        };
        let id = pending.id;

        match reduce(&self.state, Action::BeginDraw(pending)) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::debug!("Draw rejected: {}", e);
                return None;
            }
        }

        self.in_flight = Some(
            self.timer
                .schedule(self.settings.draw_delay, RaffleEvent::DrawElapsed(id)),
        );
        tracing::info!(
            "Drawing for prize #{} (draw {})",
            self.state.pending().map_or(0, |p| p.prize.rank),
            id
        );
        Some(id)
    }

    /// Apply a timer event
    ///
    /// Returns the committed winner, or `None` for stale events.
    pub fn handle_event(&mut self, event: RaffleEvent) -> Option<Winner> {
        match event {
            RaffleEvent::DrawElapsed(id) => self.commit(id),
        }
    }

    fn commit(&mut self, id: DrawId) -> Option<Winner> {
        let pending = self.state.pending().filter(|p| p.id == id)?.clone();
        let message = self.congratulation(&pending.participant, &pending.prize);

        let action = Action::Commit {
            draw: id,
            timestamp: Utc::now(),
            message,
        };
        match reduce(&self.state, action) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::debug!("Ignoring draw event {}: {}", id, e);
                return None;
            }
        }
        self.in_flight = None;

        let winner = self.state.winners().last()?.clone();
        tracing::info!(
            "Winner: {} takes prize #{} ({})",
            winner.participant.name,
            winner.prize.rank,
            winner.prize.name
        );
        self.persist();
        self.celebration.celebrate(winner.prize.tier());

        if self.state.phase() == AppState::Finished {
            tracing::info!("All prizes awarded");
        }
        Some(winner)
    }

    /// Clear all winners after operator confirmation
    ///
    /// Returns `true` when history was cleared. Ignored while a draw is in
    /// flight or before the roster is loaded.
    pub fn reset(&mut self, confirmation: &dyn Confirmation) -> bool {
        if !matches!(self.state.phase(), AppState::Ready | AppState::Finished) {
            tracing::debug!("Reset ignored in {}", self.state.phase());
            return false;
        }
        if !confirmation.confirm(RESET_PROMPT) {
            tracing::debug!("Reset declined");
            return false;
        }

        match reduce(&self.state, Action::Reset) {
            Ok(next) => self.state = next,
            Err(e) => {
                tracing::debug!("Reset rejected: {}", e);
                return false;
            }
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear stored winners: {}", e);
        }
        tracing::info!("Raffle reset");
        true
    }

    /// Cancel any outstanding timer
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
            tracing::debug!("Cancelled in-flight draw timer");
        }
    }

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn state(&self) -> &RaffleState {
        &self.state
    }

    /// Presenter view of the current snapshot
    #[must_use]
    pub fn view(&self) -> RaffleView {
        RaffleView::from(&self.state)
    }

    /// Draw settings
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    /// Random source, e.g. for cosmetic roster rolling
    #[inline]
    pub fn random_mut(&mut self) -> &mut R {
        &mut self.random
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.state.winners()) {
            tracing::warn!("Failed to save winners: {}", e);
        }
    }

    fn congratulation(&mut self, participant: &Participant, prize: &Prize) -> Option<String> {
        let template = random::pick(&mut self.random, &self.settings.messages)?;
        Some(
            template
                .replace("{name}", &participant.name)
                .replace("{prize}", &prize.name),
        )
    }
}
