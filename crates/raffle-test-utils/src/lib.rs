//! Testing utilities for the raffle workspace
//!
//! Shared fixtures, scripted collaborators and a helper to run a draw to
//! completion on a [`ManualTimer`].

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use raffle_kernel::effects::Celebration;
use raffle_kernel::persistence::WinnerStore;
use raffle_kernel::random::RandomSource;
use raffle_kernel::timer::ManualTimer;
use raffle_kernel::{
    CelebrationTier, DrawController, DrawSettings, Participant, Prize, Roster, StoreError, Winner,
};
use std::collections::VecDeque;
use std::sync::Arc;

const NAMES: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Barbara Liskov",
    "Claude Shannon",
    "Donald Knuth",
    "Edsger Dijkstra",
    "Frances Allen",
    "Grace Hopper",
    "John McCarthy",
    "Ken Thompson",
    "Leslie Lamport",
    "Margaret Hamilton",
];

/// `count` prizes ranked `1..=count`; rank 1 is the big-winner tier
pub fn sample_prizes(count: u32) -> Vec<Prize> {
    (1..=count)
        .map(|rank| {
            let prize = Prize::new(rank, format!("Prize {rank}"), format!("${}", 1000 / rank));
            if rank == 1 {
                prize.with_icon("🏆").big_winner()
            } else {
                prize
            }
        })
        .collect()
}

/// `count` participants with unique names
pub fn sample_participants(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| match NAMES.get(i) {
            Some(name) => Participant::from_name(*name),
            None => Participant::new(format!("p{i:03}"), format!("Guest {i}")),
        })
        .collect()
}

/// Roster of [`sample_prizes`] and [`sample_participants`]
pub fn sample_roster(prizes: u32, participants: usize) -> Roster {
    Roster::new(sample_prizes(prizes), sample_participants(participants)).unwrap()
}

/// Winner with a fixed timestamp, for fixtures
pub fn winner(participant: &Participant, prize: &Prize) -> Winner {
    Winner {
        participant: participant.clone(),
        prize: prize.clone(),
        timestamp: Utc.with_ymd_and_hms(2024, 12, 24, 18, 0, 0).unwrap(),
        message: None,
    }
}

/// Random source replaying a script, then always `0`
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.script.pop_front().unwrap_or(0) % len
    }
}

/// Celebration that records every tier it was asked for
#[derive(Debug, Clone, Default)]
pub struct RecordingCelebration {
    tiers: Arc<Mutex<Vec<CelebrationTier>>>,
}

impl RecordingCelebration {
    pub fn tiers(&self) -> Vec<CelebrationTier> {
        self.tiers.lock().clone()
    }
}

impl Celebration for RecordingCelebration {
    fn celebrate(&self, tier: CelebrationTier) {
        self.tiers.lock().push(tier);
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    winners: Vec<Winner>,
    saves: usize,
    clears: usize,
    corrupt: bool,
}

/// Clonable in-memory store that counts calls
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with history
    pub fn with_winners(winners: Vec<Winner>) -> Self {
        let store = Self::default();
        store.inner.lock().winners = winners;
        store
    }

    /// Store whose `load` always reports a malformed record
    pub fn corrupt() -> Self {
        let store = Self::default();
        store.inner.lock().corrupt = true;
        store
    }

    pub fn winners(&self) -> Vec<Winner> {
        self.inner.lock().winners.clone()
    }

    pub fn saves(&self) -> usize {
        self.inner.lock().saves
    }

    pub fn clears(&self) -> usize {
        self.inner.lock().clears
    }
}

impl WinnerStore for RecordingStore {
    fn load(&self) -> Result<Vec<Winner>, StoreError> {
        let inner = self.inner.lock();
        if inner.corrupt {
            return Err(StoreError::malformed("expected value at line 1 column 1"));
        }
        Ok(inner.winners.clone())
    }

    fn save(&self, winners: &[Winner]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.winners = winners.to_vec();
        inner.saves += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.winners.clear();
        inner.clears += 1;
        Ok(())
    }
}

/// Controller wired to test doubles
pub type TestController<R> =
    DrawController<RecordingStore, R, ManualTimer, RecordingCelebration>;

/// Build and start a controller with default settings
pub fn started_controller<R: RandomSource>(
    roster: Roster,
    store: RecordingStore,
    random: R,
    timer: ManualTimer,
    celebration: RecordingCelebration,
) -> TestController<R> {
    let mut controller = DrawController::new(
        roster,
        DrawSettings::new(),
        store,
        random,
        timer,
        celebration,
    );
    controller.start();
    controller
}

/// Start a draw and fire its timer; returns the committed winner
pub fn draw_to_completion<S, R, C>(
    controller: &mut DrawController<S, R, ManualTimer, C>,
    timer: &ManualTimer,
) -> Option<Winner>
where
    S: WinnerStore,
    R: RandomSource,
    C: Celebration,
{
    controller.draw_winner()?;
    timer
        .flush()
        .into_iter()
        .filter_map(|event| controller.handle_event(event))
        .last()
}

/// Assert a timer has nothing left to deliver
pub fn assert_timer_idle(timer: &ManualTimer) {
    assert!(timer.flush().is_empty(), "timer still had events queued");
}
