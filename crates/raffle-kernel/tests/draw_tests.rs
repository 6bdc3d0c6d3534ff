//! End-to-end draw lifecycle tests against the test doubles.

use proptest::prelude::*;
use raffle_kernel::effects::AlwaysConfirm;
use raffle_kernel::random::StdRandom;
use raffle_kernel::timer::{ManualTimer, RaffleEvent};
use raffle_kernel::{AppState, CelebrationTier, Roster};
use raffle_test_utils::{
    assert_timer_idle, draw_to_completion, sample_participants, sample_prizes, sample_roster,
    started_controller, winner, RecordingCelebration, RecordingStore, ScriptedRandom,
};
use std::collections::HashSet;
use std::time::Duration;

#[test]
fn three_prizes_five_participants() {
    let timer = ManualTimer::new();
    let store = RecordingStore::new();
    let celebration = RecordingCelebration::default();
    let mut controller = started_controller(
        sample_roster(3, 5),
        store.clone(),
        StdRandom::seeded(42),
        timer.clone(),
        celebration.clone(),
    );

    let mut participants = HashSet::new();
    let mut ranks = Vec::new();
    for _ in 0..3 {
        let winner = draw_to_completion(&mut controller, &timer).expect("draw completes");
        participants.insert(winner.participant.id.clone());
        ranks.push(winner.prize.rank);
    }

    assert_eq!(participants.len(), 3);
    assert_eq!(ranks, vec![3, 2, 1]);
    assert_eq!(controller.state().phase(), AppState::Finished);
    assert_eq!(
        celebration.tiers(),
        vec![CelebrationTier::Minor, CelebrationTier::Minor, CelebrationTier::Major]
    );
    assert_eq!(store.saves(), 3);
    assert_eq!(store.winners().len(), 3);

    // fourth draw is a no-op
    assert!(controller.draw_winner().is_none());
    assert_eq!(controller.state().winners().len(), 3);
    assert_eq!(controller.state().phase(), AppState::Finished);
    assert_timer_idle(&timer);
}

#[test]
fn empty_participant_list_stays_ready() {
    let timer = ManualTimer::new();
    let mut controller = started_controller(
        sample_roster(3, 0),
        RecordingStore::new(),
        StdRandom::seeded(1),
        timer.clone(),
        RecordingCelebration::default(),
    );

    for _ in 0..5 {
        assert!(controller.draw_winner().is_none());
        assert_eq!(controller.state().phase(), AppState::Ready);
    }
    assert_eq!(timer.pending(), 0);
}

#[test]
fn more_prizes_than_participants_stops_at_ready() {
    let timer = ManualTimer::new();
    let mut controller = started_controller(
        sample_roster(4, 2),
        RecordingStore::new(),
        StdRandom::seeded(9),
        timer.clone(),
        RecordingCelebration::default(),
    );

    assert!(draw_to_completion(&mut controller, &timer).is_some());
    assert!(draw_to_completion(&mut controller, &timer).is_some());
    assert!(draw_to_completion(&mut controller, &timer).is_none());

    // prizes remain, nobody left to win them
    assert_eq!(controller.state().phase(), AppState::Ready);
    assert_eq!(controller.view().remaining_prizes, 2);
}

#[test]
fn scripted_pick_is_honoured() {
    let timer = ManualTimer::new();
    let mut controller = started_controller(
        sample_roster(2, 4),
        RecordingStore::new(),
        ScriptedRandom::new([2, 0]),
        timer.clone(),
        RecordingCelebration::default(),
    );

    let first = draw_to_completion(&mut controller, &timer).unwrap();
    assert_eq!(first.participant.name, "Barbara Liskov");

    // index 0 of the remaining pool
    let second = draw_to_completion(&mut controller, &timer).unwrap();
    assert_eq!(second.participant.name, "Ada Lovelace");
}

#[test]
fn winner_committed_only_after_delay() {
    let timer = ManualTimer::new();
    let mut controller = started_controller(
        sample_roster(1, 3),
        RecordingStore::new(),
        StdRandom::seeded(3),
        timer.clone(),
        RecordingCelebration::default(),
    );

    let id = controller.draw_winner().unwrap();
    assert!(controller.state().winners().is_empty());
    assert!(controller.view().is_rolling());
    assert_eq!(controller.view().eligible_names.len(), 3);

    let delay = controller.settings().draw_delay;
    assert!(timer.advance(delay - Duration::from_millis(1)).is_empty());
    let events = timer.advance(Duration::from_millis(1));
    assert_eq!(events, vec![RaffleEvent::DrawElapsed(id)]);

    controller.handle_event(events[0]).unwrap();
    assert_eq!(controller.state().winners().len(), 1);
    assert_eq!(controller.state().phase(), AppState::Finished);

    // replaying the same event changes nothing
    assert!(controller.handle_event(events[0]).is_none());
    assert_eq!(controller.state().winners().len(), 1);
}

#[test]
fn reset_clears_state_and_store() {
    let timer = ManualTimer::new();
    let store = RecordingStore::new();
    let mut controller = started_controller(
        sample_roster(2, 3),
        store.clone(),
        StdRandom::seeded(5),
        timer.clone(),
        RecordingCelebration::default(),
    );
    draw_to_completion(&mut controller, &timer).unwrap();
    draw_to_completion(&mut controller, &timer).unwrap();
    assert_eq!(controller.state().phase(), AppState::Finished);

    assert!(controller.reset(&AlwaysConfirm));
    assert_eq!(controller.state().phase(), AppState::Ready);
    assert!(controller.state().winners().is_empty());
    assert_eq!(store.clears(), 1);
    assert!(store.winners().is_empty());

    // drawing works again after a reset
    assert!(draw_to_completion(&mut controller, &timer).is_some());
}

#[test]
fn restored_history_seeds_state() {
    let prizes = sample_prizes(3);
    let people = sample_participants(4);
    let roster = Roster::new(prizes.clone(), people.clone()).unwrap();
    let store = RecordingStore::with_winners(vec![winner(&people[1], &prizes[2])]);

    let timer = ManualTimer::new();
    let mut controller = started_controller(
        roster,
        store,
        StdRandom::seeded(8),
        timer.clone(),
        RecordingCelebration::default(),
    );

    assert_eq!(controller.state().phase(), AppState::Ready);
    assert_eq!(controller.state().winners().len(), 1);
    assert_eq!(controller.state().next_prize().map(|p| p.rank), Some(2));

    let next = draw_to_completion(&mut controller, &timer).unwrap();
    assert_ne!(next.participant.id, people[1].id);
}

#[test]
fn inconsistent_history_is_pruned_and_rewritten() {
    let prizes = sample_prizes(2);
    let people = sample_participants(3);
    let roster = Roster::new(prizes.clone(), people.clone()).unwrap();
    let stranger = raffle_kernel::Participant::from_name("Somebody Else");
    let store = RecordingStore::with_winners(vec![
        winner(&people[0], &prizes[1]),
        winner(&people[0], &prizes[0]),
        winner(&stranger, &prizes[0]),
    ]);

    let controller = started_controller(
        roster,
        store.clone(),
        StdRandom::seeded(8),
        ManualTimer::new(),
        RecordingCelebration::default(),
    );

    assert_eq!(controller.state().winners().len(), 1);
    assert_eq!(store.saves(), 1);
    assert_eq!(store.winners().len(), 1);
}

#[test]
fn corrupt_history_is_treated_as_empty() {
    let controller = started_controller(
        sample_roster(2, 2),
        RecordingStore::corrupt(),
        StdRandom::seeded(8),
        ManualTimer::new(),
        RecordingCelebration::default(),
    );
    assert_eq!(controller.state().phase(), AppState::Ready);
    assert!(controller.state().winners().is_empty());
}

#[test]
fn complete_history_starts_finished() {
    let prizes = sample_prizes(1);
    let people = sample_participants(2);
    let roster = Roster::new(prizes.clone(), people.clone()).unwrap();
    let store = RecordingStore::with_winners(vec![winner(&people[0], &prizes[0])]);

    let mut controller = started_controller(
        roster,
        store,
        StdRandom::seeded(8),
        ManualTimer::new(),
        RecordingCelebration::default(),
    );
    assert_eq!(controller.state().phase(), AppState::Finished);
    assert!(controller.draw_winner().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_draws_respect_invariants(
        prizes in 0u32..6,
        people in 0usize..8,
        seed in any::<u64>(),
        attempts in 0usize..12,
    ) {
        let timer = ManualTimer::new();
        let mut controller = started_controller(
            sample_roster(prizes, people),
            RecordingStore::new(),
            StdRandom::seeded(seed),
            timer.clone(),
            RecordingCelebration::default(),
        );

        for _ in 0..attempts {
            let before = controller.state().clone();
            let expected_rank = before.next_prize().map(|p| p.rank);
            let eligible: HashSet<_> = before.eligible().into_iter().map(|p| p.id.clone()).collect();

            match draw_to_completion(&mut controller, &timer) {
                Some(w) => {
                    prop_assert!(eligible.contains(&w.participant.id));
                    prop_assert_eq!(Some(w.prize.rank), expected_rank);
                }
                None => {
                    prop_assert_eq!(controller.state(), &before);
                }
            }

            let winners = controller.state().winners();
            prop_assert!(winners.len() <= prizes as usize);
            let ids: HashSet<_> = winners.iter().map(|w| &w.participant.id).collect();
            let ranks: HashSet<_> = winners.iter().map(|w| w.prize.rank).collect();
            prop_assert_eq!(ids.len(), winners.len());
            prop_assert_eq!(ranks.len(), winners.len());

            if prizes > 0 && winners.len() == prizes as usize {
                prop_assert_eq!(controller.state().phase(), AppState::Finished);
            } else {
                prop_assert_eq!(controller.state().phase(), AppState::Ready);
            }
        }

        prop_assert!(controller.reset(&AlwaysConfirm));
        prop_assert!(controller.state().winners().is_empty());
        prop_assert_eq!(controller.state().phase(), AppState::Ready);
    }
}
