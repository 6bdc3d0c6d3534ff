//! End-to-end tests of the console app over real stores and tokio timers

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use raffle_app::app::HELP;
use raffle_app::{open_store, App, Presenter, RaffleConfig, StoreLocation};
use raffle_kernel::persistence::WinnerStore;
use raffle_kernel::random::StdRandom;
use raffle_kernel::{AppState, DrawSettings, RaffleView, Winner, RESET_PROMPT};
use raffle_store::MemoryStore;
use raffle_test_utils::{sample_roster, RecordingCelebration};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Presenter that keeps what it was asked to show
#[derive(Debug, Clone, Default)]
struct RecordingPresenter {
    renders: Arc<Mutex<Vec<AppState>>>,
    frames: Arc<Mutex<usize>>,
    announced: Arc<Mutex<Vec<String>>>,
    notices: Arc<Mutex<Vec<String>>>,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, view: &RaffleView) {
        self.renders.lock().push(view.phase);
    }

    fn roll(&mut self, _name: &str) {
        *self.frames.lock() += 1;
    }

    fn announce(&mut self, winner: &Winner) {
        self.announced.lock().push(winner.participant.name.clone());
    }

    fn history(&mut self, _view: &RaffleView) {}

    fn notice(&mut self, text: &str) {
        self.notices.lock().push(text.to_string());
    }
}

fn settings() -> DrawSettings {
    DrawSettings::new().with_delay(Duration::from_millis(40))
}

#[tokio::test]
async fn draw_once_rolls_then_commits() {
    let store = MemoryStore::new();
    let celebration = RecordingCelebration::default();
    let presenter = RecordingPresenter::default();
    let mut app = App::new(
        sample_roster(2, 4),
        settings(),
        store.clone(),
        StdRandom::seeded(3),
        celebration.clone(),
        presenter.clone(),
        Duration::from_millis(5),
    );

    let winner = app.draw_once().await.expect("a winner");
    assert_eq!(winner.prize.rank, 2);
    assert_eq!(app.controller().state().phase(), AppState::Ready);
    assert_eq!(store.load().unwrap(), vec![winner.clone()]);
    assert_eq!(celebration.tiers().len(), 1);
    assert_eq!(*presenter.announced.lock(), vec![winner.participant.name]);
    assert!(*presenter.frames.lock() > 0);
    assert_eq!(presenter.renders.lock().first(), Some(&AppState::Drawing));
}

#[tokio::test]
async fn draw_once_without_participants_is_none() {
    let mut app = App::new(
        sample_roster(2, 0),
        settings(),
        MemoryStore::new(),
        StdRandom::seeded(3),
        RecordingCelebration::default(),
        RecordingPresenter::default(),
        Duration::from_millis(5),
    );

    assert!(app.draw_once().await.is_none());
    assert_eq!(app.controller().state().phase(), AppState::Ready);
}

#[tokio::test]
async fn refused_draw_is_reported_through_presenter() {
    let presenter = RecordingPresenter::default();
    let mut app = App::new(
        sample_roster(2, 0),
        settings(),
        MemoryStore::new(),
        StdRandom::seeded(3),
        RecordingCelebration::default(),
        presenter.clone(),
        Duration::from_millis(5),
    );

    let (tx, rx) = mpsc::channel(8);
    for line in ["d", "dance", "q"] {
        tx.send(line.to_string()).await.unwrap();
    }
    app.run(rx).await;

    assert_eq!(
        *presenter.notices.lock(),
        vec![HELP.to_string(), "Nothing to draw.".to_string(), HELP.to_string()]
    );
}

#[tokio::test]
async fn history_survives_a_new_app() {
    let store = MemoryStore::new();
    let mut first = App::new(
        sample_roster(2, 3),
        settings(),
        store.clone(),
        StdRandom::seeded(8),
        RecordingCelebration::default(),
        RecordingPresenter::default(),
        Duration::from_millis(5),
    );
    let winner = first.draw_once().await.expect("a winner");

    let second = App::new(
        sample_roster(2, 3),
        settings(),
        store,
        StdRandom::seeded(9),
        RecordingCelebration::default(),
        RecordingPresenter::default(),
        Duration::from_millis(5),
    );
    let view = second.controller().view();
    assert_eq!(view.history, vec![winner.clone()]);
    assert!(!view.eligible_names.contains(&winner.participant.name));
    assert_eq!(view.next_prize.map(|p| p.rank), Some(1));
}

#[tokio::test]
async fn interactive_loop_draws_resets_and_quits() {
    let store = MemoryStore::new();
    let presenter = RecordingPresenter::default();
    let mut app = App::new(
        sample_roster(1, 3),
        settings(),
        store.clone(),
        StdRandom::seeded(5),
        RecordingCelebration::default(),
        presenter.clone(),
        Duration::from_millis(5),
    );

    let (tx, rx) = mpsc::channel(8);
    let operator = async move {
        tx.send("d".to_string()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send("reset".to_string()).await.unwrap();
        tx.send("y".to_string()).await.unwrap();
        tx.send("q".to_string()).await.unwrap();
    };
    tokio::join!(app.run(rx), operator);

    assert_eq!(presenter.announced.lock().len(), 1);
    let notices = presenter.notices.lock().clone();
    assert_eq!(notices.first().map(String::as_str), Some(HELP));
    assert!(notices.iter().any(|n| n.starts_with(RESET_PROMPT)));
    assert_eq!(app.controller().state().phase(), AppState::Ready);
    assert!(app.controller().state().winners().is_empty());
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn declined_reset_keeps_history() {
    let store = MemoryStore::new();
    let presenter = RecordingPresenter::default();
    let mut app = App::new(
        sample_roster(1, 3),
        settings(),
        store.clone(),
        StdRandom::seeded(5),
        RecordingCelebration::default(),
        presenter.clone(),
        Duration::from_millis(5),
    );
    app.draw_once().await.expect("a winner");
    assert_eq!(app.controller().state().phase(), AppState::Finished);

    let (tx, rx) = mpsc::channel(8);
    for line in ["r", "n", "q"] {
        tx.send(line.to_string()).await.unwrap();
    }
    app.run(rx).await;

    assert_eq!(app.controller().state().phase(), AppState::Finished);
    assert_eq!(store.load().unwrap().len(), 1);
    assert!(presenter.notices.lock().iter().any(|n| n == "Reset cancelled."));
}

#[tokio::test]
async fn file_config_and_store_work_together() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("raffle.toml");
    std::fs::write(
        &config_path,
        r#"
            storage_key = "team-offsite"
            draw_delay_ms = 30
            roll_interval_ms = 5
            participants = ["Ann", "Bob"]

            [[prizes]]
            rank = 1
            name = "Kayak"
            value = "$300"
            icon = "🛶"
            big_winner = true
        "#,
    )
    .unwrap();

    let config = RaffleConfig::load(&config_path).unwrap();
    let location = StoreLocation::Dir(dir.path().join("data"));
    let celebration = RecordingCelebration::default();
    let mut app = App::new(
        config.roster().unwrap(),
        config.settings(),
        open_store(&location, &config),
        StdRandom::seeded(1),
        celebration.clone(),
        RecordingPresenter::default(),
        config.roll_interval(),
    );
    let winner = app.draw_once().await.expect("a winner");
    assert_eq!(winner.prize.name, "Kayak");
    assert_eq!(app.controller().state().phase(), AppState::Finished);
    assert_eq!(celebration.tiers(), vec![raffle_kernel::CelebrationTier::Major]);

    assert!(dir.path().join("data").join("team-offsite.json").exists());
    let reopened = open_store(&location, &config);
    assert_eq!(reopened.load().unwrap(), vec![winner]);
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = RaffleConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn oversized_history_ttl_saves_without_panicking() {
    assert!(RaffleConfig::from_toml_str("history_ttl_days = 1000000000").is_err());

    let config = RaffleConfig {
        history_ttl_days: 1_000_000_000,
        ..RaffleConfig::default()
    };
    let store = open_store(&StoreLocation::Ephemeral, &config);
    store.save(&[]).unwrap();
    assert!(store.load().unwrap().is_empty());
}
