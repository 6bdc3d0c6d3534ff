//! Event loop owning the Draw Controller
//!
//! Operator commands, timer events and roster-display ticks all arrive on
//! this one task and are applied in order, so the controller never needs a
//! lock.

use crate::presenter::{is_yes, Answered, Presenter};
use crate::roller::NameRoller;
use raffle_kernel::effects::Celebration;
use raffle_kernel::persistence::WinnerStore;
use raffle_kernel::random::StdRandom;
use raffle_kernel::timer::{RaffleEvent, TokioTimer};
use raffle_kernel::{AppState, DrawController, DrawSettings, Roster, Winner, RESET_PROMPT};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Operator commands of the interactive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a draw
    Draw,
    /// Ask to clear history
    Reset,
    /// Show winner history
    History,
    /// Redraw the stage
    Status,
    /// Leave the loop
    Quit,
}

impl Command {
    /// Parse one input line; an empty line means draw
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "d" | "draw" => Some(Self::Draw),
            "r" | "reset" => Some(Self::Reset),
            "h" | "history" => Some(Self::History),
            "s" | "status" => Some(Self::Status),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Help line for the interactive loop
pub const HELP: &str = "[Enter]/d draw  r reset  h history  s status  q quit";

/// Controller type used by the console app
pub type AppController<S, C> = DrawController<S, StdRandom, TokioTimer, C>;

/// The console raffle
#[derive(Debug)]
pub struct App<S, C, P> {
    controller: AppController<S, C>,
    events: mpsc::UnboundedReceiver<RaffleEvent>,
    presenter: P,
    roller: NameRoller,
    roll_interval: Duration,
}

impl<S, C, P> App<S, C, P>
where
    S: WinnerStore,
    C: Celebration,
    P: Presenter,
{
    /// Wire a controller to a tokio timer and start it
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        roster: Roster,
        settings: DrawSettings,
        store: S,
        random: StdRandom,
        celebration: C,
        presenter: P,
        roll_interval: Duration,
    ) -> Self {
        let (timer, events) = TokioTimer::channel();
        let mut controller = DrawController::new(roster, settings, store, random, timer, celebration);
        controller.start();
        Self {
            controller,
            events,
            presenter,
            roller: NameRoller::new(),
            roll_interval,
        }
    }

    /// Underlying controller
    #[inline]
    #[must_use]
    pub fn controller(&self) -> &AppController<S, C> {
        &self.controller
    }

    /// Mutable controller access, e.g. for a confirmed reset
    #[inline]
    pub fn controller_mut(&mut self) -> &mut AppController<S, C> {
        &mut self.controller
    }

    /// Presenter
    #[inline]
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Run one draw end to end, rolling names until the winner is committed
    ///
    /// Returns `None` when no draw is possible.
    pub async fn draw_once(&mut self) -> Option<Winner> {
        self.controller.draw_winner()?;
        self.presenter.render(&self.controller.view());

        let mut ticker = tokio::time::interval(self.roll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let event = event?;
                    if let Some(winner) = self.on_event(event) {
                        return Some(winner);
                    }
                }
                _ = ticker.tick() => self.roll_frame(),
            }
        }
    }

    /// Interactive loop fed by operator input lines
    ///
    /// Returns when the operator quits or the input closes.
    pub async fn run(&mut self, mut lines: mpsc::Receiver<String>) {
        self.presenter.render(&self.controller.view());
        self.presenter.notice(HELP);

        let mut ticker = tokio::time::interval(self.roll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut awaiting_confirmation = false;

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else { break };
                    if awaiting_confirmation {
                        awaiting_confirmation = false;
                        if self.controller.reset(&Answered(is_yes(&line))) {
                            self.presenter.render(&self.controller.view());
                        } else {
                            self.presenter.notice("Reset cancelled.");
                        }
                        continue;
                    }
                    match Command::parse(&line) {
                        Some(Command::Quit) => break,
                        Some(Command::Reset) => {
                            if self.controller.state().phase() == AppState::Drawing {
                                self.presenter.notice("A draw is in progress.");
                            } else {
                                self.presenter.notice(&format!("{RESET_PROMPT} [y/N]"));
                                awaiting_confirmation = true;
                            }
                        }
                        Some(command) => self.on_command(command),
                        None => self.presenter.notice(HELP),
                    }
                }
                Some(event) = self.events.recv() => {
                    self.on_event(event);
                }
                _ = ticker.tick() => self.roll_frame(),
            }
        }

        self.controller.shutdown();
        tracing::info!("Leaving raffle in {}", self.controller.state().phase());
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Draw => {
                if self.controller.draw_winner().is_some() {
                    self.presenter.render(&self.controller.view());
                } else if self.controller.state().phase() == AppState::Ready {
                    self.presenter.notice("Nothing to draw.");
                }
            }
            Command::History => self.presenter.history(&self.controller.view()),
            Command::Status => self.presenter.render(&self.controller.view()),
            Command::Reset | Command::Quit => {}
        }
    }

    fn on_event(&mut self, event: RaffleEvent) -> Option<Winner> {
        let winner = self.controller.handle_event(event)?;
        self.presenter.announce(&winner);
        self.presenter.render(&self.controller.view());
        Some(winner)
    }

    fn roll_frame(&mut self) {
        let view = self.controller.view();
        if !view.is_rolling() {
            return;
        }
        if let Some(name) = self.roller.next_frame(&view.eligible_names) {
            self.presenter.roll(name);
        }
    }
}
