//! Console presentation layer

use raffle_kernel::effects::{Celebration, Confirmation};
use raffle_kernel::{AppState, CelebrationTier, RaffleView, Winner};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};

/// Renders raffle views
pub trait Presenter {
    /// Full redraw of the stage
    fn render(&mut self, view: &RaffleView);

    /// One frame of the rolling roster display
    fn roll(&mut self, name: &str);

    /// Winner announcement
    fn announce(&mut self, winner: &Winner);

    /// Winner history table
    fn history(&mut self, view: &RaffleView);

    /// One-line operator message: help, prompts, refusals
    fn notice(&mut self, text: &str);
}

/// Plain-text presenter over any writer
#[derive(Debug)]
pub struct ConsolePresenter<W> {
    out: W,
}

impl ConsolePresenter<io::Stdout> {
    /// Presenter writing to stdout
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsolePresenter<W> {
    /// Presenter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        // A closed terminal is not worth aborting the raffle for
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::debug!("Presenter write failed: {}", e);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render(&mut self, view: &RaffleView) {
        let mut text = format!(
            "\n== RAFFLE [{}] == {}/{} prizes left, {} in the running\n",
            view.phase,
            view.remaining_prizes,
            view.total_prizes,
            view.eligible_names.len()
        );
        match (&view.next_prize, view.phase) {
            (_, AppState::Finished) => text.push_str("All prizes have been awarded.\n"),
            (Some(prize), AppState::Drawing) => {
                text.push_str(&format!("Drawing for {} {} ({})...\n", prize.icon, prize.name, prize.value));
            }
            (Some(prize), _) if view.eligible_names.is_empty() => {
                text.push_str(&format!("Next up: {} {}, but nobody is left to win it.\n", prize.icon, prize.name));
            }
            (Some(prize), _) => {
                text.push_str(&format!("Next up: {} {} ({})\n", prize.icon, prize.name, prize.value));
            }
            (None, _) => text.push_str("No prizes configured.\n"),
        }
        if let Some(last) = view.history.first() {
            text.push_str(&format!(
                "Last winner: {} - {} {}\n",
                last.participant.name, last.prize.icon, last.prize.name
            ));
        }
        self.write(&text);
    }

    fn roll(&mut self, name: &str) {
        self.write(&format!("\r  >> {name:<32}"));
    }

    fn announce(&mut self, winner: &Winner) {
        let mut text = format!(
            "\r  ** {} wins {} {} ({}) **\n",
            winner.participant.name, winner.prize.icon, winner.prize.name, winner.prize.value
        );
        if let Some(message) = &winner.message {
            text.push_str(&format!("     {message}\n"));
        }
        self.write(&text);
    }

    fn history(&mut self, view: &RaffleView) {
        if view.history.is_empty() {
            self.write("No winners yet.\n");
            return;
        }
        let mut text = String::from("Winners (newest first):\n");
        for w in &view.history {
            text.push_str(&format!(
                "  #{:<3} {} {:<28} {:<24} {}\n",
                w.prize.rank,
                w.prize.icon,
                w.prize.name,
                w.participant.name,
                w.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        self.write(&text);
    }

    fn notice(&mut self, text: &str) {
        self.write(&format!("\r{text}\n"));
    }
}

/// Confetti banner over any writer
#[derive(Debug)]
pub struct ConsoleCelebration<W = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleCelebration<io::Stdout> {
    /// Banner on stdout
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for ConsoleCelebration<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> ConsoleCelebration<W> {
    /// Banner written to `out`
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Celebration for ConsoleCelebration<W> {
    fn celebrate(&self, tier: CelebrationTier) {
        let banner = match tier {
            CelebrationTier::Major => "🎉🎊✨🎉🎊✨ BIG WINNER! ✨🎊🎉✨🎊🎉",
            CelebrationTier::Minor => "🎉 🎊 🎉",
        };
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "     {banner}").and_then(|()| out.flush()) {
            tracing::debug!("Celebration write failed: {}", e);
        }
    }
}

/// Asks on stdout, reads y/N from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(_) => false,
        }
    }
}

/// Confirmation answered ahead of time, e.g. from an already-read line
#[derive(Debug, Clone, Copy)]
pub struct Answered(pub bool);

impl Confirmation for Answered {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// `y` / `yes`, case-insensitive
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
