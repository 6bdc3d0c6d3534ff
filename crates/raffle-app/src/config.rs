//! Raffle configuration
//!
//! Loaded from a TOML file, or the built-in demo roster when none is given.
//! Every field except the roster has a default.

use chrono::Duration as TtlDuration;
use raffle_kernel::persistence::DEFAULT_STORAGE_KEY;
use raffle_kernel::{DrawSettings, Participant, Prize, Roster, RosterError};
use raffle_store::{DEFAULT_TTL_DAYS, MAX_TTL_DAYS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Roster failed validation
    #[error("invalid roster: {0}")]
    Roster(#[from] RosterError),

    /// History lifetime outside `1..=MAX_TTL_DAYS`
    #[error("history_ttl_days must be between 1 and {max}, got {days}")]
    HistoryTtl { days: i64, max: i64 },
}

/// Participant as written in the config: a bare name or a table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParticipantEntry {
    /// `"Ada Lovelace"`
    Name(String),
    /// `{ id = "ada", name = "Ada Lovelace" }`
    Full {
        /// Explicit id; slug of the name when absent
        id: Option<String>,
        /// Display name
        name: String,
    },
}

impl From<&ParticipantEntry> for Participant {
    fn from(entry: &ParticipantEntry) -> Self {
        match entry {
            ParticipantEntry::Name(name) | ParticipantEntry::Full { id: None, name } => {
                Participant::from_name(name.clone())
            }
            ParticipantEntry::Full { id: Some(id), name } => Participant::new(id.clone(), name.clone()),
        }
    }
}

/// Full raffle configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RaffleConfig {
    /// Storage key of the winner record
    pub storage_key: String,
    /// Presentation delay of a draw
    pub draw_delay_ms: u64,
    /// Roster display frame interval
    pub roll_interval_ms: u64,
    /// Lifetime of the stored winner record
    pub history_ttl_days: i64,
    /// Congratulation templates (`{name}`, `{prize}`)
    pub messages: Vec<String>,
    /// Prizes
    pub prizes: Vec<Prize>,
    /// Participants
    pub participants: Vec<ParticipantEntry>,
}

impl Default for RaffleConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            draw_delay_ms: 3000,
            roll_interval_ms: 90,
            history_ttl_days: DEFAULT_TTL_DAYS,
            messages: Vec::new(),
            prizes: Vec::new(),
            participants: Vec::new(),
        }
    }
}

impl RaffleConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed input and
    /// [`ConfigError::HistoryTtl`] for an out-of-range lifetime.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check tunables that the schema alone cannot bound
    ///
    /// # Errors
    /// Returns [`ConfigError::HistoryTtl`] for an out-of-range lifetime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TTL_DAYS).contains(&self.history_ttl_days) {
            return Err(ConfigError::HistoryTtl {
                days: self.history_ttl_days,
                max: MAX_TTL_DAYS,
            });
        }
        Ok(())
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded config from {}: {} prizes, {} participants",
            path.display(),
            config.prizes.len(),
            config.participants.len()
        );
        Ok(config)
    }

    /// Built-in demo roster
    #[must_use]
    pub fn demo() -> Self {
        let prizes = vec![
            Prize::new(1, "Grand Prize", "$1,000").with_icon("🏆").big_winner(),
            Prize::new(2, "Weekend Getaway", "$500").with_icon("🏖️").big_winner(),
            Prize::new(3, "Noise-Cancelling Headphones", "$250").with_icon("🎧"),
            Prize::new(4, "Smart Watch", "$200").with_icon("⌚"),
            Prize::new(5, "Coffee Machine", "$120").with_icon("☕"),
            Prize::new(6, "Gift Card", "$50").with_icon("💳"),
        ];
        let participants = [
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
            "Niklaus Wirth",
            "Radia Perlman",
        ]
        .into_iter()
        .map(|name| ParticipantEntry::Name(name.to_string()))
        .collect();

        Self {
            messages: vec![
                "Congratulations {name}! The {prize} is yours.".to_string(),
                "{name} takes home the {prize}!".to_string(),
                "Well deserved, {name}. Enjoy the {prize}!".to_string(),
            ],
            prizes,
            participants,
            ..Self::default()
        }
    }

    /// Validated roster
    ///
    /// # Errors
    /// Returns [`RosterError`] on duplicate ids/ranks or blank names.
    pub fn roster(&self) -> Result<Roster, RosterError> {
        Roster::new(
            self.prizes.clone(),
            self.participants.iter().map(Participant::from).collect(),
        )
    }

    /// Controller settings
    #[must_use]
    pub fn settings(&self) -> DrawSettings {
        DrawSettings::new()
            .with_delay(Duration::from_millis(self.draw_delay_ms))
            .with_messages(self.messages.clone())
    }

    /// Roster display frame interval (never zero)
    #[must_use]
    pub fn roll_interval(&self) -> Duration {
        Duration::from_millis(self.roll_interval_ms.max(1))
    }

    /// Lifetime of the stored record
    #[must_use]
    pub fn history_ttl(&self) -> TtlDuration {
        TtlDuration::days(self.history_ttl_days.clamp(0, MAX_TTL_DAYS))
    }
}
