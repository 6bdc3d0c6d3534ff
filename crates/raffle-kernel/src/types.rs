//! Core data model for the raffle
//!
//! - Participants and prizes (immutable once loaded)
//! - Winners (append-only history entries)
//! - Application phase and draw identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable participant identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Create identifier from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Someone who can win a prize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier
    pub id: ParticipantId,
    /// Display name
    pub name: String,
}

impl Participant {
    /// Create participant with explicit id
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: name.into(),
        }
    }

    /// Create participant whose id is derived from the display name
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ParticipantId(slugify(&name)),
            name,
        }
    }
}

/// Lowercase ascii-alphanumeric slug, runs of anything else collapse to `-`.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Prize rank; doubles as identity and ordering key
pub type PrizeRank = u32;

/// Icon for prizes that do not name one
pub const DEFAULT_PRIZE_ICON: &str = "🎁";

fn default_prize_icon() -> String {
    DEFAULT_PRIZE_ICON.to_string()
}

/// Something to be won
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    /// Unique rank
    pub rank: PrizeRank,
    /// Prize name
    pub name: String,
    /// Display value, e.g. "$500"
    #[serde(default)]
    pub value: String,
    /// Icon glyph
    #[serde(default = "default_prize_icon")]
    pub icon: String,
    /// Enhanced celebration tier
    #[serde(default)]
    pub big_winner: bool,
}

impl Prize {
    /// Create a regular-tier prize
    #[must_use]
    pub fn new(rank: PrizeRank, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            rank,
            name: name.into(),
            value: value.into(),
            icon: default_prize_icon(),
            big_winner: false,
        }
    }

    /// With icon glyph
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Mark as big-winner tier
    #[must_use]
    pub fn big_winner(mut self) -> Self {
        self.big_winner = true;
        self
    }

    /// Celebration tier for this prize
    #[inline]
    #[must_use]
    pub fn tier(&self) -> CelebrationTier {
        if self.big_winner {
            CelebrationTier::Major
        } else {
            CelebrationTier::Minor
        }
    }
}

/// One completed draw
///
/// Created exactly once per draw and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Who won
    pub participant: Participant,
    /// What they won
    pub prize: Prize,
    /// When the draw was committed
    pub timestamp: DateTime<Utc>,
    /// Optional congratulatory message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Application phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    /// Roster not loaded yet
    Setup,
    /// Waiting for the operator
    Ready,
    /// Draw in flight
    Drawing,
    /// Every prize has been awarded
    Finished,
}

impl AppState {
    /// All phases, in lifecycle order
    pub const ALL: [AppState; 4] = [
        AppState::Setup,
        AppState::Ready,
        AppState::Drawing,
        AppState::Finished,
    ];
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppState::Setup => "SETUP",
            AppState::Ready => "READY",
            AppState::Drawing => "DRAWING",
            AppState::Finished => "FINISHED",
        };
        f.write_str(s)
    }
}

/// Celebration strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelebrationTier {
    /// Big-winner prizes
    Major,
    /// Everything else
    Minor,
}

/// Identifier of one in-flight draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawId(pub Uuid);

impl DrawId {
    /// Generate new draw ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DrawId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DrawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
