//! Validated prize and participant roster

use crate::error::RosterError;
use crate::types::{Participant, ParticipantId, Prize, PrizeRank, Winner};
use std::collections::HashSet;

/// Immutable set of prizes and participants
///
/// Prizes are kept sorted by descending rank so the next prize to draw is
/// always the first unclaimed one. Participants keep their configured order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    prizes: Vec<Prize>,
    participants: Vec<Participant>,
}

impl Roster {
    /// Validate and build a roster
    ///
    /// # Errors
    /// Returns error on duplicate participant ids, duplicate prize ranks or
    /// blank participant names.
    pub fn new(mut prizes: Vec<Prize>, participants: Vec<Participant>) -> Result<Self, RosterError> {
        let mut ids = HashSet::with_capacity(participants.len());
        for (index, p) in participants.iter().enumerate() {
            if p.name.trim().is_empty() || p.id.as_str().is_empty() {
                return Err(RosterError::EmptyName { index });
            }
            if !ids.insert(&p.id) {
                return Err(RosterError::DuplicateParticipant(p.id.clone()));
            }
        }

        let mut ranks = HashSet::with_capacity(prizes.len());
        for prize in &prizes {
            if !ranks.insert(prize.rank) {
                return Err(RosterError::DuplicatePrize(prize.rank));
            }
        }
        prizes.sort_by(|a, b| b.rank.cmp(&a.rank));

        Ok(Self {
            prizes,
            participants,
        })
    }

    /// Prizes, highest rank first
    #[inline]
    #[must_use]
    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Participants in configured order
    #[inline]
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up participant by id
    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Look up prize by rank
    #[must_use]
    pub fn prize(&self, rank: PrizeRank) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.rank == rank)
    }

    /// Participants not referenced by any winner
    pub fn eligible<'a>(&'a self, winners: &'a [Winner]) -> impl Iterator<Item = &'a Participant> + 'a {
        self.participants
            .iter()
            .filter(move |p| !winners.iter().any(|w| w.participant.id == p.id))
    }

    /// Highest-ranked prize not referenced by any winner
    #[must_use]
    pub fn next_prize(&self, winners: &[Winner]) -> Option<&Prize> {
        self.prizes
            .iter()
            .find(|prize| !winners.iter().any(|w| w.prize.rank == prize.rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn prizes() -> Vec<Prize> {
        vec![
            Prize::new(1, "Bike", "$400").big_winner(),
            Prize::new(3, "Mug", "$5"),
            Prize::new(2, "Book", "$20"),
        ]
    }

    #[test]
    fn prizes_sorted_highest_rank_first() {
        let roster = Roster::new(prizes(), vec![]).unwrap();
        let ranks: Vec<_> = roster.prizes().iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[test]
    fn rejects_duplicate_participant() {
        let err = Roster::new(
            prizes(),
            vec![Participant::from_name("Ann"), Participant::from_name("ann")],
        )
        .unwrap_err();
        assert_eq!(err, RosterError::DuplicateParticipant(ParticipantId::new("ann")));
    }

    #[test]
    fn rejects_duplicate_prize() {
        let err = Roster::new(
            vec![Prize::new(1, "A", "1"), Prize::new(1, "B", "2")],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, RosterError::DuplicatePrize(1));
    }

    #[test]
    fn rejects_blank_name() {
        let err = Roster::new(vec![], vec![Participant::from_name("  ")]).unwrap_err();
        assert_eq!(err, RosterError::EmptyName { index: 0 });
    }

    #[test]
    fn next_prize_skips_claimed() {
        let roster = Roster::new(prizes(), vec![Participant::from_name("Ann")]).unwrap();
        let winner = Winner {
            participant: roster.participants()[0].clone(),
            prize: roster.prize(3).unwrap().clone(),
            timestamp: Utc::now(),
            message: None,
        };
        assert_eq!(roster.next_prize(&[]).map(|p| p.rank), Some(3));
        assert_eq!(roster.next_prize(&[winner.clone()]).map(|p| p.rank), Some(2));
        assert_eq!(roster.eligible(&[winner]).count(), 0);
    }
}
