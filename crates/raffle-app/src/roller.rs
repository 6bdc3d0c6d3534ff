//! Rolling roster display shown while a draw is in flight
//!
//! Purely cosmetic: frames come from their own random source and have no
//! influence on who actually wins.

use raffle_kernel::random::{pick, RandomSource, StdRandom};

/// Produces one name per frame
#[derive(Debug)]
pub struct NameRoller<R = StdRandom> {
    random: R,
    last: Option<usize>,
}

impl NameRoller<StdRandom> {
    /// Roller seeded from entropy
    #[must_use]
    pub fn new() -> Self {
        Self::with_random(StdRandom::from_entropy())
    }
}

impl Default for NameRoller<StdRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> NameRoller<R> {
    /// Roller over a given random source
    pub fn with_random(random: R) -> Self {
        Self { random, last: None }
    }

    /// Next frame; avoids showing the same name twice in a row when there
    /// is more than one to choose from
    pub fn next_frame<'a>(&mut self, names: &'a [String]) -> Option<&'a str> {
        let indices: Vec<usize> = (0..names.len())
            .filter(|&i| names.len() == 1 || Some(i) != self.last)
            .collect();
        let index = *pick(&mut self.random, &indices)?;
        self.last = Some(index);
        names.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_repeats_consecutively() {
        let names: Vec<String> = ["Ann", "Bob", "Cy"].iter().map(|s| s.to_string()).collect();
        let mut roller = NameRoller::with_random(StdRandom::seeded(11));
        let mut previous = roller.next_frame(&names).unwrap().to_string();
        for _ in 0..50 {
            let current = roller.next_frame(&names).unwrap().to_string();
            assert_ne!(current, previous);
            previous = current;
        }
    }

    #[test]
    fn single_name_repeats() {
        let names = vec!["Solo".to_string()];
        let mut roller = NameRoller::with_random(StdRandom::seeded(1));
        assert_eq!(roller.next_frame(&names), Some("Solo"));
        assert_eq!(roller.next_frame(&names), Some("Solo"));
    }

    #[test]
    fn empty_roster_has_no_frames() {
        let mut roller = NameRoller::new();
        assert_eq!(roller.next_frame(&[]), None);
    }
}
