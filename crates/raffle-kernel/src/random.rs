//! Injectable randomness
//!
//! The controller never touches a global RNG; every pick goes through a
//! [`RandomSource`] so tests can script outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform index picker
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Pick an index uniformly in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Pick one element of `items` uniformly
pub fn pick<'a, T, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    // Clamp so a misbehaving source cannot index out of bounds
    let index = rng.pick_index(items.len()).min(items.len() - 1);
    items.get(index)
}

/// [`RandomSource`] backed by `rand`'s standard RNG
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seed from OS entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source for reproducible runs
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_agree() {
        let mut a = StdRandom::seeded(7);
        let mut b = StdRandom::seeded(7);
        let xs: Vec<_> = (0..16).map(|_| a.pick_index(10)).collect();
        let ys: Vec<_> = (0..16).map(|_| b.pick_index(10)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&i| i < 10));
    }

    #[test]
    fn pick_empty_is_none() {
        let mut rng = MockRandomSource::new();
        rng.expect_pick_index().never();
        assert!(pick::<u8, _>(&mut rng, &[]).is_none());
    }

    #[test]
    fn pick_clamps_out_of_range() {
        let mut rng = MockRandomSource::new();
        rng.expect_pick_index().returning(|len| len + 5);
        assert_eq!(pick(&mut rng, &["a", "b"]), Some(&"b"));
    }
}
