use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of every random decision made during a battle.
pub trait BattleRng {
    /// Uniform integer in `min..=max`. `reason` only feeds diagnostics.
    fn range(&mut self, min: i32, max: i32, reason: &str) -> i32;

    /// Uniformly permutes `indices` in place.
    fn shuffle(&mut self, indices: &mut [usize]);
}

/// Production RNG backed by a seedable `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl BattleRng for SeededRng {
    fn range(&mut self, min: i32, max: i32, reason: &str) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let value = self.inner.random_range(low..=high);
        tracing::trace!(value, min, max, reason, "rng draw");
        value
    }

    fn shuffle(&mut self, indices: &mut [usize]) {
        indices.shuffle(&mut self.inner);
    }
}

/// Scripted RNG for tests: replays a fixed list of outcomes in order.
///
/// Each outcome is clamped into the requested range, and shuffles leave the
/// submission order untouched, so a test fully controls every roll.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<i32>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<i32>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Number of scripted outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.len().saturating_sub(self.index)
    }

    pub fn next_outcome(&mut self, reason: &str) -> i32 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}

impl BattleRng for TurnRng {
    fn range(&mut self, min: i32, max: i32, reason: &str) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.next_outcome(reason).clamp(low, high)
    }

    fn shuffle(&mut self, _indices: &mut [usize]) {}
}
