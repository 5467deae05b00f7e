//! Randomness for combat resolution.
//!
//! Every random draw in an encounter goes through a single [`Dice`] source
//! so that fights can be replayed from a seed or scripted in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of random numbers.
///
/// Implementors only provide [`Dice::unit`] and [`Dice::below`]; the other
/// draws are derived from those two.
pub trait Dice {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[0, upper)`. `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize;

    /// Returns true with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Roll a twenty-sided die, 1 through 20.
    fn d20(&mut self) -> u32 {
        self.below(20) as u32 + 1
    }

    /// Uniform integer in `[low, high]`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.below((high - low + 1) as usize) as u32
    }

    /// Uniform index into a collection of `len` elements, `None` when empty.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.below(len))
        }
    }
}

/// Dice backed by a seedable standard RNG.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Deterministic dice: the same seed replays the same encounter.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for SeededDice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Dice for SeededDice {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }
}
