//! Rules knobs for an encounter.

use crate::attack::DEFAULT_STATUS_PROC_CHANCE;
use serde::{Deserialize, Serialize};

/// Tunable combat rules.
///
/// ```
/// use reborn_core::CombatConfig;
///
/// let config = CombatConfig::new()
///     .with_flee_chance(1.0)
///     .with_type_multipliers(true);
/// assert_eq!(config.flee_chance, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Probability that a flee attempt succeeds.
    pub flee_chance: f64,
    /// Damage multiplier on a critical hit.
    pub crit_multiplier: f64,
    /// Probability that a typed hit inflicts its correlated status.
    pub status_proc_chance: f64,
    /// Scale damage by the attack type's table multiplier.
    pub type_multipliers: bool,
    /// Experience awarded per defeated enemy is its point value divided by this.
    pub experience_divisor: u32,
    /// Round cap for [`crate::CombatManager::run_to_completion`].
    pub max_rounds: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            flee_chance: 0.7,
            crit_multiplier: 1.5,
            status_proc_chance: DEFAULT_STATUS_PROC_CHANCE,
            type_multipliers: false,
            experience_divisor: 10,
            max_rounds: 100,
        }
    }
}

impl CombatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flee_chance(mut self, chance: f64) -> Self {
        self.flee_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_crit_multiplier(mut self, multiplier: f64) -> Self {
        self.crit_multiplier = multiplier;
        self
    }

    pub fn with_status_proc_chance(mut self, chance: f64) -> Self {
        self.status_proc_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_type_multipliers(mut self, enabled: bool) -> Self {
        self.type_multipliers = enabled;
        self
    }

    pub fn with_experience_divisor(mut self, divisor: u32) -> Self {
        self.experience_divisor = divisor.max(1);
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }
}
