//! The shared character record: vitals, combat stats, and status.
//!
//! Variant-specific behaviour (shields, evasion, reduction overrides) lives
//! in [`crate::combatant`]; this module only knows the base rules.

use crate::status::{StatusEffect, StatusKind, StatusLedger};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Health fraction below which a character counts as wounded.
pub const WOUNDED_THRESHOLD: f64 = 0.25;

/// Poison damage per round at intensity 1.
pub const POISON_TICK_DAMAGE: f64 = 5.0;

/// Curse damage per round as a fraction of max health at intensity 1.
pub const CURSE_TICK_FRACTION: f64 = 0.1;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Character
// ============================================================================

/// A participant's base record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub attack_power: f64,
    pub defense: f64,
    pub critical_chance: f64,
    pub is_defending: bool,
    /// Coarse status shown to the player.
    pub status: StatusKind,
    pub effects: StatusLedger,
}

impl Character {
    pub fn new(name: impl Into<String>, max_health: f64, attack_power: f64, defense: f64) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            health: max_health,
            max_health,
            mana: 100.0,
            max_mana: 100.0,
            attack_power,
            defense,
            critical_chance: 0.1,
            is_defending: false,
            status: StatusKind::Healthy,
            effects: StatusLedger::new(),
        }
    }

    pub fn with_mana(mut self, max_mana: f64) -> Self {
        self.max_mana = max_mana;
        self.mana = max_mana;
        self
    }

    pub fn with_critical_chance(mut self, chance: f64) -> Self {
        self.critical_chance = chance;
        self
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    /// Defeated or paralyzed characters cannot act.
    pub fn is_incapacitated(&self) -> bool {
        self.is_defeated() || self.effects.has(StatusKind::Paralyzed)
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        match kind {
            StatusKind::Defeated => self.is_defeated(),
            _ => self.effects.has(kind),
        }
    }

    /// Flat defense reduction, the last step of every reduction chain.
    pub fn base_reduction(&self, incoming: f64) -> f64 {
        let bonus = if self.is_defending {
            self.defense * 0.5
        } else {
            0.0
        };
        (incoming - (self.defense + bonus)).max(0.0)
    }

    /// Subtract already-reduced damage. Returns the health actually lost.
    pub fn lose_health(&mut self, amount: f64) -> f64 {
        let lost = amount.max(0.0).min(self.health);
        self.health -= lost;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.status = StatusKind::Defeated;
        } else if self.health_ratio() < WOUNDED_THRESHOLD {
            self.effects.insert(StatusEffect::indefinite(StatusKind::Wounded));
            self.refresh_status();
        }
        lost
    }

    /// Restore health up to the maximum. Does nothing to a defeated
    /// character. Returns the amount healed.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if self.is_defeated() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        if self.health_ratio() > WOUNDED_THRESHOLD && self.effects.remove(StatusKind::Wounded) {
            self.refresh_status();
        }
        self.health - before
    }

    /// Bring a defeated character back with a fraction of max health.
    pub fn revive(&mut self, fraction: f64) -> f64 {
        if !self.is_defeated() {
            return 0.0;
        }
        self.health = (self.max_health * fraction).clamp(1.0, self.max_health);
        self.refresh_status();
        self.health
    }

    pub fn has_mana(&self, cost: f64) -> bool {
        self.mana >= cost
    }

    pub fn spend_mana(&mut self, cost: f64) -> bool {
        if !self.has_mana(cost) {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Returns the mana actually restored.
    pub fn restore_mana(&mut self, amount: f64) -> f64 {
        let before = self.mana;
        self.mana = (self.mana + amount.max(0.0)).min(self.max_mana);
        self.mana - before
    }

    /// Add a status effect. Re-applying an active kind is a no-op, and
    /// `Defeated` can only come from losing all health.
    pub fn apply_status(&mut self, kind: StatusKind, duration: i32, intensity: f64) -> bool {
        if kind == StatusKind::Defeated || self.is_defeated() {
            return false;
        }
        if !self.effects.insert(StatusEffect::new(kind, duration, intensity)) {
            return false;
        }
        if kind != StatusKind::Healthy {
            self.status = kind;
        }
        true
    }

    pub fn remove_status(&mut self, kind: StatusKind) -> bool {
        if !self.effects.remove(kind) {
            return false;
        }
        if kind == StatusKind::Defending {
            self.is_defending = false;
        }
        self.refresh_status();
        true
    }

    /// Recompute the coarse status from health and the ledger.
    pub fn refresh_status(&mut self) {
        self.status = if self.is_defeated() {
            StatusKind::Defeated
        } else {
            self.effects.prevailing(self.health_ratio())
        };
    }

    /// Damage owed this round by damage-over-time effects, in ledger order.
    pub fn status_tick_damage(&self) -> Vec<(StatusKind, f64)> {
        self.effects
            .iter()
            .filter_map(|effect| match effect.kind {
                StatusKind::Poisoned => Some((effect.kind, POISON_TICK_DAMAGE * effect.intensity)),
                StatusKind::Cursed => Some((
                    effect.kind,
                    self.max_health * CURSE_TICK_FRACTION * effect.intensity,
                )),
                _ => None,
            })
            .collect()
    }

    /// Count every effect down one round. Returns the kinds that expired.
    pub fn tick_effects(&mut self) -> Vec<StatusKind> {
        let expired = self.effects.tick_all();
        if expired.contains(&StatusKind::Defending) {
            self.is_defending = false;
        }
        self.refresh_status();
        expired
    }

    pub fn clear_defending(&mut self) {
        self.is_defending = false;
        self.effects.remove(StatusKind::Defending);
        self.refresh_status();
    }
}
