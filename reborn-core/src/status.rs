//! Status effects and the per-character status ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse character statuses. Each kind can also exist as a timed
/// [`StatusEffect`] instance in a [`StatusLedger`], except `Defeated`,
/// which is derived from health alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Healthy,
    Wounded,
    Cursed,
    Paralyzed,
    Poisoned,
    Defeated,
    BerserkerRage,
    Defending,
    Stealthed,
    Flying,
}

impl StatusKind {
    /// Order in which active effects determine the displayed status.
    pub const PRIORITY: [StatusKind; 9] = [
        StatusKind::Paralyzed,
        StatusKind::Cursed,
        StatusKind::Poisoned,
        StatusKind::BerserkerRage,
        StatusKind::Defending,
        StatusKind::Stealthed,
        StatusKind::Flying,
        StatusKind::Wounded,
        StatusKind::Healthy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Healthy => "Healthy",
            StatusKind::Wounded => "Wounded",
            StatusKind::Cursed => "Cursed",
            StatusKind::Paralyzed => "Paralyzed",
            StatusKind::Poisoned => "Poisoned",
            StatusKind::Defeated => "Defeated",
            StatusKind::BerserkerRage => "Berserker Rage",
            StatusKind::Defending => "Defending",
            StatusKind::Stealthed => "Stealthed",
            StatusKind::Flying => "Flying",
        }
    }

    /// Harmful statuses, the ones a cleansing item removes.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            StatusKind::Cursed | StatusKind::Paralyzed | StatusKind::Poisoned | StatusKind::Defeated
        )
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An active, timed status on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Rounds left; [`StatusEffect::INDEFINITE`] never expires on its own.
    pub remaining: i32,
    pub intensity: f64,
}

impl StatusEffect {
    pub const INDEFINITE: i32 = -1;

    pub fn new(kind: StatusKind, remaining: i32, intensity: f64) -> Self {
        Self {
            kind,
            remaining,
            intensity: intensity.max(0.0),
        }
    }

    pub fn indefinite(kind: StatusKind) -> Self {
        Self::new(kind, Self::INDEFINITE, 1.0)
    }

    pub fn is_indefinite(&self) -> bool {
        self.remaining == Self::INDEFINITE
    }

    /// Count down one round. Returns whether the effect is still active.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.remaining > 0
        } else {
            self.is_indefinite()
        }
    }
}

/// Ordered collection of active status effects, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Append an effect. Returns false (and changes nothing) when an
    /// instance of that kind is already active.
    pub fn insert(&mut self, effect: StatusEffect) -> bool {
        if self.has(effect.kind) {
            return false;
        }
        self.effects.push(effect);
        true
    }

    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Remove every negative effect, returning the kinds that were removed.
    pub fn clear_negative(&mut self) -> Vec<StatusKind> {
        let removed: Vec<StatusKind> = self
            .effects
            .iter()
            .filter(|e| e.kind.is_negative())
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.kind.is_negative());
        removed
    }

    /// Count every effect down by one round, returning the kinds that expired.
    pub fn tick_all(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            let active = effect.tick();
            if !active {
                expired.push(effect.kind);
            }
            active
        });
        expired
    }

    /// The status to display: the highest-priority active effect, or a
    /// health-derived fallback.
    pub fn prevailing(&self, health_ratio: f64) -> StatusKind {
        StatusKind::PRIORITY
            .iter()
            .copied()
            .find(|kind| self.has(*kind))
            .unwrap_or(if health_ratio < 0.25 {
                StatusKind::Wounded
            } else {
                StatusKind::Healthy
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
