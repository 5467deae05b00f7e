//! Attack types, the attack catalogue, and strike descriptions.

use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chance that a typed attack inflicts its correlated status.
pub const DEFAULT_STATUS_PROC_CHANCE: f64 = 0.3;

/// Rounds a type-correlated status lasts.
pub const TYPE_STATUS_DURATION: i32 = 3;

/// Damage types. Each carries a multiplier and possibly a status it can
/// inflict on hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    Physical,
    Magical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Curse,
}

impl AttackType {
    pub fn name(&self) -> &'static str {
        match self {
            AttackType::Physical => "Physical",
            AttackType::Magical => "Magical",
            AttackType::Fire => "Fire",
            AttackType::Ice => "Ice",
            AttackType::Lightning => "Lightning",
            AttackType::Poison => "Poison",
            AttackType::Curse => "Curse",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            AttackType::Physical => 1.0,
            AttackType::Magical => 1.1,
            AttackType::Fire => 1.2,
            AttackType::Ice => 0.9,
            AttackType::Lightning => 1.3,
            AttackType::Poison => 0.8,
            AttackType::Curse => 0.7,
        }
    }

    pub fn inflicted_status(&self) -> Option<StatusKind> {
        match self {
            AttackType::Ice => Some(StatusKind::Paralyzed),
            AttackType::Poison => Some(StatusKind::Poisoned),
            AttackType::Curse => Some(StatusKind::Cursed),
            _ => None,
        }
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Every named attack in the game. Each belongs to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackId {
    // Mage
    Fireball,
    IceAttack,
    LightningStrike,
    Meteor,
    // Warrior
    SwordStrike,
    ShieldBash,
    Whirlwind,
    BerserkerRage,
    // Rogue
    DaggerStrike,
    PoisonBlade,
    Assassinate,
    Hide,
    // Skeleton
    BoneStrike,
    Rattle,
    // Orc
    ClubSmash,
    WildRoar,
    Stomp,
    // Dragon
    FireBreath,
    ClawStrike,
    TailSwipe,
    TakeFlight,
    // Final boss
    ShadowStrike,
    SoulRend,
    DarkMagic,
    Summon,
    UltimateAttack,
}

impl AttackId {
    pub fn name(&self) -> &'static str {
        match self {
            AttackId::Fireball => "Fireball",
            AttackId::IceAttack => "Ice Attack",
            AttackId::LightningStrike => "Lightning Strike",
            AttackId::Meteor => "Meteor",
            AttackId::SwordStrike => "Sword Strike",
            AttackId::ShieldBash => "Shield Bash",
            AttackId::Whirlwind => "Whirlwind",
            AttackId::BerserkerRage => "Berserker Rage",
            AttackId::DaggerStrike => "Dagger Strike",
            AttackId::PoisonBlade => "Poison Blade",
            AttackId::Assassinate => "Assassinate",
            AttackId::Hide => "Hide",
            AttackId::BoneStrike => "Bone Strike",
            AttackId::Rattle => "Rattle",
            AttackId::ClubSmash => "Club Smash",
            AttackId::WildRoar => "Wild Roar",
            AttackId::Stomp => "Stomp",
            AttackId::FireBreath => "Fire Breath",
            AttackId::ClawStrike => "Claw Strike",
            AttackId::TailSwipe => "Tail Swipe",
            AttackId::TakeFlight => "Take Flight",
            AttackId::ShadowStrike => "Shadow Strike",
            AttackId::SoulRend => "Soul Rend",
            AttackId::DarkMagic => "Dark Magic",
            AttackId::Summon => "Summon",
            AttackId::UltimateAttack => "Ultimate Attack",
        }
    }

    /// Mana spent when the attack is used. Zero for physical attacks.
    pub fn mana_cost(&self) -> f64 {
        match self {
            AttackId::Fireball => 15.0,
            AttackId::IceAttack => 20.0,
            AttackId::LightningStrike => 25.0,
            AttackId::Meteor => 40.0,
            AttackId::FireBreath => 25.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single hit about to be resolved against one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: f64,
    pub attack_type: AttackType,
    /// Added to the attacker's critical chance for this hit only.
    pub crit_bonus: f64,
}

impl Strike {
    pub fn new(damage: f64, attack_type: AttackType) -> Self {
        Self {
            damage,
            attack_type,
            crit_bonus: 0.0,
        }
    }

    pub fn physical(damage: f64) -> Self {
        Self::new(damage, AttackType::Physical)
    }

    pub fn with_crit_bonus(mut self, bonus: f64) -> Self {
        self.crit_bonus = bonus;
        self
    }
}

/// What happened to the target's health when damage came in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageReport {
    pub incoming: f64,
    pub absorbed: f64,
    pub evaded: bool,
    pub health_lost: f64,
    pub defeated: bool,
}

/// Result of resolving one [`Strike`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrikeOutcome {
    /// False when the attacker was incapacitated and nothing happened.
    pub landed: bool,
    pub critical: bool,
    /// Damage after attacker-side modifiers, before target reductions.
    pub raw: f64,
    pub damage: DamageReport,
    pub status_applied: Option<StatusKind>,
}
