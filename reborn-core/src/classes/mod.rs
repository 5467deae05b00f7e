//! Character classes: heroes and enemies.
//!
//! A [`Class`] carries only the state its variant needs. Behaviour is
//! dispatched on the variant tag and an [`AttackId`], never on strings.

pub mod capabilities;
pub mod enemies;
pub mod heroes;

pub use capabilities::Capabilities;
pub use enemies::{BossState, DragonState};
pub use heroes::{MageState, RogueState, WarriorState};

use crate::attack::AttackId;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class tag without state, used for targeting preferences and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Mage,
    Warrior,
    Rogue,
    Skeleton,
    Orc,
    Dragon,
    FinalBoss,
}

impl ClassKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::Mage => "Mage",
            ClassKind::Warrior => "Warrior",
            ClassKind::Rogue => "Rogue",
            ClassKind::Skeleton => "Skeleton",
            ClassKind::Orc => "Orc",
            ClassKind::Dragon => "Dragon",
            ClassKind::FinalBoss => "Final Boss",
        }
    }

    pub fn is_hero(&self) -> bool {
        matches!(self, ClassKind::Mage | ClassKind::Warrior | ClassKind::Rogue)
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A class together with its variant-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Class {
    Mage(MageState),
    Warrior(WarriorState),
    Rogue(RogueState),
    Skeleton,
    Orc,
    Dragon(DragonState),
    FinalBoss(BossState),
}

impl Class {
    pub fn kind(&self) -> ClassKind {
        match self {
            Class::Mage(_) => ClassKind::Mage,
            Class::Warrior(_) => ClassKind::Warrior,
            Class::Rogue(_) => ClassKind::Rogue,
            Class::Skeleton => ClassKind::Skeleton,
            Class::Orc => ClassKind::Orc,
            Class::Dragon(_) => ClassKind::Dragon,
            Class::FinalBoss(_) => ClassKind::FinalBoss,
        }
    }

    /// The class's attacks in menu order. The last one is the special.
    pub fn attacks(&self) -> &'static [AttackId] {
        match self {
            Class::Mage(_) => heroes::MAGE_ATTACKS,
            Class::Warrior(_) => heroes::WARRIOR_ATTACKS,
            Class::Rogue(_) => heroes::ROGUE_ATTACKS,
            Class::Skeleton => enemies::SKELETON_ATTACKS,
            Class::Orc => enemies::ORC_ATTACKS,
            Class::Dragon(_) => enemies::DRAGON_ATTACKS,
            Class::FinalBoss(_) => enemies::BOSS_ATTACKS,
        }
    }

    pub fn knows(&self, attack: AttackId) -> bool {
        self.attacks().contains(&attack) || self.hidden_attacks().contains(&attack)
    }

    /// Attacks the class can execute that never show up in its menu.
    fn hidden_attacks(&self) -> &'static [AttackId] {
        match self {
            Class::FinalBoss(_) => &[AttackId::UltimateAttack],
            _ => &[],
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Class::Mage(_) => {
                Capabilities::MANA_USER
                    | Capabilities::HEALER
                    | Capabilities::AREA_ATTACKER
                    | Capabilities::STATUS_CASTER
            }
            Class::Warrior(_) => Capabilities::STATUS_RESISTANT,
            Class::Rogue(_) => Capabilities::STATUS_CASTER,
            Class::Skeleton | Class::Orc => Capabilities::empty(),
            Class::Dragon(_) => {
                Capabilities::MANA_USER | Capabilities::AREA_ATTACKER | Capabilities::STATUS_CASTER
            }
            Class::FinalBoss(_) => {
                Capabilities::AREA_ATTACKER | Capabilities::STATUS_CASTER | Capabilities::SUMMONER
            }
        }
    }

    pub fn resists(&self, kind: StatusKind) -> bool {
        match self {
            Class::Warrior(state) => state.resistances.contains(&kind),
            _ => false,
        }
    }

    /// Variant reduction applied before the base defense step.
    pub fn pre_reduction(&self, incoming: f64) -> f64 {
        match self {
            Class::Mage(state) => incoming * (1.0 - state.magical_resistance),
            Class::Dragon(state) => {
                incoming - incoming * state.scale_armor - incoming * state.ancient_wisdom
            }
            _ => incoming,
        }
    }
}
