//! Observable combat events and the combat log.
//!
//! Every state change the presentation layer may want to animate is emitted
//! as a [`CombatEvent`]. The orchestrator also renders each event into a
//! human-readable [`CombatLogEntry`].

use crate::attack::AttackId;
use crate::character::CharacterId;
use crate::combat::CombatResult;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a character as it appears in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: CharacterId,
    pub name: String,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Something that happened during an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    CombatStarted {
        heroes: usize,
        enemies: usize,
    },
    SetupFailed {
        reason: String,
    },
    InitiativeRolled {
        order: Vec<(Participant, u32)>,
    },
    RoundStarted {
        round: u32,
    },
    TurnSkipped {
        actor: Participant,
        status: StatusKind,
    },
    AttackUsed {
        actor: Participant,
        attack: AttackId,
    },
    Hit {
        attacker: Participant,
        target: Participant,
        damage: f64,
        critical: bool,
    },
    Evaded {
        target: Participant,
    },
    ShieldAbsorbed {
        target: Participant,
        amount: f64,
    },
    Healed {
        target: Participant,
        amount: f64,
    },
    ManaRestored {
        target: Participant,
        amount: f64,
    },
    StatusApplied {
        target: Participant,
        status: StatusKind,
    },
    StatusExpired {
        target: Participant,
        status: StatusKind,
    },
    StatusDamage {
        target: Participant,
        status: StatusKind,
        amount: f64,
    },
    Defended {
        actor: Participant,
    },
    StatRaised {
        target: Participant,
        stat: String,
        amount: f64,
    },
    ItemUsed {
        user: Participant,
        target: Participant,
        item: String,
        success: bool,
    },
    Defeated {
        target: Participant,
    },
    ExperienceGained {
        hero: Participant,
        amount: u32,
    },
    LevelUp {
        hero: Participant,
        level: u32,
    },
    LootDropped {
        enemy: Participant,
        item: String,
    },
    LootReceived {
        hero: Participant,
        item: String,
    },
    LootLost {
        item: String,
    },
    FleeAttempted {
        hero: Participant,
        success: bool,
    },
    Enraged {
        actor: Participant,
    },
    UltimateUnleashed {
        actor: Participant,
    },
    Summoned {
        actor: Participant,
        minion: Participant,
    },
    ActionFailed {
        actor: Participant,
        reason: String,
    },
    Waited {
        actor: Participant,
    },
    RoundEnded {
        round: u32,
    },
    CombatEnded {
        result: CombatResult,
        rounds: u32,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::CombatStarted { heroes, enemies } => {
                write!(f, "Combat begins: {heroes} heroes against {enemies} enemies")
            }
            CombatEvent::SetupFailed { reason } => write!(f, "Combat could not start: {reason}"),
            CombatEvent::InitiativeRolled { order } => {
                let order: Vec<String> = order
                    .iter()
                    .map(|(who, roll)| format!("{who} ({roll})"))
                    .collect();
                write!(f, "Turn order: {}", order.join(", "))
            }
            CombatEvent::RoundStarted { round } => write!(f, "--- Round {round} ---"),
            CombatEvent::TurnSkipped { actor, status } => {
                write!(f, "{actor} cannot act ({status})")
            }
            CombatEvent::AttackUsed { actor, attack } => write!(f, "{actor} uses {attack}"),
            CombatEvent::Hit {
                attacker,
                target,
                damage,
                critical,
            } => {
                if *critical {
                    write!(f, "Critical hit! {attacker} deals {damage:.0} damage to {target}")
                } else {
                    write!(f, "{attacker} deals {damage:.0} damage to {target}")
                }
            }
            CombatEvent::Evaded { target } => write!(f, "{target} evades the attack"),
            CombatEvent::ShieldAbsorbed { target, amount } => {
                write!(f, "{target}'s shield absorbs {amount:.0} damage")
            }
            CombatEvent::Healed { target, amount } => {
                write!(f, "{target} recovers {amount:.0} health")
            }
            CombatEvent::ManaRestored { target, amount } => {
                write!(f, "{target} recovers {amount:.0} mana")
            }
            CombatEvent::StatusApplied { target, status } => write!(f, "{target} is now {status}"),
            CombatEvent::StatusExpired { target, status } => {
                write!(f, "{target} is no longer {status}")
            }
            CombatEvent::StatusDamage {
                target,
                status,
                amount,
            } => write!(f, "{target} suffers {amount:.0} damage from being {status}"),
            CombatEvent::Defended { actor } => write!(f, "{actor} takes a defensive stance"),
            CombatEvent::StatRaised {
                target,
                stat,
                amount,
            } => write!(f, "{target}'s {stat} rises by {amount}"),
            CombatEvent::ItemUsed {
                user,
                target,
                item,
                success,
            } => {
                if *success {
                    write!(f, "{user} uses {item} on {target}")
                } else {
                    write!(f, "{user} fails to use {item} on {target}")
                }
            }
            CombatEvent::Defeated { target } => write!(f, "{target} has been defeated"),
            CombatEvent::ExperienceGained { hero, amount } => {
                write!(f, "{hero} gains {amount} experience")
            }
            CombatEvent::LevelUp { hero, level } => write!(f, "{hero} reaches level {level}!"),
            CombatEvent::LootDropped { enemy, item } => write!(f, "{enemy} dropped {item}"),
            CombatEvent::LootReceived { hero, item } => write!(f, "{hero} picks up {item}"),
            CombatEvent::LootLost { item } => write!(f, "{item} could not be picked up"),
            CombatEvent::FleeAttempted { hero, success } => {
                if *success {
                    write!(f, "{hero} fled from combat")
                } else {
                    write!(f, "{hero} failed to flee")
                }
            }
            CombatEvent::Enraged { actor } => write!(f, "{actor} flies into a rage!"),
            CombatEvent::UltimateUnleashed { actor } => {
                write!(f, "{actor} unleashes its ultimate attack!")
            }
            CombatEvent::Summoned { actor, minion } => write!(f, "{actor} summons {minion}"),
            CombatEvent::ActionFailed { actor, reason } => write!(f, "{actor}: {reason}"),
            CombatEvent::Waited { actor } => write!(f, "{actor} waits"),
            CombatEvent::RoundEnded { round } => write!(f, "Round {round} ends"),
            CombatEvent::CombatEnded { result, rounds } => {
                write!(f, "Combat over after {rounds} rounds: {result}")
            }
        }
    }
}

/// A single rendered line of the combat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub round: u32,
    pub event: CombatEvent,
    pub description: String,
}

/// Append-only record of an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round: u32, event: CombatEvent) {
        let description = event.to_string();
        self.entries.push(CombatLogEntry {
            round,
            event,
            description,
        });
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.description.as_str())
    }

    /// The most recent `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> &[CombatLogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
