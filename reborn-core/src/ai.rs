//! Decision policies for computer-controlled characters.
//!
//! Choosing is pure: [`choose_action`], [`select_target`] and
//! [`choose_hero_command`] only read state and draw from the dice.
//! [`execute`] then carries out an enemy's choice.

use crate::attack::{AttackId, AttackType, Strike};
use crate::classes::{enemies, Class, ClassKind};
use crate::combat::{HeroCommand, ItemTarget};
use crate::combatant::{living_target, ActionContext, ActionOutcome, Combatant};
use crate::dice::Dice;
use crate::events::CombatEvent;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of max health restored by an enemy's self-heal.
pub const SELF_HEAL_FRACTION: f64 = 0.3;
/// Attack multiplier of the generic area attack.
pub const AREA_ATTACK_MULTIPLIER: f64 = 0.7;
/// Attack multiplier of the generic status attack.
pub const STATUS_ATTACK_MULTIPLIER: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional enemy behaviours the policy may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    Heal,
    AreaAttack,
    StatusAttack,
    Summon,
    Ultimate,
}

/// What an enemy decided to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Wait,
    HealSelf,
    AreaAttack,
    StatusAttack { target: usize },
    Attack { attack: AttackId, target: usize },
}

fn living_count(foes: &[Combatant]) -> usize {
    foes.iter().filter(|f| f.is_alive()).count()
}

fn random_living(foes: &[Combatant], dice: &mut dyn Dice) -> Option<usize> {
    let living: Vec<usize> = foes
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_alive())
        .map(|(i, _)| i)
        .collect();
    dice.pick_index(living.len()).map(|i| living[i])
}

fn weakest_living(foes: &[Combatant]) -> Option<usize> {
    foes.iter()
        .enumerate()
        .filter(|(_, f)| f.is_alive())
        .min_by(|(_, a), (_, b)| {
            a.character
                .health_ratio()
                .total_cmp(&b.character.health_ratio())
        })
        .map(|(i, _)| i)
}

/// Pick a target among living foes. Easy picks at random, medium goes for
/// the weakest, hard and nightmare hunt mages, then rogues, then the
/// weakest.
pub fn select_target(
    difficulty: Difficulty,
    foes: &[Combatant],
    dice: &mut dyn Dice,
) -> Option<usize> {
    match difficulty {
        Difficulty::Easy => random_living(foes, dice),
        Difficulty::Medium => weakest_living(foes),
        Difficulty::Hard | Difficulty::Nightmare => {
            for preferred in [ClassKind::Mage, ClassKind::Rogue] {
                if let Some(i) = foes
                    .iter()
                    .position(|f| f.is_alive() && f.kind() == preferred)
                {
                    return Some(i);
                }
            }
            weakest_living(foes)
        }
    }
}

/// Decide an enemy's action for this turn.
pub fn choose_action(actor: &Combatant, foes: &[Combatant], dice: &mut dyn Dice) -> AiAction {
    let Some(profile) = actor.enemy() else {
        return AiAction::Wait;
    };
    let Some(target) = select_target(profile.difficulty, foes, dice) else {
        return AiAction::Wait;
    };
    let attacks = actor.class.attacks();
    let health = actor.character.health_ratio();
    let living = living_count(foes);

    match profile.difficulty {
        Difficulty::Easy => match dice.pick_index(attacks.len()) {
            Some(i) => AiAction::Attack {
                attack: attacks[i],
                target,
            },
            None => AiAction::Wait,
        },
        Difficulty::Medium => {
            if health < 0.3 && actor.has_ability(SpecialAbility::Heal) {
                AiAction::HealSelf
            } else if living > 2 && actor.has_ability(SpecialAbility::AreaAttack) {
                AiAction::AreaAttack
            } else {
                match dice.pick_index(attacks.len()) {
                    Some(i) => AiAction::Attack {
                        attack: attacks[i],
                        target,
                    },
                    None => AiAction::Wait,
                }
            }
        }
        Difficulty::Hard | Difficulty::Nightmare => {
            let any_healthy = foes
                .iter()
                .any(|f| f.is_alive() && f.character.status == StatusKind::Healthy);
            if health < 0.2 && actor.has_ability(SpecialAbility::Heal) {
                AiAction::HealSelf
            } else if living > 1 && actor.has_ability(SpecialAbility::AreaAttack) {
                AiAction::AreaAttack
            } else if any_healthy && actor.has_ability(SpecialAbility::StatusAttack) {
                AiAction::StatusAttack { target }
            } else {
                match attacks.first() {
                    Some(attack) => AiAction::Attack {
                        attack: *attack,
                        target,
                    },
                    None => AiAction::Wait,
                }
            }
        }
    }
}

/// Carry out an enemy's chosen action. The final boss's scripted gates run
/// first on offensive turns and may replace the choice.
pub fn execute(
    actor: &mut Combatant,
    action: AiAction,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if actor.character.is_incapacitated() {
        return ActionOutcome::failed();
    }
    if action != AiAction::Wait && action != AiAction::HealSelf {
        if let Some(outcome) = enemies::boss_gate(actor, foes, ctx) {
            return outcome;
        }
    }

    let power = actor.character.attack_power;
    match action {
        AiAction::Wait => {
            ctx.events.push(CombatEvent::Waited { actor: actor.who() });
            ActionOutcome::failed()
        }
        AiAction::HealSelf => {
            let amount = actor.character.max_health * SELF_HEAL_FRACTION;
            actor.heal(amount, ctx.events);
            ActionOutcome::acted()
        }
        AiAction::AreaAttack => {
            let strike = Strike::physical(power * AREA_ATTACK_MULTIPLIER);
            actor.area_strike(foes, strike, ctx);
            ActionOutcome::acted()
        }
        AiAction::StatusAttack { target } => match living_target(foes, target) {
            Some(foe) => {
                let strike = Strike::new(power * STATUS_ATTACK_MULTIPLIER, AttackType::Curse);
                actor.strike(foe, strike, ctx);
                ActionOutcome::acted()
            }
            None => actor.fail("has no target", ctx),
        },
        AiAction::Attack { attack, target } => {
            let attack = match &actor.class {
                Class::FinalBoss(state) => enemies::select_boss_attack(state, ctx.dice),
                _ => attack,
            };
            actor.perform_attack(attack, target, foes, ctx)
        }
    }
}

/// Automatic play for a hero: drink a healing item when low, otherwise
/// the class's signature move when it is ready, otherwise a random attack
/// from the whole list on a random living enemy.
pub fn choose_hero_command(hero: &Combatant, foes: &[Combatant], dice: &mut dyn Dice) -> HeroCommand {
    if hero.character.health_ratio() < 0.3 {
        if let Some(slot) = hero
            .inventory()
            .and_then(|inv| inv.first_healing_slot())
        {
            return HeroCommand::UseItem {
                slot,
                target: ItemTarget::Myself,
            };
        }
    }

    let Some(target) = random_living(foes, dice) else {
        return HeroCommand::Wait;
    };
    let attacks = hero.class.attacks();
    let special = attacks.len().saturating_sub(1);

    let use_special = match &hero.class {
        Class::Mage(_) => attacks
            .last()
            .map(|a| hero.character.has_mana(a.mana_cost()))
            .unwrap_or(false),
        Class::Warrior(state) => state.rage >= crate::classes::heroes::BERSERK_RAGE_COST,
        Class::Rogue(state) => !state.stealthed && dice.chance(0.3),
        _ => false,
    };
    if use_special {
        return HeroCommand::Attack {
            index: special,
            target,
        };
    }

    let index = dice.pick_index(attacks.len()).unwrap_or(0);
    HeroCommand::Attack { index, target }
}
