//! Enemy classes: Skeleton, Orc, Dragon, and the final boss.

use crate::ai::{Difficulty, SpecialAbility};
use crate::attack::{AttackId, AttackType, Strike};
use crate::character::{Character, CharacterId};
use crate::classes::Class;
use crate::combatant::{living_target, ActionContext, ActionOutcome, Combatant, EnemyProfile, Role};
use crate::dice::Dice;
use crate::events::CombatEvent;
use crate::status::{StatusEffect, StatusKind};
use serde::{Deserialize, Serialize};

pub const SKELETON_ATTACKS: &[AttackId] = &[AttackId::BoneStrike, AttackId::Rattle];

pub const ORC_ATTACKS: &[AttackId] = &[AttackId::ClubSmash, AttackId::WildRoar, AttackId::Stomp];

pub const DRAGON_ATTACKS: &[AttackId] = &[
    AttackId::FireBreath,
    AttackId::ClawStrike,
    AttackId::TailSwipe,
    AttackId::TakeFlight,
];

pub const BOSS_ATTACKS: &[AttackId] = &[
    AttackId::ShadowStrike,
    AttackId::SoulRend,
    AttackId::DarkMagic,
    AttackId::Summon,
];

/// Health fraction below which the boss enrages.
pub const BOSS_ENRAGE_THRESHOLD: f64 = 0.3;
/// Offensive turns the boss needs before its ultimate is ready.
pub const BOSS_ULTIMATE_CHARGE: u32 = 3;

const DRAGON_MANA_REGEN: f64 = 15.0;
const FLIGHT_ROUNDS: u32 = 3;
const FLIGHT_DEFENSE_BONUS: f64 = 5.0;

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragonState {
    /// Fraction of incoming damage stopped by scales.
    pub scale_armor: f64,
    /// Further fraction of incoming damage ignored.
    pub ancient_wisdom: f64,
    pub flying: bool,
    pub flight_rounds: u32,
}

impl Default for DragonState {
    fn default() -> Self {
        Self {
            scale_armor: 0.2,
            ancient_wisdom: 0.3,
            flying: false,
            flight_rounds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub ultimate_charge: u32,
    pub used_ultimate: bool,
    pub rage_mode: bool,
    /// Live minions this boss has summoned.
    pub summons: Vec<CharacterId>,
    pub max_summons: usize,
}

impl Default for BossState {
    fn default() -> Self {
        Self {
            ultimate_charge: 0,
            used_ultimate: false,
            rage_mode: false,
            summons: Vec::new(),
            max_summons: 2,
        }
    }
}

impl BossState {
    pub fn can_summon(&self) -> bool {
        self.summons.len() < self.max_summons
    }

    /// Forget minions that are no longer alive.
    pub fn prune_summons(&mut self, is_alive: impl Fn(CharacterId) -> bool) {
        self.summons.retain(|id| is_alive(*id));
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Combatant {
    pub fn skeleton() -> Self {
        Combatant::new(
            Character::new("Skeleton", 40.0, 8.0, 2.0).with_critical_chance(0.05),
            Class::Skeleton,
            Role::Enemy(EnemyProfile::new(Difficulty::Easy, 50)),
        )
    }

    pub fn orc() -> Self {
        Combatant::new(
            Character::new("Orc", 70.0, 12.0, 5.0).with_critical_chance(0.08),
            Class::Orc,
            Role::Enemy(
                EnemyProfile::new(Difficulty::Medium, 100)
                    .with_abilities(vec![SpecialAbility::StatusAttack]),
            ),
        )
    }

    pub fn dragon() -> Self {
        Combatant::new(
            Character::new("Dragon", 150.0, 20.0, 15.0)
                .with_mana(80.0)
                .with_critical_chance(0.15),
            Class::Dragon(DragonState::default()),
            Role::Enemy(EnemyProfile::new(Difficulty::Hard, 500).with_abilities(vec![
                SpecialAbility::AreaAttack,
                SpecialAbility::StatusAttack,
                SpecialAbility::Heal,
            ])),
        )
    }

    pub fn final_boss(name: impl Into<String>) -> Self {
        Combatant::new(
            Character::new(name, 200.0, 25.0, 18.0).with_critical_chance(0.2),
            Class::FinalBoss(BossState::default()),
            Role::Enemy(
                EnemyProfile::new(Difficulty::Nightmare, 1000).with_abilities(vec![
                    SpecialAbility::AreaAttack,
                    SpecialAbility::StatusAttack,
                    SpecialAbility::Summon,
                    SpecialAbility::Ultimate,
                ]),
            ),
        )
    }

    /// A weakened orc called in by the boss.
    pub fn dark_minion() -> Self {
        let mut minion = Combatant::orc().with_name("Dark Minion");
        minion.character.max_health *= 0.7;
        minion.character.health = minion.character.max_health;
        minion.character.attack_power *= 0.8;
        if let Role::Enemy(profile) = &mut minion.role {
            profile.point_value = 0;
        }
        minion
    }
}

// ============================================================================
// Attacks
// ============================================================================

pub(crate) fn skeleton_attack(
    skeleton: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let power = skeleton.character.attack_power;
    let Some(foe) = living_target(foes, target) else {
        return skeleton.fail("has no target", ctx);
    };
    match attack {
        AttackId::Rattle => {
            skeleton.strike(foe, Strike::physical(power * 0.8), ctx);
            if foe.is_alive() && ctx.dice.chance(0.2) {
                foe.apply_status(StatusKind::Paralyzed, 1, 1.0, ctx.events);
            }
        }
        _ => {
            skeleton.strike(foe, Strike::physical(power * 1.1), ctx);
        }
    }
    ActionOutcome::acted()
}

pub(crate) fn orc_attack(
    orc: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let power = orc.character.attack_power;
    let Some(foe) = living_target(foes, target) else {
        return orc.fail("has no target", ctx);
    };
    match attack {
        AttackId::WildRoar => {
            orc.strike(foe, Strike::physical(power * 0.6), ctx);
            if foe.is_alive() {
                foe.apply_status(StatusKind::Cursed, 2, 1.0, ctx.events);
            }
        }
        AttackId::Stomp => {
            orc.strike(foe, Strike::physical(power * 1.1), ctx);
            if foe.is_alive() && ctx.dice.chance(0.3) {
                foe.apply_status(StatusKind::Paralyzed, 1, 1.0, ctx.events);
            }
        }
        _ => {
            orc.strike(foe, Strike::physical(power * 1.3), ctx);
        }
    }
    ActionOutcome::acted()
}

pub(crate) fn dragon_attack(
    dragon: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let power = dragon.character.attack_power;
    let flying = matches!(&dragon.class, Class::Dragon(state) if state.flying);

    if attack == AttackId::TakeFlight {
        if flying {
            return dragon.fail("is already airborne", ctx);
        }
        if let Class::Dragon(state) = &mut dragon.class {
            state.flying = true;
            state.flight_rounds = FLIGHT_ROUNDS;
        }
        dragon.character.defense += FLIGHT_DEFENSE_BONUS;
        dragon.apply_status(StatusKind::Flying, FLIGHT_ROUNDS as i32, 1.0, ctx.events);
        return ActionOutcome::acted();
    }

    if living_target(foes, target).is_none() {
        return dragon.fail("has no target", ctx);
    }
    if attack == AttackId::FireBreath {
        if dragon.character.spend_mana(attack.mana_cost()) {
            dragon.area_strike(foes, Strike::new(power * 1.5 * 0.8, AttackType::Fire), ctx);
            return ActionOutcome::acted();
        }
        ctx.events.push(CombatEvent::ActionFailed {
            actor: dragon.who(),
            reason: "is too exhausted to breathe fire".to_string(),
        });
        return dragon_attack(dragon, AttackId::ClawStrike, target, foes, ctx);
    }

    let Some(foe) = living_target(foes, target) else {
        return ActionOutcome::failed();
    };
    match attack {
        AttackId::TailSwipe => {
            dragon.strike(foe, Strike::physical(power), ctx);
            if foe.is_alive() && ctx.dice.chance(0.4) {
                foe.apply_status(StatusKind::Paralyzed, 2, 1.0, ctx.events);
            }
        }
        _ => {
            let multiplier = if flying { 1.2 * 1.3 } else { 1.2 };
            dragon.strike(foe, Strike::physical(power * multiplier), ctx);
        }
    }
    ActionOutcome::acted()
}

/// Mana regeneration and landing once the flight is over.
pub(crate) fn dragon_round_end(dragon: &mut Combatant, ctx: &mut ActionContext<'_>) {
    let restored = dragon.character.restore_mana(DRAGON_MANA_REGEN);
    if restored > 0.0 {
        ctx.events.push(CombatEvent::ManaRestored {
            target: dragon.who(),
            amount: restored,
        });
    }

    let landed = match &mut dragon.class {
        Class::Dragon(state) if state.flying => {
            state.flight_rounds = state.flight_rounds.saturating_sub(1);
            if state.flight_rounds == 0 {
                state.flying = false;
                true
            } else {
                false
            }
        }
        _ => false,
    };
    if landed {
        dragon.character.defense -= FLIGHT_DEFENSE_BONUS;
        dragon.remove_status(StatusKind::Flying, ctx.events);
    }
}

pub(crate) fn boss_attack(
    boss: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let power = boss.character.attack_power;
    match attack {
        AttackId::Summon => summon_minion(boss, ctx),
        AttackId::UltimateAttack => {
            if let Class::FinalBoss(state) = &mut boss.class {
                state.used_ultimate = true;
                state.ultimate_charge = 0;
            }
            ctx.events.push(CombatEvent::UltimateUnleashed { actor: boss.who() });
            boss.area_strike(foes, Strike::new(power * 3.0 * 0.9, AttackType::Curse), ctx);
            ActionOutcome::acted()
        }
        AttackId::DarkMagic => {
            let Some(foe) = living_target(foes, target) else {
                return boss.fail("has no target", ctx);
            };
            let kinds = [StatusKind::Cursed, StatusKind::Paralyzed, StatusKind::Poisoned];
            let kind = kinds[ctx.dice.below(kinds.len())];
            boss.cast_status(foe, kind, 3, ctx)
        }
        AttackId::SoulRend => {
            let Some(foe) = living_target(foes, target) else {
                return boss.fail("has no target", ctx);
            };
            boss.strike(foe, Strike::new(power * 1.2, AttackType::Curse), ctx);
            if foe.is_alive() {
                foe.apply_status(StatusKind::Cursed, 4, 1.0, ctx.events);
            }
            ActionOutcome::acted()
        }
        _ => {
            let Some(foe) = living_target(foes, target) else {
                return boss.fail("has no target", ctx);
            };
            boss.strike(foe, Strike::physical(power * 1.4), ctx);
            ActionOutcome::acted()
        }
    }
}

fn summon_minion(boss: &mut Combatant, ctx: &mut ActionContext<'_>) -> ActionOutcome {
    let Class::FinalBoss(state) = &mut boss.class else {
        return ActionOutcome::failed();
    };
    if !state.can_summon() {
        return boss.fail("cannot summon more minions", ctx);
    }
    let minion = Combatant::dark_minion();
    state.summons.push(minion.id());
    ctx.events.push(CombatEvent::Summoned {
        actor: boss.who(),
        minion: minion.who(),
    });
    ActionOutcome {
        acted: true,
        summoned: vec![minion],
    }
}

/// Scripted boss behaviour that pre-empts its normal choice: enrage once
/// when badly hurt, then fire the ultimate once fully charged. Returns
/// `Some` when the turn was spent here.
pub(crate) fn boss_gate(
    boss: &mut Combatant,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> Option<ActionOutcome> {
    let health_ratio = boss.character.health_ratio();
    let Class::FinalBoss(state) = &mut boss.class else {
        return None;
    };
    state.ultimate_charge += 1;

    if health_ratio < BOSS_ENRAGE_THRESHOLD && !state.rage_mode {
        state.rage_mode = true;
        boss.character.attack_power *= 1.3;
        boss.character
            .effects
            .insert(StatusEffect::indefinite(StatusKind::BerserkerRage));
        boss.character.refresh_status();
        ctx.events.push(CombatEvent::Enraged { actor: boss.who() });
        return Some(ActionOutcome::acted());
    }

    if state.ultimate_charge >= BOSS_ULTIMATE_CHARGE && !state.used_ultimate {
        return Some(boss_attack(boss, AttackId::UltimateAttack, 0, foes, ctx));
    }
    None
}

/// The boss's own pick: summon when it has no minions, sometimes dark
/// magic, otherwise one of its two strikes.
pub(crate) fn select_boss_attack(state: &BossState, dice: &mut dyn Dice) -> AttackId {
    if state.can_summon() && state.summons.is_empty() {
        return AttackId::Summon;
    }
    if dice.chance(0.3) {
        return AttackId::DarkMagic;
    }
    if dice.below(2) == 0 {
        AttackId::ShadowStrike
    } else {
        AttackId::SoulRend
    }
}
