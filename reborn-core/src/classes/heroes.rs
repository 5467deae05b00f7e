//! Playable classes: Mage, Warrior, Rogue.

use crate::attack::{AttackId, AttackType, Strike};
use crate::character::Character;
use crate::classes::{Capabilities, Class};
use crate::combatant::{living_target, ActionContext, ActionOutcome, Combatant, HeroProfile, Role};
use crate::events::CombatEvent;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};

pub const MAGE_ATTACKS: &[AttackId] = &[
    AttackId::Fireball,
    AttackId::IceAttack,
    AttackId::LightningStrike,
    AttackId::Meteor,
];

pub const WARRIOR_ATTACKS: &[AttackId] = &[
    AttackId::SwordStrike,
    AttackId::ShieldBash,
    AttackId::Whirlwind,
    AttackId::BerserkerRage,
];

pub const ROGUE_ATTACKS: &[AttackId] = &[
    AttackId::DaggerStrike,
    AttackId::PoisonBlade,
    AttackId::Assassinate,
    AttackId::Hide,
];

/// Rage gained per point of incoming damage.
pub const RAGE_PER_DAMAGE: f64 = 0.3;
/// Rage gained for every attack the warrior makes.
pub const RAGE_PER_ATTACK: f64 = 5.0;
/// Rage needed to go berserk.
pub const BERSERK_RAGE_COST: f64 = 50.0;
/// Fraction of max shield restored by defending.
pub const DEFEND_SHIELD_FRACTION: f64 = 0.2;
/// Fraction of max shield restored every round.
pub const SHIELD_REGEN_FRACTION: f64 = 0.1;

const MAGE_MANA_REGEN: f64 = 10.0;
const STEALTH_ROUNDS: u32 = 3;

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MageState {
    pub spell_power: f64,
    /// Fraction of incoming damage ignored before defense applies.
    pub magical_resistance: f64,
}

impl Default for MageState {
    fn default() -> Self {
        Self {
            spell_power: 15.0,
            magical_resistance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarriorState {
    pub shield: f64,
    pub max_shield: f64,
    pub rage: f64,
    pub max_rage: f64,
    pub resistances: Vec<StatusKind>,
    /// Attack and defense to restore when berserker rage ends.
    pub rage_snapshot: Option<(f64, f64)>,
}

impl Default for WarriorState {
    fn default() -> Self {
        Self {
            shield: 30.0,
            max_shield: 30.0,
            rage: 0.0,
            max_rage: 100.0,
            resistances: vec![StatusKind::Paralyzed, StatusKind::Cursed],
            rage_snapshot: None,
        }
    }
}

impl WarriorState {
    /// Soak up to `amount` with the shield. Returns what was absorbed.
    pub fn absorb(&mut self, amount: f64) -> f64 {
        let absorbed = self.shield.min(amount.max(0.0));
        self.shield -= absorbed;
        absorbed
    }

    pub fn build_rage(&mut self, amount: f64) {
        self.rage = (self.rage + amount).min(self.max_rage);
    }

    pub fn restore_shield(&mut self, fraction: f64) {
        self.shield = (self.shield + self.max_shield * fraction).min(self.max_shield);
    }

    pub fn is_raging(&self) -> bool {
        self.rage_snapshot.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RogueState {
    pub agility: f64,
    pub stealthed: bool,
    pub stealth_rounds: u32,
    pub poison_stacks: u32,
}

impl Default for RogueState {
    fn default() -> Self {
        Self {
            agility: 18.0,
            stealthed: false,
            stealth_rounds: 0,
            poison_stacks: 0,
        }
    }
}

impl RogueState {
    pub fn evasion_chance(&self) -> f64 {
        self.agility / 100.0
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Combatant {
    pub fn mage(name: impl Into<String>) -> Self {
        Combatant::new(
            Character::new(name, 80.0, 12.0, 5.0).with_critical_chance(0.15),
            Class::Mage(MageState::default()),
            Role::Hero(HeroProfile::default()),
        )
    }

    pub fn warrior(name: impl Into<String>) -> Self {
        Combatant::new(
            Character::new(name, 120.0, 18.0, 12.0).with_critical_chance(0.12),
            Class::Warrior(WarriorState::default()),
            Role::Hero(HeroProfile::default()),
        )
    }

    pub fn rogue(name: impl Into<String>) -> Self {
        Combatant::new(
            Character::new(name, 90.0, 15.0, 8.0).with_critical_chance(0.25),
            Class::Rogue(RogueState::default()),
            Role::Hero(HeroProfile::default()),
        )
    }

    /// Heal an ally, or the caster when `target` is `None`. Costs half the
    /// amount in mana.
    pub fn cast_heal(
        &mut self,
        target: Option<&mut Combatant>,
        amount: f64,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        if !self.class.capabilities().contains(Capabilities::HEALER) {
            return self.fail("cannot heal", ctx);
        }
        if self.character.is_incapacitated() {
            return ActionOutcome::failed();
        }
        if !self.character.spend_mana(amount * 0.5) {
            return self.fail("not enough mana to heal", ctx);
        }
        match target {
            Some(ally) => {
                if ally.heal(amount, ctx.events) <= 0.0 {
                    return self.fail("the heal had no effect", ctx);
                }
            }
            None => {
                self.heal(amount, ctx.events);
            }
        }
        ActionOutcome::acted()
    }

    /// Put a status on a target for `duration` rounds, paid in mana.
    ///
    /// Each caster class has its own repertoire; anything outside it fails.
    pub fn cast_status(
        &mut self,
        target: &mut Combatant,
        kind: StatusKind,
        duration: i32,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        if !self.class.capabilities().contains(Capabilities::STATUS_CASTER) {
            return self.fail("cannot cast status effects", ctx);
        }
        if !castable_statuses(&self.class).contains(&kind) {
            let reason = format!("cannot cast {kind}");
            return self.fail(&reason, ctx);
        }
        if self.character.is_incapacitated() || !target.is_alive() {
            return ActionOutcome::failed();
        }
        let cost = status_cast_cost(&self.class, kind);
        if !self.character.spend_mana(cost) {
            return self.fail("not enough mana", ctx);
        }
        let intensity = match &self.class {
            Class::Rogue(state) if kind == StatusKind::Poisoned => {
                1.0 + f64::from(state.poison_stacks) * 0.2
            }
            Class::FinalBoss(state) if state.rage_mode => 1.5,
            _ => 1.0,
        };
        target.apply_status(kind, duration, intensity, ctx.events);
        ActionOutcome::acted()
    }
}

/// Statuses a class may put on a target.
fn castable_statuses(class: &Class) -> &'static [StatusKind] {
    match class {
        Class::Mage(_) => &[StatusKind::Cursed, StatusKind::Paralyzed],
        Class::Rogue(_) => &[StatusKind::Poisoned, StatusKind::Paralyzed],
        Class::Dragon(_) | Class::FinalBoss(_) => &[
            StatusKind::Cursed,
            StatusKind::Paralyzed,
            StatusKind::Poisoned,
        ],
        _ => &[],
    }
}

fn status_cast_cost(class: &Class, kind: StatusKind) -> f64 {
    match class {
        Class::Mage(_) if kind == StatusKind::Cursed => 30.0,
        Class::Mage(_) => 25.0,
        Class::Dragon(_) => 20.0,
        _ => 0.0,
    }
}

// ============================================================================
// Attacks
// ============================================================================

pub(crate) fn mage_attack(
    mage: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let spell_power = match &mage.class {
        Class::Mage(state) => state.spell_power,
        _ => 0.0,
    };
    let attack_power = mage.character.attack_power;

    if living_target(foes, target).is_none() {
        return mage.fail("has no target", ctx);
    }
    if !mage.character.spend_mana(attack.mana_cost()) {
        return mage.fail("not enough mana", ctx);
    }

    let strike = match attack {
        AttackId::Fireball => Strike::new(spell_power + attack_power, AttackType::Fire),
        AttackId::IceAttack => Strike::new(spell_power * 1.2, AttackType::Ice),
        AttackId::LightningStrike => Strike::new(spell_power * 1.5, AttackType::Lightning),
        AttackId::Meteor => {
            let strike = Strike::new(spell_power * 2.0 * 0.8, AttackType::Magical);
            mage.area_strike(foes, strike, ctx);
            return ActionOutcome::acted();
        }
        _ => Strike::physical(attack_power),
    };
    if let Some(foe) = living_target(foes, target) {
        mage.strike(foe, strike, ctx);
    }
    ActionOutcome::acted()
}

pub(crate) fn warrior_attack(
    warrior: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Class::Warrior(state) = &mut warrior.class {
        state.build_rage(RAGE_PER_ATTACK);
    }
    let power = warrior.character.attack_power;

    if attack == AttackId::BerserkerRage {
        return go_berserk(warrior, ctx);
    }

    let Some(foe) = living_target(foes, target) else {
        return warrior.fail("has no target", ctx);
    };
    match attack {
        AttackId::SwordStrike => {
            warrior.strike(foe, Strike::physical(power * 1.2), ctx);
        }
        AttackId::ShieldBash => {
            warrior.strike(foe, Strike::physical(power * 0.9), ctx);
            if foe.is_alive() && ctx.dice.chance(0.4) {
                foe.apply_status(StatusKind::Paralyzed, 1, 1.0, ctx.events);
            }
        }
        AttackId::Whirlwind => {
            warrior.strike(foe, Strike::physical(power * 1.1), ctx);
        }
        _ => {
            warrior.strike(foe, Strike::physical(power), ctx);
        }
    }
    ActionOutcome::acted()
}

fn go_berserk(warrior: &mut Combatant, ctx: &mut ActionContext<'_>) -> ActionOutcome {
    let attack_power = warrior.character.attack_power;
    let defense = warrior.character.defense;
    let Class::Warrior(state) = &mut warrior.class else {
        return ActionOutcome::failed();
    };
    if state.rage < BERSERK_RAGE_COST || state.is_raging() {
        return warrior.fail("not enough rage", ctx);
    }
    state.rage = 0.0;
    state.rage_snapshot = Some((attack_power, defense));

    warrior.character.attack_power = attack_power * 1.5;
    warrior.character.defense = defense * 0.7;
    warrior.apply_status(StatusKind::BerserkerRage, 5, 1.0, ctx.events);
    ActionOutcome::acted()
}

pub(crate) fn rogue_attack(
    rogue: &mut Combatant,
    attack: AttackId,
    target: usize,
    foes: &mut [Combatant],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let power = rogue.character.attack_power;

    if attack == AttackId::Hide {
        if let Class::Rogue(state) = &mut rogue.class {
            state.stealthed = true;
            state.stealth_rounds = STEALTH_ROUNDS;
        }
        rogue.apply_status(StatusKind::Stealthed, STEALTH_ROUNDS as i32, 1.0, ctx.events);
        return ActionOutcome::acted();
    }

    let Some(foe) = living_target(foes, target) else {
        return rogue.fail("has no target", ctx);
    };
    let stealthed = rogue.is_stealthed();
    match attack {
        AttackId::DaggerStrike => {
            let mut strike = Strike::physical(power * 1.1).with_crit_bonus(0.1);
            if stealthed {
                strike.damage *= 1.8;
                strike.crit_bonus += 0.3;
                rogue.leave_stealth(ctx.events);
            }
            rogue.strike(foe, strike, ctx);
        }
        AttackId::PoisonBlade => {
            rogue.strike(foe, Strike::new(power * 0.9, AttackType::Poison), ctx);
            let stacks = match &rogue.class {
                Class::Rogue(state) => state.poison_stacks,
                _ => 0,
            };
            if foe.is_alive() {
                let intensity = 1.0 + stacks as f64 * 0.2;
                foe.apply_status(StatusKind::Poisoned, 3, intensity, ctx.events);
            }
            if let Class::Rogue(state) = &mut rogue.class {
                state.poison_stacks += 1;
            }
        }
        AttackId::Assassinate => {
            let mut strike = Strike::physical(power * 2.0).with_crit_bonus(0.2);
            if stealthed {
                strike.damage *= 1.5;
                strike.crit_bonus += 0.3;
                rogue.leave_stealth(ctx.events);
            }
            rogue.strike(foe, strike, ctx);
        }
        _ => {
            rogue.strike(foe, Strike::physical(power), ctx);
        }
    }
    ActionOutcome::acted()
}

// ============================================================================
// Round end
// ============================================================================

pub(crate) fn mage_round_end(mage: &mut Combatant, ctx: &mut ActionContext<'_>) {
    let restored = mage.character.restore_mana(MAGE_MANA_REGEN);
    if restored > 0.0 {
        ctx.events.push(CombatEvent::ManaRestored {
            target: mage.who(),
            amount: restored,
        });
    }
}

/// Shield regeneration, and stats back to normal once the rage is over.
pub(crate) fn warrior_round_end(warrior: &mut Combatant, _ctx: &mut ActionContext<'_>) {
    let raging = warrior.character.has_status(StatusKind::BerserkerRage);
    let Class::Warrior(state) = &mut warrior.class else {
        return;
    };
    state.restore_shield(SHIELD_REGEN_FRACTION);
    if raging {
        return;
    }
    if let Some((attack_power, defense)) = state.rage_snapshot.take() {
        warrior.character.attack_power = attack_power;
        warrior.character.defense = defense;
    }
}

pub(crate) fn rogue_round_end(rogue: &mut Combatant, ctx: &mut ActionContext<'_>) {
    let still_hidden = rogue.character.has_status(StatusKind::Stealthed);
    let Class::Rogue(state) = &mut rogue.class else {
        return;
    };
    if !state.stealthed {
        return;
    }
    state.stealth_rounds = state.stealth_rounds.saturating_sub(1);
    if state.stealth_rounds == 0 || !still_hidden {
        rogue.leave_stealth(ctx.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::testing::ScriptedDice;

    #[test]
    fn test_fireball_damage() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        let mut foes = vec![Combatant::skeleton()];
        let outcome = mage.perform_attack(AttackId::Fireball, 0, &mut foes, &mut ctx);
        assert!(outcome.acted);
        // 15 + 12 = 27 raw, minus 2 defense
        assert_eq!(foes[0].character.health, 15.0);
        assert_eq!(mage.character.mana, 85.0);
    }

    #[test]
    fn test_spell_without_mana_does_nothing() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        mage.character.mana = 10.0;
        let mut foes = vec![Combatant::skeleton()];
        let outcome = mage.perform_attack(AttackId::Fireball, 0, &mut foes, &mut ctx);
        assert!(!outcome.acted);
        assert_eq!(foes[0].character.health, 40.0);
        assert_eq!(mage.character.mana, 10.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::ActionFailed { .. })));
    }

    #[test]
    fn test_meteor_hits_everyone() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        let mut foes = vec![Combatant::skeleton(), Combatant::skeleton()];
        mage.perform_attack(AttackId::Meteor, 0, &mut foes, &mut ctx);
        // 15 * 2 * 0.8 = 24, minus 2 defense
        assert_eq!(foes[0].character.health, 18.0);
        assert_eq!(foes[1].character.health, 18.0);
        assert_eq!(mage.character.mana, 60.0);
    }

    #[test]
    fn test_berserker_rage_needs_rage() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut warrior = Combatant::warrior("Brom");
        let mut foes = vec![Combatant::orc()];
        let outcome = warrior.perform_attack(AttackId::BerserkerRage, 0, &mut foes, &mut ctx);
        assert!(!outcome.acted);
        assert_eq!(warrior.character.attack_power, 18.0);

        if let Class::Warrior(state) = &mut warrior.class {
            state.rage = 60.0;
        }
        let outcome = warrior.perform_attack(AttackId::BerserkerRage, 0, &mut foes, &mut ctx);
        assert!(outcome.acted);
        assert_eq!(warrior.character.attack_power, 27.0);
        assert!(warrior.character.has_status(StatusKind::BerserkerRage));
        if let Class::Warrior(state) = &warrior.class {
            assert_eq!(state.rage, 0.0);
        }
    }

    #[test]
    fn test_berserker_rage_wears_off() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut warrior = Combatant::warrior("Brom");
        if let Class::Warrior(state) = &mut warrior.class {
            state.rage = 100.0;
        }
        warrior.perform_attack(AttackId::BerserkerRage, 0, &mut [], &mut ctx);
        for _ in 0..5 {
            warrior.end_of_round(&mut ctx);
        }
        assert!(!warrior.character.has_status(StatusKind::BerserkerRage));
        assert_eq!(warrior.character.attack_power, 18.0);
        assert_eq!(warrior.character.defense, 12.0);
    }

    #[test]
    fn test_warrior_attacks_build_rage() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut warrior = Combatant::warrior("Brom");
        let mut foes = vec![Combatant::dragon()];
        warrior.perform_attack(AttackId::SwordStrike, 0, &mut foes, &mut ctx);
        if let Class::Warrior(state) = &warrior.class {
            assert_eq!(state.rage, RAGE_PER_ATTACK);
        }
    }

    #[test]
    fn test_warrior_resists_paralysis() {
        let mut events = Vec::new();
        let mut warrior = Combatant::warrior("Brom");
        assert!(!warrior.apply_status(StatusKind::Paralyzed, 2, 1.0, &mut events));
        assert!(warrior.apply_status(StatusKind::Poisoned, 2, 1.0, &mut events));
    }

    #[test]
    fn test_hide_then_assassinate() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        let mut foes = vec![Combatant::dragon()];
        rogue.perform_attack(AttackId::Hide, 0, &mut foes, &mut ctx);
        assert!(rogue.is_stealthed());

        rogue.perform_attack(AttackId::Assassinate, 0, &mut foes, &mut ctx);
        assert!(!rogue.is_stealthed());
        // 15 * 2.0 * 1.5 = 45, dragon: 45 * 0.5 = 22.5 - 15
        assert_eq!(foes[0].character.health, 142.5);
    }

    #[test]
    fn test_poison_blade_stacks() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        let mut foes = vec![Combatant::dragon()];
        rogue.perform_attack(AttackId::PoisonBlade, 0, &mut foes, &mut ctx);
        assert!(foes[0].character.has_status(StatusKind::Poisoned));
        if let Class::Rogue(state) = &rogue.class {
            assert_eq!(state.poison_stacks, 1);
        }
    }

    #[test]
    fn test_cast_status_respects_repertoire() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        let mut orc = Combatant::orc();
        assert!(!rogue.cast_status(&mut orc, StatusKind::Cursed, 3, &mut ctx).acted);
        assert!(!rogue.cast_status(&mut orc, StatusKind::BerserkerRage, 3, &mut ctx).acted);
        assert!(!orc.character.has_status(StatusKind::Cursed));
        assert!(!orc.character.has_status(StatusKind::BerserkerRage));

        let mut mage = Combatant::mage("Aria");
        assert!(!mage.cast_status(&mut orc, StatusKind::Poisoned, 3, &mut ctx).acted);
        assert_eq!(mage.character.mana, 100.0);
        assert!(!orc.character.has_status(StatusKind::Poisoned));

        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::ActionFailed { reason, .. } if reason == "cannot cast Cursed"
        )));
    }

    #[test]
    fn test_rogue_poison_scales_with_stacks() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        if let Class::Rogue(state) = &mut rogue.class {
            state.poison_stacks = 3;
        }
        let mut orc = Combatant::orc();
        assert!(rogue.cast_status(&mut orc, StatusKind::Poisoned, 3, &mut ctx).acted);
        let intensity = orc.character.effects.get(StatusKind::Poisoned).map(|e| e.intensity);
        assert!(intensity.is_some_and(|i| (i - 1.6).abs() < 1e-9));
        assert_eq!(rogue.character.mana, rogue.character.max_mana);
    }

    #[test]
    fn test_stealth_wears_off() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        rogue.perform_attack(AttackId::Hide, 0, &mut [], &mut ctx);
        for _ in 0..3 {
            assert!(rogue.is_stealthed());
            rogue.end_of_round(&mut ctx);
        }
        assert!(!rogue.is_stealthed());
    }

    #[test]
    fn test_mage_regenerates_mana() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        mage.character.mana = 50.0;
        mage.end_of_round(&mut ctx);
        assert_eq!(mage.character.mana, 60.0);
    }

    #[test]
    fn test_cast_heal_on_ally() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        let mut ally = Combatant::warrior("Brom");
        ally.character.health = 60.0;
        let outcome = mage.cast_heal(Some(&mut ally), 40.0, &mut ctx);
        assert!(outcome.acted);
        assert_eq!(ally.character.health, 100.0);
        assert_eq!(mage.character.mana, 80.0);

        let mut rogue = Combatant::rogue("Vex");
        assert!(!rogue.cast_heal(None, 10.0, &mut ctx).acted);
    }

    #[test]
    fn test_cast_curse_costs_more() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut mage = Combatant::mage("Aria");
        let mut orc = Combatant::orc();
        mage.cast_status(&mut orc, StatusKind::Cursed, 3, &mut ctx);
        assert_eq!(mage.character.mana, 70.0);
        mage.cast_status(&mut orc, StatusKind::Paralyzed, 1, &mut ctx);
        assert_eq!(mage.character.mana, 45.0);
        assert!(orc.character.has_status(StatusKind::Paralyzed));
    }
}
