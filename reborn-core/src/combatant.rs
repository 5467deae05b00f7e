//! A character in a fight: base record, class state, and role.
//!
//! This is where the shared rules meet the variant overrides: damage
//! intake (shield, evasion), the reduction chain, strike resolution, and
//! end-of-round processing.

use crate::ai::{Difficulty, SpecialAbility};
use crate::attack::{AttackId, DamageReport, Strike, StrikeOutcome, TYPE_STATUS_DURATION};
use crate::character::{Character, CharacterId};
use crate::classes::{enemies, heroes, Class, ClassKind};
use crate::config::CombatConfig;
use crate::dice::Dice;
use crate::events::{CombatEvent, Participant};
use crate::inventory::Inventory;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};

/// Extra critical chance while stealthed.
pub const STEALTH_CRIT_BONUS: f64 = 0.2;
/// Damage multiplier of an attack made from stealth.
pub const STEALTH_DAMAGE_MULTIPLIER: f64 = 1.8;
/// Damage multiplier while in berserker rage.
pub const BERSERK_DAMAGE_MULTIPLIER: f64 = 1.3;

// ============================================================================
// Roles
// ============================================================================

/// Player-side progression and belongings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroProfile {
    pub level: u32,
    pub experience: u32,
    pub inventory: Inventory,
}

impl Default for HeroProfile {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            inventory: Inventory::default(),
        }
    }
}

/// AI tuning and reward value of an enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub difficulty: Difficulty,
    pub point_value: u32,
    pub abilities: Vec<SpecialAbility>,
}

impl EnemyProfile {
    pub fn new(difficulty: Difficulty, point_value: u32) -> Self {
        Self {
            difficulty,
            point_value,
            abilities: Vec::new(),
        }
    }

    pub fn with_abilities(mut self, abilities: Vec<SpecialAbility>) -> Self {
        self.abilities = abilities;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Role {
    Hero(HeroProfile),
    Enemy(EnemyProfile),
}

// ============================================================================
// Action plumbing
// ============================================================================

/// Everything an action needs besides the characters it touches.
pub struct ActionContext<'a> {
    pub dice: &'a mut dyn Dice,
    pub config: &'a CombatConfig,
    pub events: &'a mut Vec<CombatEvent>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        dice: &'a mut dyn Dice,
        config: &'a CombatConfig,
        events: &'a mut Vec<CombatEvent>,
    ) -> Self {
        Self {
            dice,
            config,
            events,
        }
    }
}

/// Result of an action taken during a turn.
#[derive(Debug, Default)]
pub struct ActionOutcome {
    /// False when the action had no effect (no mana, no target, ...).
    pub acted: bool,
    /// Characters that joined the actor's side.
    pub summoned: Vec<Combatant>,
}

impl ActionOutcome {
    pub fn acted() -> Self {
        Self {
            acted: true,
            summoned: Vec::new(),
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// The living foe at `index`, if there is one.
pub fn living_target(foes: &mut [Combatant], index: usize) -> Option<&mut Combatant> {
    foes.get_mut(index).filter(|foe| foe.is_alive())
}

// ============================================================================
// Combatant
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub character: Character,
    pub class: Class,
    pub role: Role,
}

impl Combatant {
    pub fn new(character: Character, class: Class, role: Role) -> Self {
        Self {
            character,
            class,
            role,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.character.id
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn who(&self) -> Participant {
        Participant {
            id: self.character.id,
            name: self.character.name.clone(),
        }
    }

    pub fn kind(&self) -> ClassKind {
        self.class.kind()
    }

    pub fn is_alive(&self) -> bool {
        self.character.is_alive()
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.role, Role::Hero(_))
    }

    pub fn hero(&self) -> Option<&HeroProfile> {
        match &self.role {
            Role::Hero(profile) => Some(profile),
            Role::Enemy(_) => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut HeroProfile> {
        match &mut self.role {
            Role::Hero(profile) => Some(profile),
            Role::Enemy(_) => None,
        }
    }

    pub fn enemy(&self) -> Option<&EnemyProfile> {
        match &self.role {
            Role::Enemy(profile) => Some(profile),
            Role::Hero(_) => None,
        }
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.hero().map(|h| &h.inventory)
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        self.hero_mut().map(|h| &mut h.inventory)
    }

    /// Reward value when defeated. Heroes are worth nothing.
    pub fn point_value(&self) -> u32 {
        self.enemy().map(|e| e.point_value).unwrap_or(0)
    }

    pub fn has_ability(&self, ability: SpecialAbility) -> bool {
        self.enemy()
            .map(|e| e.abilities.contains(&ability))
            .unwrap_or(false)
    }

    /// Override stats, e.g. for a custom test dummy.
    pub fn with_stats(mut self, max_health: f64, attack_power: f64, defense: f64) -> Self {
        self.character.max_health = max_health;
        self.character.health = max_health;
        self.character.attack_power = attack_power;
        self.character.defense = defense;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.character.name = name.into();
        self
    }

    // ===== Status =====

    /// Apply a status unless this class resists it. Re-applying an active
    /// kind is a no-op.
    pub fn apply_status(
        &mut self,
        kind: StatusKind,
        duration: i32,
        intensity: f64,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        if self.class.resists(kind) {
            return false;
        }
        let applied = self.character.apply_status(kind, duration, intensity);
        if applied {
            events.push(CombatEvent::StatusApplied {
                target: self.who(),
                status: kind,
            });
        }
        applied
    }

    pub fn remove_status(&mut self, kind: StatusKind, events: &mut Vec<CombatEvent>) -> bool {
        let removed = self.character.remove_status(kind);
        if removed {
            events.push(CombatEvent::StatusExpired {
                target: self.who(),
                status: kind,
            });
        }
        removed
    }

    pub fn is_stealthed(&self) -> bool {
        match &self.class {
            Class::Rogue(state) => state.stealthed,
            _ => self.character.has_status(StatusKind::Stealthed),
        }
    }

    pub(crate) fn leave_stealth(&mut self, events: &mut Vec<CombatEvent>) {
        if let Class::Rogue(state) = &mut self.class {
            state.stealthed = false;
            state.stealth_rounds = 0;
        }
        self.remove_status(StatusKind::Stealthed, events);
    }

    // ===== Damage intake =====

    /// Reduction chain: class step first, flat defense last.
    pub fn calculate_reduced_damage(&self, incoming: f64) -> f64 {
        self.character
            .base_reduction(self.class.pre_reduction(incoming))
    }

    /// Receive raw damage. Evasion and shields act before the reduction
    /// chain.
    pub fn take_damage(&mut self, amount: f64, ctx: &mut ActionContext<'_>) -> DamageReport {
        let mut report = DamageReport {
            incoming: amount,
            ..DamageReport::default()
        };
        if self.character.is_defeated() || amount <= 0.0 {
            return report;
        }

        if let Class::Rogue(state) = &self.class {
            if ctx.dice.chance(state.evasion_chance()) {
                report.evaded = true;
                ctx.events.push(CombatEvent::Evaded { target: self.who() });
                return report;
            }
        }

        let mut remaining = amount;
        if let Class::Warrior(state) = &mut self.class {
            report.absorbed = state.absorb(remaining);
            remaining -= report.absorbed;
            state.build_rage(amount * heroes::RAGE_PER_DAMAGE);
        }
        if report.absorbed > 0.0 {
            ctx.events.push(CombatEvent::ShieldAbsorbed {
                target: self.who(),
                amount: report.absorbed,
            });
        }

        let reduced = self.calculate_reduced_damage(remaining);
        report.health_lost = self.character.lose_health(reduced);
        report.defeated = self.character.is_defeated();
        report
    }

    pub fn heal(&mut self, amount: f64, events: &mut Vec<CombatEvent>) -> f64 {
        let healed = self.character.heal(amount);
        if healed > 0.0 {
            events.push(CombatEvent::Healed {
                target: self.who(),
                amount: healed,
            });
        }
        healed
    }

    // ===== Offense =====

    /// Resolve one hit against `target`: crit, stealth alpha, berserk, the
    /// target's intake, then a chance at the type's status.
    pub fn strike(
        &mut self,
        target: &mut Combatant,
        strike: Strike,
        ctx: &mut ActionContext<'_>,
    ) -> StrikeOutcome {
        let mut outcome = StrikeOutcome::default();
        if self.character.is_incapacitated() || target.character.is_defeated() {
            return outcome;
        }
        outcome.landed = true;

        let mut damage = strike.damage;
        if ctx.config.type_multipliers {
            damage *= strike.attack_type.multiplier();
        }

        let stealthed = self.is_stealthed();
        let mut crit_chance = self.character.critical_chance + strike.crit_bonus;
        if stealthed {
            crit_chance += STEALTH_CRIT_BONUS;
        }
        outcome.critical = ctx.dice.chance(crit_chance);
        if outcome.critical {
            damage *= ctx.config.crit_multiplier;
        }
        if stealthed {
            damage *= STEALTH_DAMAGE_MULTIPLIER;
            self.leave_stealth(ctx.events);
        }
        if self.character.has_status(StatusKind::BerserkerRage) {
            damage *= BERSERK_DAMAGE_MULTIPLIER;
        }

        outcome.raw = damage;
        outcome.damage = target.take_damage(damage, ctx);
        if outcome.damage.evaded {
            return outcome;
        }
        ctx.events.push(CombatEvent::Hit {
            attacker: self.who(),
            target: target.who(),
            damage: outcome.damage.health_lost,
            critical: outcome.critical,
        });

        if let Some(kind) = strike.attack_type.inflicted_status() {
            if target.is_alive()
                && ctx.dice.chance(ctx.config.status_proc_chance)
                && target.apply_status(kind, TYPE_STATUS_DURATION, 1.0, ctx.events)
            {
                outcome.status_applied = Some(kind);
            }
        }
        outcome
    }

    /// Strike every living foe with the same hit. Returns how many were hit.
    pub fn area_strike(
        &mut self,
        foes: &mut [Combatant],
        strike: Strike,
        ctx: &mut ActionContext<'_>,
    ) -> usize {
        let mut hits = 0;
        for foe in foes.iter_mut().filter(|f| f.is_alive()) {
            if self.strike(foe, strike, ctx).landed {
                hits += 1;
            }
        }
        hits
    }

    /// Use a named attack against `foes[target]`. Attacks the class does
    /// not know fall back to a plain physical hit.
    pub fn perform_attack(
        &mut self,
        attack: AttackId,
        target: usize,
        foes: &mut [Combatant],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        if self.character.is_incapacitated() {
            return ActionOutcome::failed();
        }
        if !self.class.knows(attack) {
            return self.basic_attack(target, foes, ctx);
        }

        ctx.events.push(CombatEvent::AttackUsed {
            actor: self.who(),
            attack,
        });
        match self.kind() {
            ClassKind::Mage => heroes::mage_attack(self, attack, target, foes, ctx),
            ClassKind::Warrior => heroes::warrior_attack(self, attack, target, foes, ctx),
            ClassKind::Rogue => heroes::rogue_attack(self, attack, target, foes, ctx),
            ClassKind::Skeleton => enemies::skeleton_attack(self, attack, target, foes, ctx),
            ClassKind::Orc => enemies::orc_attack(self, attack, target, foes, ctx),
            ClassKind::Dragon => enemies::dragon_attack(self, attack, target, foes, ctx),
            ClassKind::FinalBoss => enemies::boss_attack(self, attack, target, foes, ctx),
        }
    }

    /// Use the attack in menu slot `index`.
    pub fn perform_attack_at(
        &mut self,
        index: usize,
        target: usize,
        foes: &mut [Combatant],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        match self.class.attacks().get(index) {
            Some(attack) => self.perform_attack(*attack, target, foes, ctx),
            None => self.fail("has no such attack", ctx),
        }
    }

    pub fn basic_attack(
        &mut self,
        target: usize,
        foes: &mut [Combatant],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        let power = self.character.attack_power;
        match living_target(foes, target) {
            Some(foe) => {
                self.strike(foe, Strike::physical(power), ctx);
                ActionOutcome::acted()
            }
            None => self.fail("has no target", ctx),
        }
    }

    pub(crate) fn fail(&self, reason: &str, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        ctx.events.push(CombatEvent::ActionFailed {
            actor: self.who(),
            reason: reason.to_string(),
        });
        ActionOutcome::failed()
    }

    // ===== Defense =====

    pub fn defend(&mut self, events: &mut Vec<CombatEvent>) {
        if self.character.is_incapacitated() {
            return;
        }
        self.character.is_defending = true;
        self.apply_status(StatusKind::Defending, 1, 1.0, events);
        if let Class::Warrior(state) = &mut self.class {
            state.restore_shield(heroes::DEFEND_SHIELD_FRACTION);
        }
        events.push(CombatEvent::Defended { actor: self.who() });
    }

    // ===== Round end =====

    /// Damage-over-time, effect countdown, then the class's own upkeep.
    pub fn end_of_round(&mut self, ctx: &mut ActionContext<'_>) {
        if self.character.is_defeated() {
            return;
        }

        for (kind, amount) in self.character.status_tick_damage() {
            if self.character.is_defeated() {
                break;
            }
            let report = self.take_damage(amount, ctx);
            if !report.evaded {
                ctx.events.push(CombatEvent::StatusDamage {
                    target: self.who(),
                    status: kind,
                    amount: report.health_lost,
                });
            }
        }
        if self.character.is_defeated() {
            return;
        }

        for kind in self.character.tick_effects() {
            ctx.events.push(CombatEvent::StatusExpired {
                target: self.who(),
                status: kind,
            });
        }

        match self.kind() {
            ClassKind::Mage => heroes::mage_round_end(self, ctx),
            ClassKind::Warrior => heroes::warrior_round_end(self, ctx),
            ClassKind::Rogue => heroes::rogue_round_end(self, ctx),
            ClassKind::Dragon => enemies::dragon_round_end(self, ctx),
            ClassKind::Skeleton | ClassKind::Orc | ClassKind::FinalBoss => {}
        }
    }

    /// Drop the defending stance, e.g. when an encounter resets.
    pub fn clear_defending(&mut self) {
        self.character.clear_defending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    fn ctx_parts() -> (ScriptedDice, CombatConfig, Vec<CombatEvent>) {
        (ScriptedDice::never(), CombatConfig::default(), Vec::new())
    }

    #[test]
    fn test_warrior_shield_absorbs_first() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut warrior = Combatant::warrior("Brom");
        if let Class::Warrior(state) = &mut warrior.class {
            state.shield = 10.0;
        }
        let report = warrior.take_damage(30.0, &mut ctx);
        assert_eq!(report.absorbed, 10.0);
        assert_eq!(report.health_lost, 8.0);
        assert_eq!(warrior.character.health, 112.0);
    }

    #[test]
    fn test_warrior_without_shield() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut warrior = Combatant::warrior("Brom");
        if let Class::Warrior(state) = &mut warrior.class {
            state.shield = 0.0;
        }
        let report = warrior.take_damage(30.0, &mut ctx);
        assert_eq!(report.health_lost, 18.0);
        if let Class::Warrior(state) = &warrior.class {
            assert!((state.rage - 9.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rogue_evasion() {
        let mut dice = ScriptedDice::never().with_units([0.0]);
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut rogue = Combatant::rogue("Vex");
        let report = rogue.take_damage(50.0, &mut ctx);
        assert!(report.evaded);
        assert_eq!(rogue.character.health, 90.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Evaded { .. })));
    }

    #[test]
    fn test_mage_reduction_chain() {
        let mage = Combatant::mage("Aria");
        // 40 * 0.7 = 28, minus 5 defense
        assert!((mage.calculate_reduced_damage(40.0) - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_strike_with_no_crit() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::skeleton();
        let mut target = Combatant::skeleton();
        let outcome = attacker.strike(&mut target, Strike::physical(12.0), &mut ctx);
        assert!(outcome.landed);
        assert!(!outcome.critical);
        assert_eq!(outcome.damage.health_lost, 10.0);
        assert_eq!(target.character.health, 30.0);
    }

    #[test]
    fn test_critical_hit() {
        let mut dice = ScriptedDice::always();
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::skeleton();
        let mut target = Combatant::skeleton();
        let outcome = attacker.strike(&mut target, Strike::physical(12.0), &mut ctx);
        assert!(outcome.critical);
        assert_eq!(outcome.raw, 18.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Hit { critical: true, .. })));
    }

    #[test]
    fn test_stealth_strike_consumes_stealth() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::skeleton();
        attacker.apply_status(StatusKind::Stealthed, 3, 1.0, ctx.events);
        let mut target = Combatant::orc();
        let outcome = attacker.strike(&mut target, Strike::physical(10.0), &mut ctx);
        assert_eq!(outcome.raw, 18.0);
        assert!(!attacker.is_stealthed());
    }

    #[test]
    fn test_incapacitated_attacker_does_nothing() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::orc();
        attacker.apply_status(StatusKind::Paralyzed, 1, 1.0, ctx.events);
        let mut foes = vec![Combatant::skeleton()];
        let outcome = attacker.perform_attack(AttackId::ClubSmash, 0, &mut foes, &mut ctx);
        assert!(!outcome.acted);
        assert_eq!(foes[0].character.health, 40.0);
    }

    #[test]
    fn test_type_status_proc() {
        let mut dice = ScriptedDice::never().with_units([0.99, 0.0]);
        let config = CombatConfig::default();
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::orc();
        let mut target = Combatant::skeleton();
        let outcome = attacker.strike(
            &mut target,
            Strike::new(5.0, crate::attack::AttackType::Poison),
            &mut ctx,
        );
        assert_eq!(outcome.status_applied, Some(StatusKind::Poisoned));
        assert!(target.character.has_status(StatusKind::Poisoned));
    }

    #[test]
    fn test_type_multiplier_toggle() {
        let mut dice = ScriptedDice::never();
        let config = CombatConfig::new().with_type_multipliers(true);
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut attacker = Combatant::orc();
        let mut target = Combatant::orc();
        let outcome = attacker.strike(
            &mut target,
            Strike::new(10.0, crate::attack::AttackType::Lightning),
            &mut ctx,
        );
        assert!((outcome.raw - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_defend_halves_again() {
        let mut events = Vec::new();
        let mut orc = Combatant::orc();
        orc.defend(&mut events);
        assert!(orc.character.is_defending);
        assert_eq!(orc.character.status, StatusKind::Defending);
        // 20 - (5 + 2.5)
        assert_eq!(orc.calculate_reduced_damage(20.0), 12.5);
    }

    #[test]
    fn test_poison_ticks_through_defense() {
        let (mut dice, config, mut events) = ctx_parts();
        let mut ctx = ActionContext::new(&mut dice, &config, &mut events);

        let mut skeleton = Combatant::skeleton();
        skeleton.apply_status(StatusKind::Poisoned, 2, 2.0, ctx.events);
        skeleton.end_of_round(&mut ctx);
        // 10 poison - 2 defense
        assert_eq!(skeleton.character.health, 32.0);
        skeleton.end_of_round(&mut ctx);
        assert_eq!(skeleton.character.health, 24.0);
        assert!(!skeleton.character.has_status(StatusKind::Poisoned));
    }
}
