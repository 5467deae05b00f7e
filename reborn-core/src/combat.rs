//! Combat orchestration.
//!
//! [`CombatManager`] owns both rosters for the length of an encounter and
//! drives the round loop: initiative, one action per turn, then status
//! upkeep, rewards and the termination check at the end of every round.
//! Turns advance only when the caller asks, through [`CombatManager::step`]
//! for automated play or [`CombatManager::act`] for a hero command, so any
//! pacing belongs to the caller.

use crate::ai;
use crate::character::CharacterId;
use crate::classes::Class;
use crate::combatant::{ActionContext, Combatant};
use crate::config::CombatConfig;
use crate::dice::{Dice, SeededDice};
use crate::events::{CombatEvent, CombatLog};
use crate::items;
use crate::progression::experience_share;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::mem;
use tracing::{debug, info, warn};

/// Rounds a status cast by a hero lasts.
pub const CAST_STATUS_ROUNDS: i32 = 3;

// ============================================================================
// Results and phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatResult {
    Victory,
    Defeat,
    Fled,
}

impl CombatResult {
    pub fn name(&self) -> &'static str {
        match self {
            CombatResult::Victory => "Victory",
            CombatResult::Defeat => "Defeat",
            CombatResult::Fled => "Fled",
        }
    }
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    Idle,
    Setup,
    TurnLoop,
    RoundEnd,
    Finished(CombatResult),
}

impl CombatPhase {
    pub fn in_combat(&self) -> bool {
        matches!(
            self,
            CombatPhase::Setup | CombatPhase::TurnLoop | CombatPhase::RoundEnd
        )
    }
}

// ============================================================================
// Hero commands
// ============================================================================

/// Who an item is used on, relative to the acting hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTarget {
    Myself,
    /// Index into the active hero roster.
    Ally(usize),
    /// Index into the enemy roster.
    Foe(usize),
}

/// An explicit action for the hero whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeroCommand {
    /// Use the class attack in menu slot `index` on enemy `target`.
    Attack { index: usize, target: usize },
    Defend,
    UseItem { slot: usize, target: ItemTarget },
    Flee,
    HealAlly { ally: usize, amount: f64 },
    CastStatus { target: usize, status: StatusKind },
    Wait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Hero,
    Enemy,
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (left, right) = items.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

// ============================================================================
// Combat manager
// ============================================================================

/// Turn-based encounter state machine.
///
/// Every character handed to the manager stays in it until taken back with
/// [`take_party`](Self::take_party) or [`take_enemies`](Self::take_enemies):
/// defeated and fled characters leave the active rosters but are kept.
pub struct CombatManager {
    config: CombatConfig,
    dice: Box<dyn Dice>,
    phase: CombatPhase,
    round: u32,
    heroes: Vec<Combatant>,
    enemies: Vec<Combatant>,
    retired_heroes: Vec<Combatant>,
    retired_enemies: Vec<Combatant>,
    party_order: Vec<CharacterId>,
    turn_order: Vec<CharacterId>,
    cursor: usize,
    announced_defeats: HashSet<CharacterId>,
    result: Option<CombatResult>,
    pending: Vec<CombatEvent>,
    events: Vec<CombatEvent>,
    log: CombatLog,
}

impl CombatManager {
    pub fn new(config: CombatConfig, dice: Box<dyn Dice>) -> Self {
        Self {
            config,
            dice,
            phase: CombatPhase::Idle,
            round: 0,
            heroes: Vec::new(),
            enemies: Vec::new(),
            retired_heroes: Vec::new(),
            retired_enemies: Vec::new(),
            party_order: Vec::new(),
            turn_order: Vec::new(),
            cursor: 0,
            announced_defeats: HashSet::new(),
            result: None,
            pending: Vec::new(),
            events: Vec::new(),
            log: CombatLog::new(),
        }
    }

    /// Default rules with seeded dice.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(CombatConfig::default(), Box::new(SeededDice::new(seed)))
    }

    // ===== Queries =====

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.in_combat()
    }

    /// Completed rounds of the current or last encounter.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_order(&self) -> &[CharacterId] {
        &self.turn_order
    }

    /// The character the turn cursor points at.
    pub fn current_actor(&self) -> Option<&Combatant> {
        if self.phase != CombatPhase::TurnLoop {
            return None;
        }
        self.turn_order
            .get(self.cursor)
            .and_then(|id| self.character(*id))
    }

    /// Active heroes, including those defeated this round.
    pub fn heroes(&self) -> &[Combatant] {
        &self.heroes
    }

    /// Active enemies, including those defeated this round.
    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    /// Every hero held: active first, then fled or defeated.
    pub fn party(&self) -> impl Iterator<Item = &Combatant> {
        self.heroes.iter().chain(&self.retired_heroes)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Combatant> {
        self.heroes
            .iter()
            .chain(&self.enemies)
            .chain(&self.retired_heroes)
            .chain(&self.retired_enemies)
            .find(|c| c.id() == id)
    }

    pub fn result(&self) -> Option<CombatResult> {
        self.result
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    /// Events emitted since the last drain, for animation triggers.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        mem::take(&mut self.events)
    }

    // ===== Roster hand-off =====

    /// Begin an encounter. Returns false when a side has no living member
    /// or an encounter is already running. The characters are kept either
    /// way.
    pub fn start_combat(&mut self, heroes: Vec<Combatant>, enemies: Vec<Combatant>) -> bool {
        self.party_order.extend(heroes.iter().map(|h| h.id()));

        if self.phase != CombatPhase::Idle {
            warn!(phase = ?self.phase, "start_combat called while not idle");
            self.retired_heroes.extend(heroes);
            self.retired_enemies.extend(enemies);
            self.pending.push(CombatEvent::SetupFailed {
                reason: "an encounter is already in progress".to_string(),
            });
            self.flush(self.round);
            return false;
        }

        let (living_heroes, fallen_heroes): (Vec<_>, Vec<_>) =
            heroes.into_iter().partition(|h| h.is_alive());
        let (living_enemies, fallen_enemies): (Vec<_>, Vec<_>) =
            enemies.into_iter().partition(|e| e.is_alive());
        self.retired_heroes.extend(fallen_heroes);
        self.retired_enemies.extend(fallen_enemies);

        if living_heroes.is_empty() || living_enemies.is_empty() {
            warn!(
                heroes = living_heroes.len(),
                enemies = living_enemies.len(),
                "cannot start combat with an empty side"
            );
            let reason = if living_heroes.is_empty() {
                "no living heroes"
            } else {
                "no living enemies"
            };
            self.retired_heroes.extend(living_heroes);
            self.retired_enemies.extend(living_enemies);
            self.pending.push(CombatEvent::SetupFailed {
                reason: reason.to_string(),
            });
            self.flush(self.round);
            return false;
        }

        info!(
            heroes = living_heroes.len(),
            enemies = living_enemies.len(),
            "combat started"
        );
        self.pending.push(CombatEvent::CombatStarted {
            heroes: living_heroes.len(),
            enemies: living_enemies.len(),
        });
        // Survivors of an earlier encounter stay on the manager.
        self.retired_heroes.append(&mut self.heroes);
        self.retired_enemies.append(&mut self.enemies);
        self.heroes = living_heroes;
        self.enemies = living_enemies;
        self.round = 0;
        self.result = None;
        self.announced_defeats.clear();
        self.setup_round();
        true
    }

    /// Hand back every hero, in the order they were given. Empty while an
    /// encounter is running.
    pub fn take_party(&mut self) -> Vec<Combatant> {
        if self.is_active() {
            return Vec::new();
        }
        let mut party: Vec<Combatant> = self.heroes.drain(..).collect();
        party.append(&mut self.retired_heroes);
        let order = mem::take(&mut self.party_order);
        party.sort_by_key(|hero| {
            order
                .iter()
                .position(|id| *id == hero.id())
                .unwrap_or(usize::MAX)
        });
        party
    }

    /// Hand back every enemy, summons included. Empty while an encounter is
    /// running.
    pub fn take_enemies(&mut self) -> Vec<Combatant> {
        if self.is_active() {
            return Vec::new();
        }
        let mut enemies: Vec<Combatant> = self.enemies.drain(..).collect();
        enemies.append(&mut self.retired_enemies);
        enemies
    }

    // ===== Turn driving =====

    /// Resolve the next turn: the hero automation or the enemy AI picks the
    /// action. Returns false when there is no encounter to advance.
    pub fn step(&mut self) -> bool {
        let Some(id) = self.prepare_turn() else {
            return false;
        };
        match self.locate(id) {
            Some((Side::Hero, index)) => {
                let command = ai::choose_hero_command(
                    &self.heroes[index],
                    &self.enemies,
                    self.dice.as_mut(),
                );
                self.perform_hero(index, command);
            }
            Some((Side::Enemy, index)) => self.perform_enemy(index),
            None => return false,
        }
        self.finish_turn();
        true
    }

    /// Resolve the current hero's turn with an explicit command. Returns
    /// false without spending the turn when it is not a hero's turn or the
    /// command names a slot or target that does not exist.
    pub fn act(&mut self, command: HeroCommand) -> bool {
        let Some(id) = self.prepare_turn() else {
            return false;
        };
        let Some((Side::Hero, index)) = self.locate(id) else {
            return false;
        };
        if !self.command_is_valid(index, &command) {
            return false;
        }
        self.perform_hero(index, command);
        self.finish_turn();
        true
    }

    /// Try to flee with the current hero.
    pub fn flee(&mut self) -> bool {
        self.act(HeroCommand::Flee)
    }

    /// Skip ahead to the next turn a hero can take, resolving enemy turns on
    /// the way. Returns that hero, or `None` once the encounter is over.
    pub fn advance_to_hero(&mut self) -> Option<&Combatant> {
        loop {
            let id = self.prepare_turn()?;
            match self.locate(id) {
                Some((Side::Hero, _)) => break,
                Some((Side::Enemy, _)) => {
                    self.step();
                }
                None => return None,
            }
        }
        self.current_actor()
    }

    /// Step until the encounter ends or `max_rounds` rounds have passed.
    /// Returns `None` when the round cap stopped it.
    pub fn run_to_completion(&mut self) -> Option<CombatResult> {
        while self.is_active() {
            if self.round >= self.config.max_rounds {
                warn!(rounds = self.round, "round cap reached");
                return None;
            }
            if !self.step() {
                break;
            }
        }
        match self.phase {
            CombatPhase::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Clear the transient encounter state and return to idle. Characters
    /// stay with the manager until taken.
    pub fn reset(&mut self) {
        self.turn_order.clear();
        self.cursor = 0;
        self.round = 0;
        for combatant in self
            .heroes
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .chain(self.retired_heroes.iter_mut())
            .chain(self.retired_enemies.iter_mut())
        {
            combatant.clear_defending();
        }
        self.phase = CombatPhase::Idle;
        debug!("combat manager reset");
    }

    // ===== Internals =====

    fn locate(&self, id: CharacterId) -> Option<(Side, usize)> {
        if let Some(i) = self.heroes.iter().position(|h| h.id() == id) {
            return Some((Side::Hero, i));
        }
        self.enemies
            .iter()
            .position(|e| e.id() == id)
            .map(|i| (Side::Enemy, i))
    }

    /// Move the cursor to the next actor able to act, skipping the
    /// incapacitated and finishing rounds as needed.
    fn prepare_turn(&mut self) -> Option<CharacterId> {
        loop {
            match self.phase {
                CombatPhase::Setup => self.setup_round(),
                CombatPhase::RoundEnd => self.end_round(),
                CombatPhase::TurnLoop => {
                    let Some(&id) = self.turn_order.get(self.cursor) else {
                        self.phase = CombatPhase::RoundEnd;
                        continue;
                    };
                    let Some((side, index)) = self.locate(id) else {
                        // Fled mid-round.
                        self.cursor += 1;
                        continue;
                    };
                    let actor = match side {
                        Side::Hero => &self.heroes[index],
                        Side::Enemy => &self.enemies[index],
                    };
                    if actor.character.is_incapacitated() {
                        let status = if actor.character.is_defeated() {
                            StatusKind::Defeated
                        } else {
                            StatusKind::Paralyzed
                        };
                        debug!(actor = %actor.name(), %status, "turn skipped");
                        self.pending.push(CombatEvent::TurnSkipped {
                            actor: actor.who(),
                            status,
                        });
                        self.flush(self.round + 1);
                        self.cursor += 1;
                        continue;
                    }
                    return Some(id);
                }
                CombatPhase::Idle | CombatPhase::Finished(_) => return None,
            }
        }
    }

    fn command_is_valid(&self, index: usize, command: &HeroCommand) -> bool {
        let hero = &self.heroes[index];
        match *command {
            HeroCommand::Attack { index, target } => {
                index < hero.class.attacks().len() && target < self.enemies.len()
            }
            HeroCommand::UseItem { slot, target } => {
                let has_item = hero.inventory().and_then(|inv| inv.get(slot)).is_some();
                let target_exists = match target {
                    ItemTarget::Myself => true,
                    ItemTarget::Ally(i) => i < self.heroes.len(),
                    ItemTarget::Foe(i) => i < self.enemies.len(),
                };
                has_item && target_exists
            }
            HeroCommand::HealAlly { ally, .. } => ally < self.heroes.len(),
            HeroCommand::CastStatus { target, .. } => target < self.enemies.len(),
            HeroCommand::Defend | HeroCommand::Flee | HeroCommand::Wait => true,
        }
    }

    fn perform_hero(&mut self, index: usize, command: HeroCommand) {
        debug!(hero = %self.heroes[index].name(), ?command, "hero acts");
        match command {
            HeroCommand::Attack { index: slot, target } => {
                let mut ctx =
                    ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
                self.heroes[index].perform_attack_at(slot, target, &mut self.enemies, &mut ctx);
            }
            HeroCommand::Defend => self.heroes[index].defend(&mut self.pending),
            HeroCommand::UseItem { slot, target } => self.use_item(index, slot, target),
            HeroCommand::Flee => self.attempt_flee(index),
            HeroCommand::HealAlly { ally, amount } => {
                let mut ctx =
                    ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
                if ally == index {
                    self.heroes[index].cast_heal(None, amount, &mut ctx);
                } else if let Some((healer, target)) = pair_mut(&mut self.heroes, index, ally) {
                    healer.cast_heal(Some(target), amount, &mut ctx);
                }
            }
            HeroCommand::CastStatus { target, status } => {
                let mut ctx =
                    ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
                if let Some(foe) = self.enemies.get_mut(target) {
                    self.heroes[index].cast_status(foe, status, CAST_STATUS_ROUNDS, &mut ctx);
                }
            }
            HeroCommand::Wait => {
                let actor = self.heroes[index].who();
                self.pending.push(CombatEvent::Waited { actor });
            }
        }
    }

    fn use_item(&mut self, user: usize, slot: usize, target: ItemTarget) {
        let Some(mut inventory) = self.heroes[user].inventory_mut().map(mem::take) else {
            return;
        };
        let item_name = inventory
            .get(slot)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        let user_who = self.heroes[user].who();

        let mut ctx = ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
        let mark = ctx.events.len();
        let recipient = match target {
            ItemTarget::Myself => self.heroes.get_mut(user),
            ItemTarget::Ally(i) => self.heroes.get_mut(i),
            ItemTarget::Foe(i) => self.enemies.get_mut(i),
        };
        let (success, target_who) = match recipient {
            Some(recipient) => (
                inventory.use_item(slot, recipient, &mut ctx),
                recipient.who(),
            ),
            None => (false, user_who.clone()),
        };
        ctx.events.insert(
            mark,
            CombatEvent::ItemUsed {
                user: user_who,
                target: target_who,
                item: item_name,
                success,
            },
        );

        if let Some(held) = self.heroes[user].inventory_mut() {
            *held = inventory;
        }
    }

    fn attempt_flee(&mut self, index: usize) {
        let success = self.dice.chance(self.config.flee_chance);
        let hero = self.heroes[index].who();
        self.pending.push(CombatEvent::FleeAttempted {
            hero: hero.clone(),
            success,
        });
        if !success {
            return;
        }

        info!(hero = %hero, "hero fled");
        let mut fled = self.heroes.remove(index);
        fled.clear_defending();
        self.retired_heroes.push(fled);
        if !self.heroes.iter().any(|h| h.is_alive()) {
            self.finish(CombatResult::Fled);
        }
    }

    fn perform_enemy(&mut self, index: usize) {
        let action = ai::choose_action(&self.enemies[index], &self.heroes, self.dice.as_mut());
        debug!(enemy = %self.enemies[index].name(), ?action, "enemy acts");
        let mut ctx = ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
        let outcome = ai::execute(&mut self.enemies[index], action, &mut self.heroes, &mut ctx);
        // Summons join next round's initiative.
        self.enemies.extend(outcome.summoned);
    }

    fn finish_turn(&mut self) {
        self.cursor += 1;
        self.announce_defeats();
        self.flush(self.round + 1);
        if !self.is_active() {
            return;
        }

        let heroes_wiped = !self.heroes.iter().any(|h| h.is_alive());
        let enemies_wiped = !self.enemies.iter().any(|e| e.is_alive());
        if heroes_wiped || enemies_wiped || self.cursor >= self.turn_order.len() {
            self.end_round();
        }
    }

    fn announce_defeats(&mut self) {
        for combatant in self.heroes.iter().chain(&self.enemies) {
            if combatant.is_alive() {
                self.announced_defeats.remove(&combatant.id());
            } else if self.announced_defeats.insert(combatant.id()) {
                debug!(target = %combatant.name(), "defeated");
                self.pending.push(CombatEvent::Defeated {
                    target: combatant.who(),
                });
            }
        }
    }

    /// Roll initiative for every living character and open the next round.
    fn setup_round(&mut self) {
        self.phase = CombatPhase::Setup;
        let mut rolls = Vec::new();
        for combatant in self.heroes.iter().chain(&self.enemies) {
            if combatant.is_alive() {
                let roll = self.dice.d20();
                rolls.push((combatant.id(), combatant.who(), roll));
            }
        }
        // Stable: ties keep heroes before enemies, roster order within a side.
        rolls.sort_by(|a, b| b.2.cmp(&a.2));

        self.turn_order = rolls.iter().map(|(id, _, _)| *id).collect();
        self.cursor = 0;
        self.pending.push(CombatEvent::RoundStarted {
            round: self.round + 1,
        });
        self.pending.push(CombatEvent::InitiativeRolled {
            order: rolls.into_iter().map(|(_, who, roll)| (who, roll)).collect(),
        });
        self.phase = CombatPhase::TurnLoop;
        self.flush(self.round + 1);
    }

    fn end_round(&mut self) {
        self.phase = CombatPhase::RoundEnd;
        {
            let mut ctx = ActionContext::new(self.dice.as_mut(), &self.config, &mut self.pending);
            for combatant in self.heroes.iter_mut().chain(self.enemies.iter_mut()) {
                combatant.end_of_round(&mut ctx);
            }
        }
        self.announce_defeats();

        let (standing, fallen): (Vec<_>, Vec<_>) =
            mem::take(&mut self.enemies).into_iter().partition(|e| e.is_alive());
        self.enemies = standing;
        let living_heroes = self.heroes.iter().filter(|h| h.is_alive()).count();
        for enemy in &fallen {
            self.reward(enemy, living_heroes);
        }
        self.retired_enemies.extend(fallen);

        let (standing, fallen): (Vec<_>, Vec<_>) =
            mem::take(&mut self.heroes).into_iter().partition(|h| h.is_alive());
        self.heroes = standing;
        self.retired_heroes.extend(fallen);

        let present: HashSet<CharacterId> = self.enemies.iter().map(|e| e.id()).collect();
        for enemy in &mut self.enemies {
            if let Class::FinalBoss(state) = &mut enemy.class {
                state.prune_summons(|id| present.contains(&id));
            }
        }

        self.flush(self.round + 1);
        self.round += 1;
        self.pending.push(CombatEvent::RoundEnded { round: self.round });

        if self.enemies.is_empty() {
            self.finish(CombatResult::Victory);
        } else if self.heroes.is_empty() {
            self.finish(CombatResult::Defeat);
        }
        self.flush(self.round);

        if self.is_active() {
            self.setup_round();
        }
    }

    /// Experience and loot for one defeated enemy. Summons are worth nothing.
    fn reward(&mut self, enemy: &Combatant, living_heroes: usize) {
        let points = enemy.point_value();
        if points == 0 {
            return;
        }

        let share = experience_share(points, self.config.experience_divisor, living_heroes);
        for hero in self.heroes.iter_mut().filter(|h| h.is_alive()) {
            hero.gain_experience(share, &mut self.pending);
        }

        for item in items::loot_for(points, self.dice.as_mut()) {
            self.pending.push(CombatEvent::LootDropped {
                enemy: enemy.who(),
                item: item.name.clone(),
            });
            let living: Vec<usize> = self
                .heroes
                .iter()
                .enumerate()
                .filter(|(_, h)| h.is_alive())
                .map(|(i, _)| i)
                .collect();
            let receiver = self
                .dice
                .pick_index(living.len())
                .map(|i| living[i]);
            let name = item.name.clone();
            let received = receiver.and_then(|i| {
                let hero = &mut self.heroes[i];
                let added = hero.inventory_mut()?.add_item(item);
                added.then(|| hero.who())
            });
            match received {
                Some(hero) => self.pending.push(CombatEvent::LootReceived { hero, item: name }),
                None => self.pending.push(CombatEvent::LootLost { item: name }),
            }
        }
    }

    fn finish(&mut self, result: CombatResult) {
        info!(%result, rounds = self.round, "combat finished");
        self.phase = CombatPhase::Finished(result);
        self.result = Some(result);
        self.pending.push(CombatEvent::CombatEnded {
            result,
            rounds: self.round,
        });
    }

    /// Move pending events into the log and the public event stream.
    fn flush(&mut self, round: u32) {
        for event in self.pending.drain(..) {
            self.log.push(round, event.clone());
            self.events.push(event);
        }
    }
}

impl fmt::Debug for CombatManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatManager")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("heroes", &self.heroes.len())
            .field("enemies", &self.enemies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use crate::testing::ScriptedDice;

    fn manager(dice: ScriptedDice) -> CombatManager {
        CombatManager::new(CombatConfig::default(), Box::new(dice))
    }

    fn weak_skeleton() -> Combatant {
        Combatant::skeleton().with_stats(10.0, 8.0, 0.0)
    }

    fn events_matching(manager: &CombatManager, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        manager.log().entries().iter().filter(|e| pred(&e.event)).count()
    }

    #[test]
    fn test_pair_mut() {
        let mut values = [1, 2, 3];
        let (a, b) = pair_mut(&mut values, 2, 0).unwrap();
        std::mem::swap(a, b);
        assert_eq!(values, [3, 2, 1]);
        assert!(pair_mut(&mut values, 1, 1).is_none());
        assert!(pair_mut(&mut values, 0, 3).is_none());
    }

    #[test]
    fn test_empty_side_stays_idle() {
        let mut manager = manager(ScriptedDice::never());
        assert!(!manager.start_combat(vec![Combatant::mage("Aria")], vec![]));
        assert_eq!(manager.phase(), CombatPhase::Idle);
        assert_eq!(
            events_matching(&manager, |e| matches!(e, CombatEvent::SetupFailed { .. })),
            1
        );
        let party = manager.take_party();
        assert_eq!(party.len(), 1);
        assert_eq!(party[0].name(), "Aria");
    }

    #[test]
    fn test_one_round_victory() {
        let mut manager = manager(ScriptedDice::never());
        let hero = Combatant::warrior("Brom").with_stats(100.0, 20.0, 0.0);
        assert!(manager.start_combat(vec![hero], vec![weak_skeleton()]));
        assert_eq!(manager.phase(), CombatPhase::TurnLoop);

        assert_eq!(manager.run_to_completion(), Some(CombatResult::Victory));
        assert_eq!(manager.round(), 1);
        assert_eq!(manager.result(), Some(CombatResult::Victory));
        assert!(manager.enemies().is_empty());
        assert_eq!(
            events_matching(&manager, |e| matches!(e, CombatEvent::Defeated { .. })),
            1
        );

        let party = manager.take_party();
        assert_eq!(party[0].hero().unwrap().experience, 5);
        assert_eq!(manager.take_enemies().len(), 1);
    }

    #[test]
    fn test_fireball_on_skeleton() {
        let mut manager = manager(ScriptedDice::never());
        manager.start_combat(vec![Combatant::mage("Aria")], vec![Combatant::skeleton()]);

        assert!(manager.act(HeroCommand::Attack {
            index: 0,
            target: 0
        }));
        assert_eq!(manager.enemies()[0].character.health, 15.0);
        assert_eq!(manager.heroes()[0].character.mana, 85.0);
    }

    #[test]
    fn test_act_rejects_bad_commands() {
        let mut manager = manager(ScriptedDice::never());
        manager.start_combat(vec![Combatant::mage("Aria")], vec![Combatant::skeleton()]);

        assert!(!manager.act(HeroCommand::Attack {
            index: 9,
            target: 0
        }));
        assert!(!manager.act(HeroCommand::UseItem {
            slot: 0,
            target: ItemTarget::Myself
        }));
        assert_eq!(manager.current_actor().unwrap().name(), "Aria");
    }

    #[test]
    fn test_forced_flee_yields_fled() {
        let mut manager = manager(ScriptedDice::always());
        manager.start_combat(vec![Combatant::rogue("Vex")], vec![Combatant::orc()]);

        assert!(manager.flee());
        assert_eq!(manager.phase(), CombatPhase::Finished(CombatResult::Fled));
        assert!(manager.heroes().is_empty());
        assert_eq!(manager.take_party().len(), 1);
    }

    #[test]
    fn test_flee_removes_only_that_hero() {
        let mut manager = manager(ScriptedDice::always());
        manager.start_combat(
            vec![Combatant::rogue("Vex"), Combatant::mage("Aria")],
            vec![Combatant::orc()],
        );

        assert!(manager.flee());
        assert!(manager.is_active());
        assert_eq!(manager.heroes().len(), 1);
        assert_eq!(manager.heroes()[0].name(), "Aria");

        assert_eq!(manager.turn_order().len(), 3);
        assert_eq!(manager.current_actor().unwrap().name(), "Aria");
    }

    #[test]
    fn test_paralyzed_enemy_is_skipped() {
        let mut manager = manager(ScriptedDice::never());
        let mut orc = Combatant::orc();
        orc.character.apply_status(StatusKind::Paralyzed, 1, 1.0);
        let hero = Combatant::warrior("Brom");
        manager.start_combat(vec![hero], vec![orc]);

        assert!(manager.act(HeroCommand::Defend));
        assert_eq!(manager.advance_to_hero().unwrap().name(), "Brom");
        assert_eq!(
            events_matching(&manager, |e| matches!(
                e,
                CombatEvent::TurnSkipped {
                    status: StatusKind::Paralyzed,
                    ..
                }
            )),
            1
        );
        // Both turns used: round one is over.
        assert_eq!(manager.round(), 1);
        assert!(!manager.enemies()[0].character.has_status(StatusKind::Paralyzed));
    }

    #[test]
    fn test_loot_lost_when_inventory_full() {
        let mut manager = manager(ScriptedDice::always());
        let mut hero = Combatant::warrior("Brom");
        hero.hero_mut().unwrap().inventory = Inventory::new(0);
        manager.start_combat(vec![hero], vec![weak_skeleton()]);

        assert_eq!(manager.run_to_completion(), Some(CombatResult::Victory));
        assert_eq!(
            events_matching(&manager, |e| matches!(e, CombatEvent::LootLost { .. })),
            1
        );
        assert!(manager
            .log()
            .lines()
            .any(|line| line.ends_with("could not be picked up")));
    }

    #[test]
    fn test_loot_received() {
        let mut manager = manager(ScriptedDice::always());
        manager.start_combat(vec![Combatant::warrior("Brom")], vec![weak_skeleton()]);
        manager.run_to_completion();

        let party = manager.take_party();
        let inventory = party[0].inventory().unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get(0).unwrap().name, "Phoenix Feather");
    }

    #[test]
    fn test_experience_split_between_living_heroes() {
        let mut manager = manager(ScriptedDice::never());
        let heroes = vec![
            Combatant::warrior("Brom").with_stats(100.0, 20.0, 0.0),
            Combatant::rogue("Vex"),
        ];
        manager.start_combat(heroes, vec![weak_skeleton()]);
        manager.run_to_completion();

        for hero in manager.take_party() {
            assert_eq!(hero.hero().unwrap().experience, 2);
        }
    }

    #[test]
    fn test_round_cap_returns_none() {
        let config = CombatConfig::default().with_max_rounds(1);
        let mut manager = CombatManager::new(config, Box::new(ScriptedDice::never()));
        manager.start_combat(vec![Combatant::warrior("Brom")], vec![Combatant::dragon()]);

        assert_eq!(manager.run_to_completion(), None);
        assert_eq!(manager.round(), 1);
        assert!(manager.is_active());
        assert!(manager.take_party().is_empty());
    }

    #[test]
    fn test_reset_clears_defending() {
        let mut manager = manager(ScriptedDice::always());
        manager.start_combat(vec![Combatant::rogue("Vex")], vec![Combatant::orc()]);
        manager.flee();
        manager.reset();

        assert_eq!(manager.phase(), CombatPhase::Idle);
        assert_eq!(manager.round(), 0);
        assert!(manager.turn_order().is_empty());
        assert_eq!(manager.result(), Some(CombatResult::Fled));
        for hero in manager.take_party() {
            assert!(!hero.character.is_defending);
        }
    }

    #[test]
    fn test_start_while_running_keeps_characters() {
        let mut manager = manager(ScriptedDice::never());
        manager.start_combat(vec![Combatant::warrior("Brom")], vec![Combatant::dragon()]);
        assert!(!manager.start_combat(vec![Combatant::mage("Aria")], vec![]));
        assert!(manager.is_active());
        assert!(manager.character(manager.heroes()[0].id()).is_some());
    }

    #[test]
    fn test_drain_events_matches_log() {
        let mut manager = manager(ScriptedDice::never());
        manager.start_combat(vec![Combatant::mage("Aria")], vec![Combatant::skeleton()]);
        let events = manager.drain_events();
        assert_eq!(events.len(), manager.log().len());
        assert!(matches!(events[0], CombatEvent::CombatStarted { .. }));
        assert!(manager.drain_events().is_empty());
    }
}
