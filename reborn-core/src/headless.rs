//! Headless battle interface for programmatic use.
//!
//! This module provides a simplified interface for running encounters
//! without a presentation layer. It's designed for:
//! - The command-line driver
//! - Automated AI-vs-AI simulation
//! - Script-driven integration tests
//!
//! # Example
//!
//! ```
//! use reborn_core::headless::{HeadlessBattle, HeadlessConfig, Scenario};
//!
//! let config = HeadlessConfig::quick_start(Scenario::Duel).with_seed(7);
//! let mut battle = HeadlessBattle::new(config).unwrap();
//! battle.run();
//! assert!(battle.is_finished());
//! for line in battle.new_log_lines() {
//!     println!("{line}");
//! }
//! ```

use crate::combat::{CombatManager, CombatResult, HeroCommand};
use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::dice::SeededDice;
use crate::events::CombatEvent;
use crate::items::find_item;
use crate::persist::{PartySnapshot, PersistError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors from setting up a headless battle.
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("Unknown scenario: {0} (expected skirmish, boss or duel)")]
    UnknownScenario(String),

    #[error("Combat could not start: {0}")]
    SetupFailed(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Ready-made encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// The full party against skeletons and an orc.
    Skirmish,
    /// The full party against the final boss.
    Boss,
    /// A lone mage against a skeleton.
    Duel,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Skirmish, Scenario::Boss, Scenario::Duel];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Skirmish => "skirmish",
            Scenario::Boss => "boss",
            Scenario::Duel => "duel",
        }
    }

    /// The default party for this scenario.
    pub fn heroes(&self) -> Vec<Combatant> {
        match self {
            Scenario::Duel => vec![Combatant::mage("Aria")],
            Scenario::Skirmish | Scenario::Boss => {
                let mut party = vec![
                    Combatant::mage("Aria"),
                    Combatant::warrior("Brom"),
                    Combatant::rogue("Vex"),
                ];
                for hero in &mut party {
                    stock_potions(hero, 2);
                }
                party
            }
        }
    }

    pub fn enemies(&self) -> Vec<Combatant> {
        match self {
            Scenario::Skirmish => vec![
                Combatant::skeleton(),
                Combatant::skeleton().with_name("Skeleton Archer"),
                Combatant::orc(),
            ],
            Scenario::Boss => vec![Combatant::final_boss("Nexus Lord")],
            Scenario::Duel => vec![Combatant::skeleton()],
        }
    }
}

fn stock_potions(hero: &mut Combatant, count: usize) {
    let Some(potion) = find_item("Small Healing Potion") else {
        return;
    };
    if let Some(inventory) = hero.inventory_mut() {
        for _ in 0..count {
            inventory.add_item(potion.clone());
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scenario {
    type Err = HeadlessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HeadlessError::UnknownScenario(s.to_string()))
    }
}

/// Configuration for a headless battle.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Which encounter to stage.
    pub scenario: Scenario,
    /// Dice seed; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Rules for the encounter.
    pub combat: CombatConfig,
    /// Replaces the scenario's default party, e.g. one loaded from a save.
    pub party: Option<Vec<Combatant>>,
}

impl HeadlessConfig {
    /// Create a quick-start configuration with default rules and random dice.
    pub fn quick_start(scenario: Scenario) -> Self {
        Self {
            scenario,
            seed: None,
            combat: CombatConfig::default(),
            party: None,
        }
    }

    /// Create a configuration with full customization.
    pub fn custom(scenario: Scenario, seed: Option<u64>, combat: CombatConfig) -> Self {
        Self {
            scenario,
            seed,
            combat,
            party: None,
        }
    }

    /// Set the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the combat rules.
    pub fn with_combat_config(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Fight with this party instead of the scenario's.
    pub fn with_party(mut self, party: Vec<Combatant>) -> Self {
        self.party = Some(party);
        self
    }

    /// Fight with a party restored from a snapshot.
    pub fn with_snapshot(self, snapshot: &PartySnapshot) -> Result<Self, HeadlessError> {
        let party = snapshot.restore()?;
        Ok(self.with_party(party))
    }
}

/// A headless encounter that can be controlled programmatically.
///
/// This wraps `CombatManager` with a simpler interface for automated use.
pub struct HeadlessBattle {
    manager: CombatManager,
    scenario: Scenario,
    /// Log entries already handed out by `new_log_lines`.
    log_cursor: usize,
}

impl HeadlessBattle {
    /// Stage the configured encounter and start it.
    pub fn new(config: HeadlessConfig) -> Result<Self, HeadlessError> {
        let dice = match config.seed {
            Some(seed) => SeededDice::new(seed),
            None => SeededDice::from_entropy(),
        };
        let mut manager = CombatManager::new(config.combat, Box::new(dice));
        let heroes = config
            .party
            .unwrap_or_else(|| config.scenario.heroes());

        if !manager.start_combat(heroes, config.scenario.enemies()) {
            let reason = manager
                .log()
                .entries()
                .iter()
                .rev()
                .find_map(|entry| match &entry.event {
                    CombatEvent::SetupFailed { reason } => Some(reason.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            return Err(HeadlessError::SetupFailed(reason));
        }
        info!(scenario = %config.scenario, seed = ?config.seed, "headless battle started");

        Ok(Self {
            manager,
            scenario: config.scenario,
            log_cursor: 0,
        })
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Resolve one automated turn.
    pub fn step(&mut self) -> bool {
        self.manager.step()
    }

    /// Resolve the current hero's turn with an explicit command.
    pub fn act(&mut self, command: HeroCommand) -> bool {
        self.manager.act(command)
    }

    /// Run automated turns until the encounter ends or hits the round cap.
    pub fn run(&mut self) -> Option<CombatResult> {
        self.manager.run_to_completion()
    }

    /// Resolve enemy turns until a hero may act. Returns that hero's name.
    pub fn advance_to_hero(&mut self) -> Option<String> {
        self.manager
            .advance_to_hero()
            .map(|hero| hero.name().to_string())
    }

    pub fn is_finished(&self) -> bool {
        self.manager.result().is_some() && !self.manager.is_active()
    }

    pub fn result(&self) -> Option<CombatResult> {
        self.manager.result()
    }

    pub fn round(&self) -> u32 {
        self.manager.round()
    }

    /// Log lines not yet returned by a previous call.
    pub fn new_log_lines(&mut self) -> Vec<String> {
        let entries = self.manager.log().entries();
        let lines = entries
            .iter()
            .skip(self.log_cursor)
            .map(|entry| entry.description.clone())
            .collect();
        self.log_cursor = entries.len();
        lines
    }

    /// The last `count` log lines.
    pub fn recent_log(&self, count: usize) -> Vec<String> {
        self.manager
            .log()
            .recent(count)
            .iter()
            .map(|entry| entry.description.clone())
            .collect()
    }

    /// One line per active character.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, hero) in self.manager.heroes().iter().enumerate() {
            lines.push(format!("H{i} {}", describe(hero)));
        }
        for (i, enemy) in self.manager.enemies().iter().enumerate() {
            lines.push(format!("E{i} {}", describe(enemy)));
        }
        lines
    }

    /// Snapshot of every hero, including fled and defeated ones.
    pub fn snapshot(&self) -> PartySnapshot {
        PartySnapshot::capture(self.manager.party())
    }

    /// End the session and hand back the party.
    pub fn into_party(mut self) -> Vec<Combatant> {
        self.manager.reset();
        self.manager.take_party()
    }

    pub fn manager(&self) -> &CombatManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CombatManager {
        &mut self.manager
    }
}

/// Compact status text, e.g. `Aria [Mage] HP 65/80 MP 85/100 Healthy`.
pub fn describe(combatant: &Combatant) -> String {
    let c = &combatant.character;
    let mut text = format!(
        "{} [{}] HP {:.0}/{:.0} MP {:.0}/{:.0} {}",
        c.name,
        combatant.kind(),
        c.health.max(0.0),
        c.max_health,
        c.mana,
        c.max_mana,
        c.status
    );
    if let Some(profile) = combatant.hero() {
        text.push_str(&format!(
            " Lv{} XP {} Items {}",
            profile.level,
            profile.experience,
            profile.inventory.statistics().total_items
        ));
    }
    text
}
