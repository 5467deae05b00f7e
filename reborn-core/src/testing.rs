//! Testing utilities for combat scenarios.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedDice` replays chosen rolls instead of drawing randomly
//! - `CombatHarness` wraps a `CombatManager` for scripted encounters
//! - Assertion helpers for verifying encounter state

use crate::combat::{CombatManager, CombatResult};
use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::dice::Dice;
use crate::events::CombatEvent;
use std::collections::VecDeque;

/// Dice that return queued values first, then a fixed fallback.
///
/// `unit` draws feed every probability check (`chance(p)` succeeds when
/// the draw is below `p`); `below` draws feed index picks and die rolls.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
    unit_fallback: f64,
    index_fallback: usize,
}

impl ScriptedDice {
    pub fn new(unit_fallback: f64, index_fallback: usize) -> Self {
        Self {
            units: VecDeque::new(),
            indices: VecDeque::new(),
            unit_fallback,
            index_fallback,
        }
    }

    /// Every chance fails: no crits, no procs, no evasion, no drops.
    pub fn never() -> Self {
        Self::new(0.99, 0)
    }

    /// Every chance with a non-zero probability succeeds.
    pub fn always() -> Self {
        Self::new(0.0, 0)
    }

    /// Queue probability draws, consumed in order.
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    /// Queue index draws, consumed in order and wrapped into range.
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn push_unit(&mut self, unit: f64) {
        self.units.push_back(unit);
    }

    pub fn push_index(&mut self, index: usize) {
        self.indices.push_back(index);
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.units.len() + self.indices.len()
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(self.unit_fallback)
    }

    fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        match self.indices.pop_front() {
            Some(index) => index % upper,
            None => self.index_fallback.min(upper - 1),
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Test harness for running combat scenarios.
pub struct CombatHarness {
    /// The manager under test.
    pub manager: CombatManager,
}

impl CombatHarness {
    /// A harness with default rules.
    pub fn new(dice: ScriptedDice) -> Self {
        Self::with_config(CombatConfig::default(), dice)
    }

    pub fn with_config(config: CombatConfig, dice: ScriptedDice) -> Self {
        Self {
            manager: CombatManager::new(config, Box::new(dice)),
        }
    }

    /// Start an encounter, panicking if it does not begin.
    #[track_caller]
    pub fn start(&mut self, heroes: Vec<Combatant>, enemies: Vec<Combatant>) -> &mut Self {
        assert!(
            self.manager.start_combat(heroes, enemies),
            "Expected combat to start"
        );
        self
    }

    /// Find an active character by name.
    pub fn find(&self, name: &str) -> Option<&Combatant> {
        self.manager
            .heroes()
            .iter()
            .chain(self.manager.enemies())
            .find(|c| c.name() == name)
    }

    pub fn health_of(&self, name: &str) -> Option<f64> {
        self.find(name).map(|c| c.character.health)
    }

    /// Count logged events matching a predicate.
    pub fn count_events(&self, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        self.manager
            .log()
            .entries()
            .iter()
            .filter(|entry| pred(&entry.event))
            .count()
    }

    pub fn log_contains(&self, text: &str) -> bool {
        self.manager.log().lines().any(|line| line.contains(text))
    }

    /// The rendered log, one line per event.
    pub fn transcript(&self) -> String {
        self.manager.log().lines().collect::<Vec<_>>().join("\n")
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the encounter ended with the given result.
#[track_caller]
pub fn assert_result(harness: &CombatHarness, expected: CombatResult) {
    assert_eq!(
        harness.manager.result(),
        Some(expected),
        "Expected {expected}, log was:\n{}",
        harness.transcript()
    );
}

/// Assert an active character's current health.
#[track_caller]
pub fn assert_health(harness: &CombatHarness, name: &str, expected: f64) {
    let actual = harness.health_of(name);
    assert_eq!(
        actual,
        Some(expected),
        "Expected {name} at {expected} health, got {actual:?}"
    );
}

/// Assert some log line contains `text`.
#[track_caller]
pub fn assert_logged(harness: &CombatHarness, text: &str) {
    assert!(
        harness.log_contains(text),
        "Expected log to contain '{text}', log was:\n{}",
        harness.transcript()
    );
}
