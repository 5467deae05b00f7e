//! Turn-based combat and character progression engine for Reborn.
//!
//! This crate provides:
//! - Hero classes (Mage, Warrior, Rogue) and enemy archetypes up to the final boss
//! - Status effects, attacks and the damage pipeline
//! - Round-based encounters with initiative, rewards and loot
//! - Items, inventories, experience and party persistence
//!
//! # Quick Start
//!
//! ```
//! use reborn_core::{CombatConfig, CombatManager, Combatant, SeededDice};
//!
//! let mut manager = CombatManager::new(CombatConfig::default(), Box::new(SeededDice::new(3)));
//! manager.start_combat(
//!     vec![Combatant::warrior("Brom"), Combatant::mage("Aria")],
//!     vec![Combatant::skeleton(), Combatant::orc()],
//! );
//!
//! let result = manager.run_to_completion();
//! for line in manager.log().lines() {
//!     println!("{line}");
//! }
//! println!("{result:?}");
//! ```

pub mod ai;
pub mod attack;
pub mod character;
pub mod classes;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod events;
pub mod headless;
pub mod inventory;
pub mod items;
pub mod persist;
pub mod progression;
pub mod status;
pub mod testing;

// Primary public API
pub use character::{Character, CharacterId};
pub use classes::ClassKind;
pub use combat::{CombatManager, CombatPhase, CombatResult, HeroCommand, ItemTarget};
pub use combatant::Combatant;
pub use config::CombatConfig;
pub use dice::{Dice, SeededDice};
pub use events::{CombatEvent, CombatLog};
pub use headless::{HeadlessBattle, HeadlessConfig, HeadlessError, Scenario};
pub use inventory::Inventory;
pub use items::{find_item, Item, ItemEffect, ItemType, Rarity};
pub use persist::{PartySnapshot, PersistError};
pub use status::StatusKind;
pub use testing::{CombatHarness, ScriptedDice};
