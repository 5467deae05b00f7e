//! Party persistence.
//!
//! A [`PartySnapshot`] holds what is needed to rebuild the hero roster
//! between encounters: class, progression, stat block and inventory.
//! Transient combat state (statuses, rage, stealth, shields) is not saved;
//! restored heroes start from their class defaults. Reading and writing
//! files is left to the caller.

use crate::character::CharacterId;
use crate::classes::ClassKind;
use crate::combatant::Combatant;
use crate::inventory::Inventory;
use crate::items::{find_item, Item};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("{name} is a {class}, not a hero class")]
    NotAHero { name: String, class: ClassKind },

    #[error("{name} has invalid stats: {reason}")]
    InvalidStats { name: String, reason: String },

    #[error("{name}'s inventory cannot hold {item}")]
    InventoryOverflow { name: String, item: String },
}

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A saved hero roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySnapshot {
    /// Format version for compatibility checking.
    pub version: u32,
    pub heroes: Vec<HeroRecord>,
}

/// One saved hero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroRecord {
    pub id: CharacterId,
    pub name: String,
    pub class: ClassKind,
    pub level: u32,
    pub experience: u32,
    pub stats: StatBlock,
    pub inventory_capacity: usize,
    pub inventory: Vec<ItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub attack_power: f64,
    pub defense: f64,
    pub critical_chance: f64,
}

impl StatBlock {
    /// Pools must be finite and non-negative, with current values inside them.
    fn validate(&self) -> Result<(), &'static str> {
        let values = [
            self.health,
            self.max_health,
            self.mana,
            self.max_mana,
            self.attack_power,
            self.defense,
            self.critical_chance,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("non-finite value");
        }
        if self.max_health < 0.0 || self.max_mana < 0.0 {
            return Err("negative maximum");
        }
        if !(0.0..=self.max_health).contains(&self.health) {
            return Err("health outside 0..=max_health");
        }
        if !(0.0..=self.max_mana).contains(&self.mana) {
            return Err("mana outside 0..=max_mana");
        }
        Ok(())
    }
}

/// An inventory slot, stored by catalog name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub quantity: u32,
    /// Uses already spent on the top copy of the stack.
    pub uses: i32,
}

impl PartySnapshot {
    /// Capture every hero in `party`. Enemies are ignored.
    pub fn capture<'a>(party: impl IntoIterator<Item = &'a Combatant>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            heroes: party.into_iter().filter_map(HeroRecord::capture).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Rebuild the roster in saved order.
    pub fn restore(&self) -> Result<Vec<Combatant>, PersistError> {
        self.heroes.iter().map(HeroRecord::restore).collect()
    }
}

impl HeroRecord {
    /// `None` for enemies.
    pub fn capture(hero: &Combatant) -> Option<Self> {
        let profile = hero.hero()?;
        let c = &hero.character;
        Some(Self {
            id: c.id,
            name: c.name.clone(),
            class: hero.kind(),
            level: profile.level,
            experience: profile.experience,
            stats: StatBlock {
                health: c.health,
                max_health: c.max_health,
                mana: c.mana,
                max_mana: c.max_mana,
                attack_power: c.attack_power,
                defense: c.defense,
                critical_chance: c.critical_chance,
            },
            inventory_capacity: profile.inventory.capacity(),
            inventory: profile
                .inventory
                .slots()
                .iter()
                .map(|slot| ItemRecord {
                    name: slot.item.name.clone(),
                    quantity: slot.quantity,
                    uses: slot.item.uses,
                })
                .collect(),
        })
    }

    pub fn restore(&self) -> Result<Combatant, PersistError> {
        self.stats.validate().map_err(|reason| PersistError::InvalidStats {
            name: self.name.clone(),
            reason: reason.to_string(),
        })?;
        let mut hero = match self.class {
            ClassKind::Mage => Combatant::mage(self.name.clone()),
            ClassKind::Warrior => Combatant::warrior(self.name.clone()),
            ClassKind::Rogue => Combatant::rogue(self.name.clone()),
            class => {
                return Err(PersistError::NotAHero {
                    name: self.name.clone(),
                    class,
                })
            }
        };

        let mut inventory = Inventory::new(self.inventory_capacity);
        for record in &self.inventory {
            let item = find_item(&record.name)
                .ok_or_else(|| PersistError::UnknownItem(record.name.clone()))?;
            if record.quantity == 0 {
                continue;
            }
            // The first copy opens the slot and carries the spent uses.
            let first = Item {
                uses: record.uses,
                ..item.clone()
            };
            let copies = std::iter::once(first)
                .chain(std::iter::repeat(item).take(record.quantity as usize - 1));
            for copy in copies {
                if !inventory.add_item(copy) {
                    return Err(PersistError::InventoryOverflow {
                        name: self.name.clone(),
                        item: record.name.clone(),
                    });
                }
            }
        }

        let c = &mut hero.character;
        c.id = self.id;
        c.max_health = self.stats.max_health;
        c.health = self.stats.max_health;
        c.lose_health(self.stats.max_health - self.stats.health);
        c.max_mana = self.stats.max_mana;
        c.mana = self.stats.mana;
        c.attack_power = self.stats.attack_power;
        c.defense = self.stats.defense;
        c.critical_chance = self.stats.critical_chance;

        if let Some(profile) = hero.hero_mut() {
            profile.level = self.level;
            profile.experience = self.experience;
            profile.inventory = inventory;
        }
        Ok(hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch() {
        let json = r#"{"version": 99, "heroes": []}"#;
        match PartySnapshot::from_json(json) {
            Err(PersistError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SNAPSHOT_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PartySnapshot::from_json("not json"),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn test_enemies_are_not_captured() {
        let snapshot = PartySnapshot::capture(&[Combatant::mage("Aria"), Combatant::orc()]);
        assert_eq!(snapshot.heroes.len(), 1);
        assert_eq!(snapshot.heroes[0].class, ClassKind::Mage);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut snapshot = PartySnapshot::capture(&[Combatant::rogue("Vex")]);
        snapshot.heroes[0].inventory.push(ItemRecord {
            name: "Vorpal Sword".to_string(),
            quantity: 1,
            uses: 0,
        });
        match snapshot.restore() {
            Err(PersistError::UnknownItem(name)) => assert_eq!(name, "Vorpal Sword"),
            other => panic!("expected unknown item, got {other:?}"),
        }
    }

    #[test]
    fn test_enemy_class_rejected() {
        let mut snapshot = PartySnapshot::capture(&[Combatant::rogue("Vex")]);
        snapshot.heroes[0].class = ClassKind::Dragon;
        assert!(matches!(
            snapshot.restore(),
            Err(PersistError::NotAHero { .. })
        ));
    }

    #[test]
    fn test_invalid_stats_rejected() {
        let mut snapshot = PartySnapshot::capture(&[Combatant::mage("Aria")]);
        snapshot.heroes[0].stats.max_mana = -5.0;
        let json = snapshot.to_json().unwrap();
        match PartySnapshot::from_json(&json).unwrap().restore() {
            Err(PersistError::InvalidStats { name, .. }) => assert_eq!(name, "Aria"),
            other => panic!("expected invalid stats, got {other:?}"),
        }

        let mut snapshot = PartySnapshot::capture(&[Combatant::warrior("Brom")]);
        snapshot.heroes[0].stats.health = 500.0;
        assert!(matches!(
            snapshot.restore(),
            Err(PersistError::InvalidStats { .. })
        ));

        snapshot.heroes[0].stats.health = 50.0;
        snapshot.heroes[0].stats.attack_power = f64::NAN;
        assert!(matches!(
            snapshot.restore(),
            Err(PersistError::InvalidStats { .. })
        ));
    }

    #[test]
    fn test_inventory_overflow_rejected() {
        let mut snapshot = PartySnapshot::capture(&[Combatant::rogue("Vex")]);
        let hero = &mut snapshot.heroes[0];
        hero.inventory_capacity = 1;
        hero.inventory = vec![
            ItemRecord {
                name: "Small Healing Potion".to_string(),
                quantity: 3,
                uses: 0,
            },
            ItemRecord {
                name: "Poison Flask".to_string(),
                quantity: 1,
                uses: 0,
            },
        ];
        match snapshot.restore() {
            Err(PersistError::InventoryOverflow { name, item }) => {
                assert_eq!(name, "Vex");
                assert_eq!(item, "Poison Flask");
            }
            other => panic!("expected inventory overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_low_health_restores_wounded() {
        let mut warrior = Combatant::warrior("Brom");
        warrior.character.lose_health(100.0);
        let restored = PartySnapshot::capture(&[warrior]).restore().unwrap();
        assert_eq!(restored[0].character.health, 20.0);
        assert!(restored[0].character.has_status(crate::status::StatusKind::Wounded));
    }
}
