//! Item catalog, item effects, and loot generation.
//!
//! Every item the game knows is defined once in [`CATALOG`]. Instances are
//! cloned out of it and carry their own usage counter.

use crate::classes::{Capabilities, Class};
use crate::combatant::{ActionContext, Combatant};
use crate::dice::Dice;
use crate::events::CombatEvent;
use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability that a loot roll drops anything.
pub const BASE_DROP_CHANCE: f64 = 0.7;
/// Enemies worth more than this drop up to three items.
pub const MULTI_DROP_THRESHOLD: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Healing,
    Damage,
    Buff,
    Debuff,
    Special,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Healing => "Healing",
            ItemType::Damage => "Damage",
            ItemType::Buff => "Buff",
            ItemType::Debuff => "Debuff",
            ItemType::Special => "Special",
        }
    }

    /// Position when an inventory is sorted by type.
    pub fn sort_order(&self) -> u8 {
        match self {
            ItemType::Healing => 0,
            ItemType::Buff => 1,
            ItemType::Special => 2,
            ItemType::Damage => 3,
            ItemType::Debuff => 4,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Rarest first, the order the drop table is walked in.
    pub const RAREST_FIRST: [Rarity; 5] = [
        Rarity::Legendary,
        Rarity::Epic,
        Rarity::Rare,
        Rarity::Uncommon,
        Rarity::Common,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn drop_chance(&self) -> f64 {
        match self {
            Rarity::Common => 0.6,
            Rarity::Uncommon => 0.25,
            Rarity::Rare => 0.1,
            Rarity::Epic => 0.04,
            Rarity::Legendary => 0.01,
        }
    }

    /// Rough gold value, used for inventory statistics.
    pub fn value(&self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 25,
            Rarity::Rare => 50,
            Rarity::Epic => 100,
            Rarity::Legendary => 250,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What an item does when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal,
    FullHeal,
    RestoreMana,
    Revive,
    Damage,
    RaiseAttack,
    RaiseDefense,
    RaiseCritical,
    Berserk,
    Poison,
    Curse,
    Paralyze,
    Weaken,
    Cleanse,
    MysticCrystal,
    Ward,
    Invisibility,
}

// ============================================================================
// Item
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    pub effect: ItemEffect,
    /// Effect strength: health, damage, stat points, or rounds.
    pub magnitude: f64,
    /// Uses before the item is spent; -1 means unlimited.
    pub max_uses: i32,
    pub uses: i32,
    pub rarity: Rarity,
    pub description: String,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.item_type == other.item_type
    }
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        item_type: ItemType,
        effect: ItemEffect,
        magnitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            item_type,
            effect,
            magnitude,
            max_uses: 1,
            uses: 0,
            rarity: Rarity::Common,
            description: String::new(),
        }
    }

    pub fn with_max_uses(mut self, max_uses: i32) -> Self {
        self.max_uses = max_uses;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_consumable(&self) -> bool {
        self.max_uses != -1
    }

    pub fn can_be_used(&self) -> bool {
        !self.is_consumable() || self.uses < self.max_uses
    }

    pub fn remaining_uses(&self) -> Option<i32> {
        self.is_consumable()
            .then(|| (self.max_uses - self.uses).max(0))
    }

    /// A copy with the usage counter reset.
    pub fn fresh(&self) -> Self {
        Self {
            uses: 0,
            ..self.clone()
        }
    }

    /// Items the automatic hero policy drinks when low on health.
    pub fn restores_health(&self) -> bool {
        matches!(self.effect, ItemEffect::Heal | ItemEffect::FullHeal)
    }

    /// Use the item on `target`. Consumables count the use only when the
    /// effect applied.
    pub fn use_on(&mut self, target: &mut Combatant, ctx: &mut ActionContext<'_>) -> bool {
        if !self.can_be_used() {
            return false;
        }
        let success = self.apply(target, ctx);
        if success && self.is_consumable() {
            self.uses += 1;
        }
        success
    }

    fn apply(&self, target: &mut Combatant, ctx: &mut ActionContext<'_>) -> bool {
        if self.effect == ItemEffect::Revive {
            let restored = target.character.revive(0.5);
            if restored > 0.0 {
                ctx.events.push(CombatEvent::Healed {
                    target: target.who(),
                    amount: restored,
                });
            }
            return restored > 0.0;
        }
        if target.character.is_defeated() {
            return false;
        }

        let magnitude = self.magnitude;
        let rounds = magnitude as i32;
        match self.effect {
            ItemEffect::Heal => {
                target.heal(magnitude, ctx.events);
            }
            ItemEffect::FullHeal => {
                let max = target.character.max_health;
                target.heal(max, ctx.events);
            }
            ItemEffect::RestoreMana => {
                if !target.class.capabilities().contains(Capabilities::MANA_USER) {
                    return false;
                }
                let restored = target.character.restore_mana(magnitude);
                ctx.events.push(CombatEvent::ManaRestored {
                    target: target.who(),
                    amount: restored,
                });
            }
            ItemEffect::Damage => {
                target.take_damage(magnitude, ctx);
            }
            ItemEffect::RaiseAttack => {
                target.character.attack_power += magnitude;
                raised(target, "attack", magnitude, ctx);
            }
            ItemEffect::RaiseDefense => {
                target.character.defense += magnitude;
                raised(target, "defense", magnitude, ctx);
            }
            ItemEffect::RaiseCritical => {
                target.character.critical_chance += magnitude / 100.0;
                raised(target, "critical chance", magnitude, ctx);
            }
            ItemEffect::Berserk => {
                target.apply_status(StatusKind::BerserkerRage, rounds, 1.0, ctx.events);
            }
            ItemEffect::Poison => {
                target.apply_status(StatusKind::Poisoned, rounds, 1.0, ctx.events);
            }
            ItemEffect::Curse => {
                target.apply_status(StatusKind::Cursed, rounds, 1.0, ctx.events);
            }
            ItemEffect::Paralyze => {
                target.apply_status(StatusKind::Paralyzed, rounds, 1.0, ctx.events);
            }
            ItemEffect::Weaken => {
                target.character.attack_power = (target.character.attack_power - magnitude).max(1.0);
            }
            ItemEffect::Cleanse => {
                for kind in target.character.effects.clear_negative() {
                    ctx.events.push(CombatEvent::StatusExpired {
                        target: target.who(),
                        status: kind,
                    });
                }
                target.character.refresh_status();
            }
            ItemEffect::MysticCrystal => {
                let max_health = target.character.max_health;
                if target.class.capabilities().contains(Capabilities::MANA_USER) {
                    let max_mana = target.character.max_mana;
                    target.character.restore_mana(max_mana);
                    target.heal(max_health * 0.3, ctx.events);
                } else {
                    target.heal(max_health * 0.5, ctx.events);
                }
            }
            ItemEffect::Ward => {
                target.character.defense += magnitude;
                raised(target, "defense", magnitude, ctx);
                target.apply_status(StatusKind::Defending, 5, 1.0, ctx.events);
            }
            ItemEffect::Invisibility => {
                let Class::Rogue(state) = &mut target.class else {
                    return false;
                };
                state.stealthed = true;
                state.stealth_rounds = rounds.max(0) as u32;
                target.apply_status(StatusKind::Stealthed, rounds, 1.0, ctx.events);
            }
            ItemEffect::Revive => {}
        }
        true
    }
}

fn raised(target: &Combatant, stat: &str, amount: f64, ctx: &mut ActionContext<'_>) {
    ctx.events.push(CombatEvent::StatRaised {
        target: target.who(),
        stat: stat.to_string(),
        amount,
    });
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remaining_uses() {
            Some(left) => write!(f, "{} [{}] ({}/{})", self.name, self.rarity, left, self.max_uses),
            None => write!(f, "{} [{}]", self.name, self.rarity),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

lazy_static::lazy_static! {
    /// Every item in the game, grouped by type.
    pub static ref CATALOG: Vec<Item> = vec![
        // Healing
        Item::new("Small Healing Potion", ItemType::Healing, ItemEffect::Heal, 25.0)
            .with_description("Restores 25 health"),
        Item::new("Healing Potion", ItemType::Healing, ItemEffect::Heal, 50.0)
            .with_rarity(Rarity::Uncommon)
            .with_description("Restores 50 health"),
        Item::new("Greater Healing Potion", ItemType::Healing, ItemEffect::Heal, 100.0)
            .with_rarity(Rarity::Rare)
            .with_description("Restores 100 health"),
        Item::new("Full Restore", ItemType::Healing, ItemEffect::FullHeal, 9999.0)
            .with_rarity(Rarity::Epic)
            .with_description("Restores all health"),
        Item::new("Mana Potion", ItemType::Healing, ItemEffect::RestoreMana, 50.0)
            .with_description("Restores 50 mana"),
        Item::new("Phoenix Feather", ItemType::Healing, ItemEffect::Revive, 1.0)
            .with_rarity(Rarity::Legendary)
            .with_description("Revives a defeated character"),
        // Damage
        Item::new("Throwing Knife", ItemType::Damage, ItemEffect::Damage, 20.0)
            .with_max_uses(3)
            .with_description("Deals 20 damage"),
        Item::new("Blast Bomb", ItemType::Damage, ItemEffect::Damage, 40.0)
            .with_rarity(Rarity::Uncommon)
            .with_description("Deals 40 damage"),
        Item::new("Lightning Orb", ItemType::Damage, ItemEffect::Damage, 60.0)
            .with_rarity(Rarity::Rare)
            .with_description("Deals 60 lightning damage"),
        Item::new("Dragon Bomb", ItemType::Damage, ItemEffect::Damage, 100.0)
            .with_rarity(Rarity::Epic)
            .with_description("Deals devastating damage"),
        // Buffs
        Item::new("Strength Elixir", ItemType::Buff, ItemEffect::RaiseAttack, 5.0)
            .with_description("Permanently raises attack by 5"),
        Item::new("Defense Elixir", ItemType::Buff, ItemEffect::RaiseDefense, 3.0)
            .with_description("Permanently raises defense by 3"),
        Item::new("Swiftness Elixir", ItemType::Buff, ItemEffect::RaiseCritical, 10.0)
            .with_rarity(Rarity::Uncommon)
            .with_description("Raises critical chance by 10%"),
        Item::new("Berserker Elixir", ItemType::Buff, ItemEffect::Berserk, 5.0)
            .with_rarity(Rarity::Rare)
            .with_description("Berserker rage for 5 rounds"),
        // Debuffs
        Item::new("Poison Flask", ItemType::Debuff, ItemEffect::Poison, 3.0)
            .with_description("Poisons the target for 3 rounds"),
        Item::new("Curse Scroll", ItemType::Debuff, ItemEffect::Curse, 4.0)
            .with_rarity(Rarity::Uncommon)
            .with_description("Curses the target for 4 rounds"),
        Item::new("Paralysis Powder", ItemType::Debuff, ItemEffect::Paralyze, 2.0)
            .with_rarity(Rarity::Rare)
            .with_description("Paralyzes the target for 2 rounds"),
        Item::new("Weakening Draught", ItemType::Debuff, ItemEffect::Weaken, 8.0)
            .with_description("Permanently lowers attack by 8"),
        // Special
        Item::new("Purification", ItemType::Special, ItemEffect::Cleanse, 1.0)
            .with_rarity(Rarity::Uncommon)
            .with_description("Removes all negative status effects"),
        Item::new("Mystic Crystal", ItemType::Special, ItemEffect::MysticCrystal, 1.0)
            .with_rarity(Rarity::Epic)
            .with_description("Restores health and mana"),
        Item::new("Protective Amulet", ItemType::Special, ItemEffect::Ward, 10.0)
            .with_rarity(Rarity::Rare)
            .with_description("Raises defense by 10 and shields for 5 rounds"),
        Item::new("Invisibility Potion", ItemType::Special, ItemEffect::Invisibility, 3.0)
            .with_rarity(Rarity::Legendary)
            .with_description("Invisible for 3 rounds"),
    ];
}

/// Look up a catalog item by name, case-insensitively.
pub fn find_item(name: &str) -> Option<Item> {
    let name_lower = name.to_lowercase();
    CATALOG
        .iter()
        .find(|i| i.name.to_lowercase() == name_lower)
        .cloned()
}

pub fn items_of_type(item_type: ItemType) -> Vec<Item> {
    CATALOG
        .iter()
        .filter(|i| i.item_type == item_type)
        .cloned()
        .collect()
}

/// Uniformly random catalog item.
pub fn random_item(dice: &mut dyn Dice) -> Item {
    let index = dice.below(CATALOG.len());
    CATALOG[index].clone()
}

/// Random item of the given rarity, or any item if none exists.
pub fn random_item_of_rarity(rarity: Rarity, dice: &mut dyn Dice) -> Item {
    let matching: Vec<&Item> = CATALOG.iter().filter(|i| i.rarity == rarity).collect();
    match dice.pick_index(matching.len()) {
        Some(i) => matching[i].clone(),
        None => random_item(dice),
    }
}

/// Walk the rarity table rarest-first with a cumulative roll.
pub fn random_item_by_rarity(dice: &mut dyn Dice) -> Item {
    let roll = dice.unit();
    let mut cumulative = 0.0;
    for rarity in Rarity::RAREST_FIRST {
        cumulative += rarity.drop_chance();
        if roll <= cumulative {
            return random_item_of_rarity(rarity, dice);
        }
    }
    random_item_of_rarity(Rarity::Common, dice)
}

/// Items dropped by a defeated enemy worth `point_value`.
pub fn loot_for(point_value: u32, dice: &mut dyn Dice) -> Vec<Item> {
    let rolls = if point_value > MULTI_DROP_THRESHOLD {
        dice.range_inclusive(1, 3)
    } else {
        1
    };
    let rarity_bonus = point_value as f64 / 1000.0;

    let mut loot = Vec::new();
    for _ in 0..rolls {
        if !dice.chance(BASE_DROP_CHANCE) {
            continue;
        }
        if dice.chance(rarity_bonus) {
            loot.push(random_item_by_rarity(dice));
        } else {
            loot.push(random_item(dice));
        }
    }
    loot
}
