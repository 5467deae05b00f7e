//! Bounded, stacking inventory carried by heroes.

use crate::combatant::{ActionContext, Combatant};
use crate::items::{Item, ItemType, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::mem;

pub const DEFAULT_CAPACITY: usize = 10;

/// One slot: an item and how many identical copies are stacked on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item: Item,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStatistics {
    pub total_items: u32,
    pub used_slots: usize,
    pub available_slots: usize,
    pub by_type: HashMap<ItemType, u32>,
    pub by_rarity: HashMap<Rarity, u32>,
    pub estimated_value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).map(|slot| &slot.item)
    }

    pub fn quantity(&self, index: usize) -> u32 {
        self.slots.get(index).map(|slot| slot.quantity).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Stack onto an equal item, or take a free slot. Returns false when
    /// the inventory is full.
    pub fn add_item(&mut self, item: Item) -> bool {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.item == item) {
            slot.quantity += 1;
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.slots.push(InventorySlot { item, quantity: 1 });
        true
    }

    /// Add several items. Returns the ones that did not fit.
    pub fn add_items(&mut self, items: Vec<Item>) -> Vec<Item> {
        items
            .into_iter()
            .filter_map(|item| {
                if self.add_item(item.clone()) {
                    None
                } else {
                    Some(item)
                }
            })
            .collect()
    }

    /// Take one copy out of a slot.
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        let slot = self.slots.get_mut(index)?;
        if slot.quantity > 1 {
            slot.quantity -= 1;
            return Some(slot.item.fresh());
        }
        Some(self.slots.remove(index).item)
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<Item> {
        let index = self.position(name)?;
        self.remove_item(index)
    }

    /// Use the item in `index` on `target`. A spent copy leaves its slot;
    /// the next copy in the stack starts fresh.
    pub fn use_item(
        &mut self,
        index: usize,
        target: &mut Combatant,
        ctx: &mut ActionContext<'_>,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.item.can_be_used() {
            return false;
        }
        if !slot.item.use_on(target, ctx) {
            return false;
        }
        if !slot.item.can_be_used() {
            if slot.quantity > 1 {
                slot.quantity -= 1;
                slot.item.uses = 0;
            } else {
                self.slots.remove(index);
            }
        }
        true
    }

    pub fn use_by_name(
        &mut self,
        name: &str,
        target: &mut Combatant,
        ctx: &mut ActionContext<'_>,
    ) -> bool {
        match self.position(name) {
            Some(index) => self.use_item(index, target, ctx),
            None => false,
        }
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name_lower = name.to_lowercase();
        self.slots
            .iter()
            .position(|slot| slot.item.name.to_lowercase() == name_lower)
    }

    pub fn items_of_type(&self, item_type: ItemType) -> Vec<&Item> {
        self.find_items(|item| item.item_type == item_type)
    }

    pub fn items_of_rarity(&self, rarity: Rarity) -> Vec<&Item> {
        self.find_items(|item| item.rarity == rarity)
    }

    pub fn find_items(&self, predicate: impl Fn(&Item) -> bool) -> Vec<&Item> {
        self.slots
            .iter()
            .map(|slot| &slot.item)
            .filter(|item| predicate(item))
            .collect()
    }

    /// First slot holding a usable item that restores health.
    pub fn first_healing_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.item.restores_health() && slot.item.can_be_used())
    }

    pub fn sort_by_type(&mut self) {
        self.slots.sort_by(|a, b| {
            a.item
                .item_type
                .sort_order()
                .cmp(&b.item.item_type.sort_order())
                .then_with(|| a.item.name.cmp(&b.item.name))
        });
    }

    /// Rarest first, then by name.
    pub fn sort_by_rarity(&mut self) {
        self.slots.sort_by(|a, b| {
            b.item
                .rarity
                .cmp(&a.item.rarity)
                .then_with(|| a.item.name.cmp(&b.item.name))
        });
    }

    pub fn sort_by_name(&mut self) {
        self.slots.sort_by(|a, b| a.item.name.cmp(&b.item.name));
    }

    pub fn statistics(&self) -> InventoryStatistics {
        let mut stats = InventoryStatistics {
            used_slots: self.slots.len(),
            available_slots: self.capacity.saturating_sub(self.slots.len()),
            ..InventoryStatistics::default()
        };
        for slot in &self.slots {
            stats.total_items += slot.quantity;
            *stats.by_type.entry(slot.item.item_type).or_default() += slot.quantity;
            *stats.by_rarity.entry(slot.item.rarity).or_default() += slot.quantity;
            stats.estimated_value += slot.item.rarity.value() * slot.quantity;
        }
        stats
    }
}

impl Combatant {
    /// Use an item from this hero's own inventory on themselves.
    pub fn use_own_item(&mut self, index: usize, ctx: &mut ActionContext<'_>) -> bool {
        let Some(inventory) = self.inventory_mut() else {
            return false;
        };
        let mut inventory = mem::take(inventory);
        let used = inventory.use_item(index, self, ctx);
        if let Some(slot) = self.inventory_mut() {
            *slot = inventory;
        }
        used
    }
}
