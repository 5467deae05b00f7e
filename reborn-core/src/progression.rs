//! Hero experience and level-ups.

use crate::combatant::Combatant;
use crate::events::CombatEvent;

/// A hero levels up once total experience reaches `level * EXPERIENCE_PER_LEVEL`.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
pub const LEVEL_HEALTH_GROWTH: f64 = 0.1;
pub const LEVEL_ATTACK_GROWTH: f64 = 2.0;
pub const LEVEL_DEFENSE_GROWTH: f64 = 1.0;

/// Experience a defeated enemy is worth to each of `living_heroes`.
pub fn experience_share(point_value: u32, divisor: u32, living_heroes: usize) -> u32 {
    if living_heroes == 0 {
        return 0;
    }
    (point_value / divisor.max(1)) / living_heroes as u32
}

impl Combatant {
    /// Grant experience to a hero and apply any level-ups it buys.
    /// Returns the number of levels gained; enemies gain nothing.
    pub fn gain_experience(&mut self, amount: u32, events: &mut Vec<CombatEvent>) -> u32 {
        if amount == 0 || !self.is_hero() {
            return 0;
        }
        let who = self.who();
        let Some(profile) = self.hero_mut() else {
            return 0;
        };
        profile.experience += amount;
        events.push(CombatEvent::ExperienceGained {
            hero: who.clone(),
            amount,
        });

        let mut gained = 0;
        while let Some(profile) = self.hero_mut() {
            let needed = profile.level * EXPERIENCE_PER_LEVEL;
            if profile.experience < needed {
                break;
            }
            profile.level += 1;
            let level = profile.level;

            let bonus = self.character.max_health * LEVEL_HEALTH_GROWTH;
            self.character.max_health += bonus;
            if self.character.is_alive() {
                self.character.health += bonus;
            }
            self.character.attack_power += LEVEL_ATTACK_GROWTH;
            self.character.defense += LEVEL_DEFENSE_GROWTH;
            gained += 1;
            events.push(CombatEvent::LevelUp {
                hero: who.clone(),
                level,
            });
        }
        gained
    }

    pub fn level(&self) -> u32 {
        self.hero().map(|h| h.level).unwrap_or(1)
    }
}
