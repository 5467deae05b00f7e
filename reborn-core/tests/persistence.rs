//! Party save/restore tests.
//!
//! These verify that a roster survives a JSON round trip with its
//! progression, vitals and inventory intact.

use reborn_core::headless::{HeadlessBattle, HeadlessConfig, Scenario};
use reborn_core::items::find_item;
use reborn_core::persist::{PartySnapshot, SNAPSHOT_VERSION};
use reborn_core::{ClassKind, Combatant, StatusKind};

fn veteran_party() -> Vec<Combatant> {
    let mut events = Vec::new();

    let mut brom = Combatant::warrior("Brom");
    brom.gain_experience(150, &mut events);
    brom.character.lose_health(30.0);
    let inventory = brom.inventory_mut().unwrap();
    inventory.add_item(find_item("Healing Potion").unwrap());
    inventory.add_item(find_item("Healing Potion").unwrap());

    let mut vex = Combatant::rogue("Vex");
    let mut knife = find_item("Throwing Knife").unwrap();
    knife.uses = 1;
    vex.inventory_mut().unwrap().add_item(knife);

    vec![brom, Combatant::mage("Aria"), vex]
}

#[test]
fn test_json_round_trip_preserves_party() {
    let party = veteran_party();
    let json = PartySnapshot::capture(&party).to_json().unwrap();
    let restored = PartySnapshot::from_json(&json).unwrap().restore().unwrap();

    assert_eq!(restored.len(), 3);
    for (before, after) in party.iter().zip(&restored) {
        assert_eq!(before.id(), after.id());
        assert_eq!(before.name(), after.name());
        assert_eq!(before.kind(), after.kind());
        assert_eq!(before.level(), after.level());
        assert_eq!(before.character.health, after.character.health);
        assert_eq!(before.character.max_health, after.character.max_health);
        assert_eq!(before.character.attack_power, after.character.attack_power);
    }

    let brom = &restored[0];
    assert_eq!(brom.level(), 2);
    assert_eq!(brom.hero().unwrap().experience, 150);
    let inventory = brom.inventory().unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory.quantity(0), 2);

    let knife = restored[2].inventory().unwrap().get(0).unwrap();
    assert_eq!(knife.name, "Throwing Knife");
    assert_eq!(knife.uses, 1);
    assert_eq!(knife.remaining_uses(), Some(2));
}

#[test]
fn test_snapshot_json_shape() {
    let json = PartySnapshot::capture(&veteran_party()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["heroes"][0]["name"], "Brom");
    assert_eq!(value["heroes"][0]["class"], "Warrior");
    assert_eq!(value["heroes"][0]["inventory"][0]["name"], "Healing Potion");
    assert_eq!(value["heroes"][0]["inventory"][0]["quantity"], 2);
}

#[test]
fn test_defeated_hero_restores_defeated() {
    let mut party = veteran_party();
    party[1].character.lose_health(1000.0);

    let restored = PartySnapshot::capture(&party).restore().unwrap();
    assert!(restored[1].character.is_defeated());
    assert_eq!(restored[1].character.status, StatusKind::Defeated);
    assert_eq!(restored[1].kind(), ClassKind::Mage);
}

#[test]
fn test_restored_party_fights_again() {
    let first = HeadlessBattle::new(HeadlessConfig::quick_start(Scenario::Duel).with_seed(5))
        .unwrap();
    let snapshot = first.snapshot();
    assert_eq!(snapshot.heroes.len(), 1);

    let config = HeadlessConfig::quick_start(Scenario::Duel)
        .with_seed(6)
        .with_snapshot(&snapshot)
        .unwrap();
    let mut second = HeadlessBattle::new(config).unwrap();
    assert_eq!(second.manager().heroes()[0].name(), "Aria");
    assert!(second.run().is_some());

    let party = second.into_party();
    assert_eq!(party.len(), 1);
    assert_eq!(party[0].id(), snapshot.heroes[0].id);
}
