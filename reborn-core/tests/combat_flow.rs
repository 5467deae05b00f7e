//! End-to-end encounter tests through the public API.
//!
//! Scripted dice keep these deterministic: with `ScriptedDice::never()` every
//! initiative roll ties, so heroes act before enemies in roster order.

use reborn_core::combat::{CombatPhase, HeroCommand, ItemTarget};
use reborn_core::events::CombatEvent;
use reborn_core::items::find_item;
use reborn_core::testing::{assert_health, assert_logged, assert_result, CombatHarness};
use reborn_core::{CombatManager, CombatResult, Combatant, ScriptedDice, SeededDice, StatusKind};

fn skirmish() -> (Vec<Combatant>, Vec<Combatant>) {
    (
        vec![
            Combatant::mage("Aria"),
            Combatant::warrior("Brom"),
            Combatant::rogue("Vex"),
        ],
        vec![Combatant::skeleton(), Combatant::orc()],
    )
}

// =============================================================================
// Full encounters
// =============================================================================

#[test]
fn test_seeded_encounters_replay_identically() {
    let transcript = |seed: u64| {
        let mut manager = CombatManager::with_seed(seed);
        let (heroes, enemies) = skirmish();
        assert!(manager.start_combat(heroes, enemies));
        let result = manager.run_to_completion();
        let lines: Vec<String> = manager.log().lines().map(str::to_string).collect();
        (result, lines)
    };

    let (first_result, first) = transcript(2024);
    let (second_result, second) = transcript(2024);
    assert!(first_result.is_some(), "skirmish should finish");
    assert_eq!(first_result, second_result);
    assert_eq!(first, second);
}

#[test]
fn test_encounter_log_is_bracketed() {
    let mut manager = CombatManager::new(Default::default(), Box::new(SeededDice::new(11)));
    let (heroes, enemies) = skirmish();
    manager.start_combat(heroes, enemies);
    let result = manager.run_to_completion().expect("skirmish should finish");

    let entries = manager.log().entries();
    assert!(matches!(
        entries.first().map(|e| &e.event),
        Some(CombatEvent::CombatStarted {
            heroes: 3,
            enemies: 2
        })
    ));
    match entries.last().map(|e| &e.event) {
        Some(CombatEvent::CombatEnded { result: logged, rounds }) => {
            assert_eq!(*logged, result);
            assert_eq!(*rounds, manager.round());
        }
        other => panic!("log should end with CombatEnded, got {other:?}"),
    }
    assert_eq!(manager.phase(), CombatPhase::Finished(result));

    // Every character is handed back, winners and losers alike.
    assert_eq!(manager.take_party().len(), 3);
    assert!(manager.take_enemies().len() >= 2);
}

#[test]
fn test_overmatched_hero_is_defeated() {
    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(
        vec![Combatant::mage("Aria").with_stats(1.0, 1.0, 0.0)],
        vec![Combatant::orc()],
    );
    harness.manager.run_to_completion();

    assert_result(&harness, CombatResult::Defeat);
    assert_logged(&harness, "Aria has been defeated");
    assert!(harness.manager.heroes().is_empty());
}

#[test]
fn test_victory_awards_experience() {
    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(
        vec![Combatant::warrior("Brom").with_stats(100.0, 20.0, 0.0)],
        vec![Combatant::skeleton().with_stats(10.0, 8.0, 0.0)],
    );
    harness.manager.run_to_completion();

    assert_result(&harness, CombatResult::Victory);
    assert_logged(&harness, "Brom gains 5 experience");
    assert_eq!(
        harness.count_events(|e| matches!(e, CombatEvent::ExperienceGained { .. })),
        1
    );
}

#[test]
fn test_second_encounter_keeps_earlier_survivors() {
    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(
        vec![Combatant::warrior("Brom").with_stats(100.0, 20.0, 0.0)],
        vec![Combatant::skeleton().with_stats(10.0, 8.0, 0.0)],
    );
    harness.manager.run_to_completion();
    assert_result(&harness, CombatResult::Victory);
    harness.manager.reset();

    harness.start(
        vec![Combatant::mage("Aria")],
        vec![Combatant::skeleton().with_stats(10.0, 8.0, 0.0)],
    );
    assert_eq!(harness.manager.heroes().len(), 1);
    harness.manager.run_to_completion();
    harness.manager.reset();

    let party: Vec<String> = harness
        .manager
        .take_party()
        .iter()
        .map(|hero| hero.name().to_string())
        .collect();
    assert_eq!(party, vec!["Brom".to_string(), "Aria".to_string()]);
    assert_eq!(harness.manager.take_enemies().len(), 2);
}

// =============================================================================
// Hero commands
// =============================================================================

#[test]
fn test_healing_potion_on_self() {
    let mut aria = Combatant::mage("Aria");
    aria.character.lose_health(40.0);
    aria.inventory_mut()
        .unwrap()
        .add_item(find_item("Small Healing Potion").unwrap());

    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(vec![aria], vec![Combatant::skeleton()]);

    assert!(harness.manager.act(HeroCommand::UseItem {
        slot: 0,
        target: ItemTarget::Myself
    }));
    assert_health(&harness, "Aria", 65.0);
    assert_logged(&harness, "Aria uses Small Healing Potion on Aria");
    assert_logged(&harness, "Aria recovers 25 health");
    assert!(harness.find("Aria").unwrap().inventory().unwrap().is_empty());
}

#[test]
fn test_poison_flask_on_foe() {
    let mut vex = Combatant::rogue("Vex");
    vex.inventory_mut()
        .unwrap()
        .add_item(find_item("Poison Flask").unwrap());

    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(vec![vex], vec![Combatant::orc()]);

    assert!(harness.manager.act(HeroCommand::UseItem {
        slot: 0,
        target: ItemTarget::Foe(0)
    }));
    assert!(harness
        .find("Orc")
        .unwrap()
        .character
        .has_status(StatusKind::Poisoned));
    assert_logged(&harness, "Orc is now Poisoned");
}

#[test]
fn test_defend_is_logged() {
    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(vec![Combatant::warrior("Brom")], vec![Combatant::skeleton()]);

    assert!(harness.manager.act(HeroCommand::Defend));
    assert_logged(&harness, "Brom takes a defensive stance");
}

#[test]
fn test_enemy_turn_rejects_hero_command() {
    let mut harness = CombatHarness::new(ScriptedDice::never());
    harness.start(vec![Combatant::warrior("Brom")], vec![Combatant::dragon()]);

    assert!(harness.manager.act(HeroCommand::Wait));
    // The dragon is up next.
    assert!(!harness.manager.act(HeroCommand::Defend));
    assert_eq!(
        harness.manager.current_actor().map(|c| c.name().to_string()),
        Some("Dragon".to_string())
    );
    assert_logged(&harness, "Brom waits");
}

#[test]
fn test_failed_flee_spends_turn() {
    let config = reborn_core::CombatConfig::default().with_flee_chance(0.0);
    let mut harness = CombatHarness::with_config(config, ScriptedDice::always());
    harness.start(vec![Combatant::rogue("Vex")], vec![Combatant::orc()]);

    assert!(harness.manager.flee());
    assert!(harness.manager.is_active());
    assert_logged(&harness, "Vex failed to flee");
}
