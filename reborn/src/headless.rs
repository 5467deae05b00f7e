//! Text driver for headless battles.
//!
//! Batch mode runs the encounter with the built-in automation and prints
//! the combat log. Interactive mode uses a line-oriented protocol:
//! - Each line on stdin is one command (`attack 0 1`, `defend`, `run`, ...)
//! - Combat log lines are printed as they happen
//! - Driver output is prefixed with a tag such as `[STATUS]` or `[ERROR]`

use anyhow::{bail, Context, Result};
use reborn_core::combat::{HeroCommand, ItemTarget};
use reborn_core::headless::{HeadlessBattle, HeadlessConfig, Scenario};
use reborn_core::persist::PartySnapshot;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Options {
    pub scenario: Scenario,
    pub seed: Option<u64>,
    pub load: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub interactive: bool,
}

/// Parse options from command line arguments.
pub fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        scenario: Scenario::Skirmish,
        seed: None,
        load: None,
        save: None,
        interactive: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                let value = value_of(args, i)?;
                options.scenario = value.parse()?;
                i += 1;
            }
            "--seed" => {
                let value = value_of(args, i)?;
                let seed = value
                    .parse()
                    .with_context(|| format!("--seed expects a number, got '{value}'"))?;
                options.seed = Some(seed);
                i += 1;
            }
            "--load" => {
                options.load = Some(PathBuf::from(value_of(args, i)?));
                i += 1;
            }
            "--save" => {
                options.save = Some(PathBuf::from(value_of(args, i)?));
                i += 1;
            }
            "--interactive" => options.interactive = true,
            other => bail!("Unknown argument '{other}'. Try --help."),
        }
        i += 1;
    }

    Ok(options)
}

fn value_of(args: &[String], flag: usize) -> Result<&str> {
    match args.get(flag + 1) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} expects a value", args[flag]),
    }
}

fn build_battle(options: &Options) -> Result<HeadlessBattle> {
    let mut config = HeadlessConfig::quick_start(options.scenario);
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &options.load {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot = PartySnapshot::from_json(&json)?;
        info!(path = %path.display(), heroes = snapshot.heroes.len(), "party loaded");
        config = config.with_snapshot(&snapshot)?;
    }
    Ok(HeadlessBattle::new(config)?)
}

fn save_party(battle: &HeadlessBattle, path: &Path) -> Result<()> {
    let json = battle.snapshot().to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "party saved");
    Ok(())
}

fn print_new_lines(battle: &mut HeadlessBattle) {
    for line in battle.new_log_lines() {
        println!("{line}");
    }
}

fn print_status(battle: &HeadlessBattle) {
    println!("[STATUS] {} round {}", battle.scenario(), battle.round() + 1);
    for line in battle.status_lines() {
        println!("  {line}");
    }
}

/// Run the whole encounter with automated heroes.
pub fn run_batch(options: Options) -> Result<()> {
    let mut battle = build_battle(&options)?;
    let outcome = battle.run();
    print_new_lines(&mut battle);

    match outcome {
        Some(result) => println!("[RESULT] {result} after {} rounds", battle.round()),
        None => println!("[RESULT] No decision after {} rounds", battle.round()),
    }

    if let Some(path) = &options.save {
        save_party(&battle, path)?;
        println!("[SAVED] Party saved to {}", path.display());
    }
    Ok(())
}

/// Print the interactive command list.
pub fn print_commands() {
    println!("  attack <n> <target>  - Use attack <n> on enemy <target>");
    println!("  defend               - Take a defensive stance");
    println!("  item <slot> [self|ally <n>|foe <n>]");
    println!("                       - Use an inventory item (default: self)");
    println!("  flee                 - Try to escape");
    println!("  wait                 - Pass the turn");
    println!("  step                 - Let the automation take one turn");
    println!("  run                  - Let the automation finish the battle");
    println!("  status               - Show every combatant");
    println!("  log [n]              - Show the last n log lines (default: 10)");
    println!("  save <path>          - Save the party");
    println!("  quit                 - Exit");
}

/// Play the encounter from stdin.
pub fn run_interactive(options: Options) -> Result<()> {
    let mut battle = build_battle(&options)?;

    println!("=== Reborn: {} ===", battle.scenario());
    print_commands();
    println!();
    print_new_lines(&mut battle);
    report_turn(&mut battle);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };
        debug!(command, "input");

        match command {
            "quit" | "exit" => {
                println!("Goodbye!");
                break;
            }
            "help" => {
                println!("[HELP]");
                print_commands();
            }
            "status" => print_status(&battle),
            "log" => {
                let count = parts.get(1).and_then(|n| n.parse().ok()).unwrap_or(10);
                for line in battle.recent_log(count) {
                    println!("  {line}");
                }
            }
            "save" => match parts.get(1) {
                Some(path) => match save_party(&battle, Path::new(path)) {
                    Ok(()) => println!("[SAVED] Party saved to {path}"),
                    Err(e) => println!("[ERROR] Save failed: {e:#}"),
                },
                None => println!("[ERROR] Usage: save <path>"),
            },
            "step" => {
                if battle.step() {
                    report_turn(&mut battle);
                } else {
                    println!("[ERROR] The battle is over");
                }
            }
            "run" => {
                battle.run();
                report_turn(&mut battle);
            }
            _ => match parse_command(&parts) {
                Ok(hero_command) => {
                    if battle.act(hero_command) {
                        report_turn(&mut battle);
                    } else {
                        println!("[ERROR] That action is not possible now");
                    }
                }
                Err(message) => println!("[ERROR] {message}"),
            },
        }
        stdout.flush().ok();
    }

    Ok(())
}

/// Resolve enemy turns up to the next hero, printing what happened.
fn report_turn(battle: &mut HeadlessBattle) {
    let next = battle.advance_to_hero();
    print_new_lines(battle);
    match (next, battle.result()) {
        (Some(hero), _) => println!("[TURN] {hero}"),
        (None, Some(result)) => println!("[RESULT] {result} after {} rounds", battle.round()),
        (None, None) => println!("[RESULT] No decision after {} rounds", battle.round()),
    }
}

/// Parse a hero action such as `attack 0 1` or `item 2 foe 0`.
fn parse_command(parts: &[&str]) -> Result<HeroCommand, String> {
    let number = |i: usize, what: &str| -> Result<usize, String> {
        parts
            .get(i)
            .ok_or_else(|| format!("Missing {what}"))?
            .parse()
            .map_err(|_| format!("{what} must be a number"))
    };

    match parts.first().copied() {
        Some("attack") => Ok(HeroCommand::Attack {
            index: number(1, "attack number")?,
            target: number(2, "target")?,
        }),
        Some("defend") => Ok(HeroCommand::Defend),
        Some("flee") => Ok(HeroCommand::Flee),
        Some("wait") => Ok(HeroCommand::Wait),
        Some("item") => {
            let slot = number(1, "slot")?;
            let target = match parts.get(2).copied() {
                None | Some("self") => ItemTarget::Myself,
                Some("ally") => ItemTarget::Ally(number(3, "ally")?),
                Some("foe") => ItemTarget::Foe(number(3, "foe")?),
                Some(other) => return Err(format!("Unknown item target '{other}'")),
            };
            Ok(HeroCommand::UseItem { slot, target })
        }
        _ => Err("Unknown command. Type help for help.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("reborn")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_options() {
        let options =
            parse_options(&args(&["--scenario", "boss", "--seed", "7", "--interactive"])).unwrap();
        assert_eq!(options.scenario, Scenario::Boss);
        assert_eq!(options.seed, Some(7));
        assert!(options.interactive);
        assert!(options.save.is_none());
    }

    #[test]
    fn test_parse_options_rejects_bad_input() {
        assert!(parse_options(&args(&["--seed", "many"])).is_err());
        assert!(parse_options(&args(&["--scenario", "raid"])).is_err());
        assert!(parse_options(&args(&["--save"])).is_err());
        assert!(parse_options(&args(&["--fast"])).is_err());
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command(&["attack", "1", "0"]),
            Ok(HeroCommand::Attack {
                index: 1,
                target: 0
            })
        );
        assert_eq!(
            parse_command(&["item", "0"]),
            Ok(HeroCommand::UseItem {
                slot: 0,
                target: ItemTarget::Myself
            })
        );
        assert_eq!(
            parse_command(&["item", "2", "foe", "1"]),
            Ok(HeroCommand::UseItem {
                slot: 2,
                target: ItemTarget::Foe(1)
            })
        );
        assert!(parse_command(&["attack", "x", "0"]).is_err());
        assert!(parse_command(&["item", "0", "ally"]).is_err());
        assert!(parse_command(&["dance"]).is_err());
    }
}
