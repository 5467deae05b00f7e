//! Generate seeded battle transcripts for the README.
//!
//! Run with: `cargo run -p reborn-core --example generate_transcripts`

use reborn_core::headless::{HeadlessBattle, HeadlessConfig, Scenario};
use std::fs;
use std::path::Path;

/// Seed used for every recorded battle.
const SEED: u64 = 2024;

fn run_scenario(scenario: Scenario, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = HeadlessConfig::quick_start(scenario).with_seed(SEED);
    let mut battle = HeadlessBattle::new(config)?;

    let mut transcript = String::new();
    transcript.push_str(&format!("# Reborn: {scenario}\n\n"));
    transcript.push_str(&format!("*Seed {SEED}*\n\n"));
    transcript.push_str("## Combatants\n\n");
    for line in battle.status_lines() {
        transcript.push_str(&format!("- {line}\n"));
    }
    transcript.push_str("\n---\n\n");

    let result = battle.run();
    for entry in battle.manager().log().entries() {
        if entry.description.starts_with("---") {
            transcript.push_str(&format!("\n### Round {}\n\n", entry.round));
        } else {
            transcript.push_str(&format!("- {}\n", entry.description));
        }
    }

    transcript.push_str("\n---\n\n");
    match result {
        Some(result) => transcript.push_str(&format!("**Result:** {result}\n")),
        None => transcript.push_str("**Result:** no decision\n"),
    }

    let output_path = output_dir.join(format!("{scenario}.md"));
    fs::write(&output_path, transcript)?;
    println!("Wrote transcript to: {}", output_path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("docs/transcripts");
    fs::create_dir_all(output_dir)?;

    println!("Generating {} transcripts...\n", Scenario::ALL.len());

    for scenario in Scenario::ALL {
        if let Err(e) = run_scenario(scenario, output_dir) {
            eprintln!("Error running '{scenario}': {e}");
        }
    }

    println!("\nDone! Check docs/transcripts/ for the generated files.");
    Ok(())
}
