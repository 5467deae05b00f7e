//! Reborn battle runner.
//!
//! Stages one of the built-in encounters and either runs it to completion
//! or hands each hero turn to stdin.
//!
//! ```bash
//! cargo run -p reborn -- --scenario boss --seed 42
//! cargo run -p reborn -- --interactive --load party.json
//! ```

mod headless;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = headless::parse_options(&args)?;
    if options.interactive {
        headless::run_interactive(options)
    } else {
        headless::run_batch(options)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Reborn - turn-based battle runner");
    println!();
    println!("USAGE:");
    println!("    reborn [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print help information");
    println!("    --scenario <NAME>       Encounter: skirmish, boss or duel (default: skirmish)");
    println!("    --seed <N>              Seed the dice for a reproducible battle");
    println!("    --load <PATH>           Fight with a party saved by --save or 'save'");
    println!("    --save <PATH>           Save the party after a non-interactive run");
    println!("    --interactive           Choose each hero action on stdin");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG                Diagnostic log filter (default: warn)");
    println!();
    println!("INTERACTIVE COMMANDS:");
    headless::print_commands();
}
