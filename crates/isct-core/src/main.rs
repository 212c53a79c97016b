//! ISCT Negotiation Simulator
//!
//! Runs a seeded population of agents through rounds of ethical negotiation
//! and writes the run report and decision ledger.
//!
//! Examples:
//!   cargo run -p isct-core -- --strategy strict_threshold --scenario cultural_divide
//!   cargo run -p isct-core -- --config isct.toml --rounds 50

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use isct_core::config::{default_config_toml, Config, ConfigError, StrategyKind};
use isct_core::events::DecisionLedger;
use isct_core::output::{write_report, ReportError, LEDGER_FILE};
use isct_core::setup::SCENARIOS;
use isct_core::{Personality, RoundSummary, Simulation, SimulationError};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "isct_sim")]
#[command(about = "Simulate AI agents negotiating ethical compromises")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to simulate
    #[arg(long)]
    rounds: Option<u32>,

    /// Number of agents to spawn
    #[arg(long)]
    agents: Option<usize>,

    /// Negotiation strategy
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Personality tag for the personality strategy
    #[arg(long)]
    personality: Option<Personality>,

    /// Scenario preset
    #[arg(long)]
    scenario: Option<String>,

    /// Directory for the report and ledger
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,

    /// List scenario presets and exit
    #[arg(long)]
    list_scenarios: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("could not open ledger: {0}")]
    Ledger(std::io::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    if Registry::default().with(filter).with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialised");
    }
}

fn load_config(args: &Args) -> Result<Config, CliError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(agents) = args.agents {
        config.simulation.agent_count = agents;
    }
    if let Some(strategy) = args.strategy {
        config.negotiation.strategy = strategy;
    }
    if let Some(personality) = args.personality {
        config.negotiation.personality = personality;
    }
    if let Some(scenario) = &args.scenario {
        config.simulation.scenario = scenario.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }

    config.validate().map_err(ConfigError::from)?;
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;

    println!("ISCT Negotiation Simulator");
    println!("==========================");
    println!("Seed: {}", config.simulation.seed);
    println!("Rounds: {}", config.simulation.rounds);
    println!("Scenario: {}", config.simulation.scenario);
    println!("Strategy: {}", config.negotiation.strategy());
    println!();

    let mut simulation = Simulation::from_config(&config)?;
    if config.output.write_ledger {
        std::fs::create_dir_all(&config.output.directory).map_err(CliError::Ledger)?;
        let ledger = DecisionLedger::new(config.output.directory.join(LEDGER_FILE))
            .map_err(CliError::Ledger)?;
        simulation = simulation.with_ledger(ledger);
    }

    let pacing = Duration::from_millis(config.simulation.pacing_ms);
    let mut observer = |summary: &RoundSummary| {
        for line in &summary.explanations {
            println!("[Round {:>3}] {}", summary.round, line);
        }
        if let Some(score) = summary.score {
            tracing::info!(round = summary.round, score, "round complete");
        }
        if !pacing.is_zero() {
            std::thread::sleep(pacing);
        }
    };
    let report = simulation.run_with_observer(&mut observer)?;

    println!();
    println!("Leaderboard:");
    for entry in &report.leaderboard {
        println!(
            "  {:>2}. {:<12} mean {:.3}  drift {:+.3}{}",
            entry.rank,
            entry.name,
            entry.mean_score,
            entry.drift,
            entry
                .acceptance_rate
                .map(|r| format!("  accepted {:.0}%", r * 100.0))
                .unwrap_or_default()
        );
    }

    if config.output.write_report {
        let path = write_report(&config.output.directory, &report)?;
        println!();
        println!("Wrote {}", path.display());
    }
    if let Some(mean) = report.mean_score() {
        println!("Mean agreement score: {:.3}", mean);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }
    if args.list_scenarios {
        for scenario in SCENARIOS {
            println!("{:<22} {}", scenario.name, scenario.description);
        }
        return ExitCode::SUCCESS;
    }

    init_tracing();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
