//! Castle build-order planner.
//!
//! Loads the game catalog from a data directory, solves for the configured
//! targets and prints the plan.
//!
//! # Usage
//!
//! ```bash
//! # Search every resource strategy and print the best plan
//! castle --data data --config castle.json
//!
//! # Skip the search and use one strategy
//! castle --strategy W+2/Q+1
//!
//! # Print only the next action token (e.g. `building:lumberjack:2`)
//! castle --next
//!
//! # Check the catalog for inconsistencies
//! castle validate
//!
//! # Re-solve several times and compare fingerprints
//! castle verify --runs 10
//! ```
//!
//! Reports go to stdout, logs to stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use castle_core::prelude::*;
use castle_headless::{
    action_table, load_catalog, load_config, mission_table, problem_from_config,
    resolve_data_dir, save_schedule, strategy_table, summary, CatalogLoadError,
};

#[derive(Parser)]
#[command(name = "castle")]
#[command(about = "Build-order planner for a castle base-building game")]
#[command(version)]
struct Cli {
    /// Game data directory (defaults to $CASTLE_DATA_DIR, then `data`)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Castle configuration file (.json or .ron)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Only print the summary; log warnings and errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print only the next action to start
    #[arg(short, long)]
    next: bool,

    /// Use one strategy instead of searching (`RoundRobin` or `W+x/Q+y`)
    #[arg(long)]
    strategy: Option<ResourceStrategy>,

    /// Largest wood lead tried by the strategy search
    #[arg(long, default_value = "10")]
    max_lead: u32,

    /// Save the schedule as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Train units while building targets are still open
    #[arg(long)]
    train_during_build: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify determinism by solving the same problem several times
    Verify {
        /// Number of solves to compare
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Load the catalog (and configuration, if given) and report problems
    Validate,
}

/// Everything a solve needs.
struct Problem {
    catalog: Catalog,
    initial: InitialState,
    targets: Targets,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report or the next-action token.
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet || cli.next {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let data_dir = resolve_data_dir(cli.data.as_deref());

    match cli.command {
        Some(Commands::Verify { runs }) => {
            let problem = load_problem(&data_dir, cli.config.as_deref());
            cmd_verify(&problem, &options_for(&cli), runs);
        }
        Some(Commands::Validate) => {
            cmd_validate(&data_dir, cli.config.as_deref());
        }
        None => {
            let problem = load_problem(&data_dir, cli.config.as_deref());
            cmd_plan(&cli, &problem);
        }
    }
}

fn fail(context: &str, error: &dyn std::fmt::Display) -> ! {
    tracing::error!("{}: {}", context, error);
    eprintln!("Error: {context}: {error}");
    process::exit(1);
}

fn load_problem(data_dir: &Path, config: Option<&Path>) -> Problem {
    let catalog = match load_catalog(data_dir) {
        Ok(catalog) => catalog,
        Err(e) => fail("Failed to load game data", &e),
    };
    let config = match config.map(load_config).transpose() {
        Ok(config) => config,
        Err(e) => fail("Failed to load configuration", &e),
    };
    let (initial, targets) = match problem_from_config(config.as_ref(), &catalog) {
        Ok(problem) => problem,
        Err(e) => fail("Invalid configuration", &e),
    };
    Problem {
        catalog,
        initial,
        targets,
    }
}

fn options_for(cli: &Cli) -> SolverOptions {
    SolverOptions {
        train_during_build: cli.train_during_build,
        lead: cli.strategy,
        ..SolverOptions::default()
    }
}

/// Solve and print the plan
fn cmd_plan(cli: &Cli, problem: &Problem) {
    let options = options_for(cli);
    let solver = Solver::new(&problem.catalog, &problem.targets, &options);

    let (schedule, outcome) = if options.lead.is_some() {
        (solver.solve(&problem.initial), None)
    } else {
        let config = SearchConfig {
            max_wood_lead: cli.max_lead,
            ..SearchConfig::default()
        };
        let outcome = solver.search(&problem.initial, &config);
        (outcome.best.clone(), Some(outcome))
    };

    if let Some(path) = &cli.output {
        if let Err(e) = save_schedule(path, &schedule) {
            fail("Failed to save schedule", &e);
        }
        tracing::info!("Schedule saved to {}", path.display());
    }

    if cli.next {
        println!("{}", schedule.next_action());
        return;
    }

    if !cli.quiet {
        if let Some(outcome) = &outcome {
            println!("{}", strategy_table(outcome));
        }
        println!("{}", action_table(&schedule));
        let missions = mission_table(&schedule);
        if !missions.is_empty() {
            println!("{missions}");
        }
    }
    print!("{}", summary(&schedule, &problem.targets));
}

/// Re-solve in parallel and compare fingerprints
fn cmd_verify(problem: &Problem, options: &SolverOptions, runs: u32) {
    let options = SolverOptions {
        lead: Some(options.lead.unwrap_or(ResourceStrategy::ROUND_ROBIN)),
        ..options.clone()
    };
    tracing::info!(
        "Verifying determinism with {} ({} runs)",
        options.lead.unwrap_or_default(),
        runs
    );

    let solver = Solver::new(&problem.catalog, &problem.targets, &options);
    let fingerprints: Vec<u64> = match (0..runs)
        .into_par_iter()
        .map(|_| solver.solve(&problem.initial).fingerprint())
        .collect::<Result<_>>()
    {
        Ok(fingerprints) => fingerprints,
        Err(e) => fail("Failed to fingerprint schedule", &e),
    };

    let deterministic = fingerprints.windows(2).all(|w| w[0] == w[1]);
    if deterministic {
        eprintln!("PASS: All {runs} runs produced identical schedules");
        if let Some(first) = fingerprints.first() {
            eprintln!("  Fingerprint: {first:016x}");
        }
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        for (run, fingerprint) in fingerprints.iter().enumerate() {
            eprintln!("  Run {run}: {fingerprint:016x}");
        }
        process::exit(1);
    }
}

/// Check the catalog and configuration for problems
fn cmd_validate(data_dir: &Path, config: Option<&Path>) {
    let catalog = match load_catalog(data_dir) {
        Ok(catalog) => catalog,
        Err(e) => fail("Failed to load game data", &e),
    };

    let mut problems: Vec<String> = catalog.validate().iter().map(ToString::to_string).collect();

    if let Some(path) = config {
        let checked = load_config(path).and_then(|config| {
            config
                .validate(&catalog)
                .map_err(CatalogLoadError::from)
        });
        if let Err(e) = checked {
            problems.push(format!("{}: {e}", path.display()));
        }
    }

    if problems.is_empty() {
        eprintln!(
            "PASS: {} buildings, {} technologies, {} missions",
            catalog.building_count(),
            catalog.technology_count(),
            catalog.missions().len()
        );
    } else {
        eprintln!("FAIL: {} problem(s) found", problems.len());
        for problem in &problems {
            eprintln!("  - {problem}");
        }
        process::exit(1);
    }
}
