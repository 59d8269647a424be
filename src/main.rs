//! RackPlan - rack elevation planner
//!
//! Command-line front end for auditing rack layouts, listing free positions,
//! and placing devices with the same checks the editor applies.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rackplan::cli::{
    AddRackArgs, CliError, CliResult, ExitCode, PlaceArgs, PositionsArgs, ValidateArgs,
};
use rackplan::config::Config;
use rackplan::constants::{APP_BINARY_NAME, APP_NAME};

/// RackPlan - plan rack elevations from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Audit a layout file
    Validate(ValidateArgs),
    /// List valid drop positions for a device type
    Positions(PositionsArgs),
    /// Place a device and save the layout
    Place(PlaceArgs),
    /// Add an empty rack and save the layout
    AddRack(AddRackArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let result = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    result.map_err(|e| {
        CliError::io(format!(
            "Failed to load config: {e:#}\nFix or remove the file, or pass --config to {APP_BINARY_NAME}"
        ))
    })
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(app = APP_NAME, version = env!("CARGO_PKG_VERSION"), "starting");

    match &cli.command {
        Command::Validate(args) => {
            let mut args = args.clone();
            args.layout = config.resolve_layout_path(&args.layout);
            args.execute()
        }
        Command::Positions(args) => {
            let mut args = args.clone();
            args.layout = config.resolve_layout_path(&args.layout);
            args.execute(&config)
        }
        Command::Place(args) => {
            let mut args = args.clone();
            args.layout = config.resolve_layout_path(&args.layout);
            args.execute(&config)
        }
        Command::AddRack(args) => {
            let mut args = args.clone();
            args.layout = config.resolve_layout_path(&args.layout);
            args.execute(&config)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            e.code
        }
    };
    std::process::exit(code.code());
}
