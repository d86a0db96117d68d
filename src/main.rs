use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use invsim::cli::simulate::SimulateOptions;
use invsim::cli::strategies::DEFAULT_AMOUNT;
use invsim::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional scenario file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default scenario configuration
    Setup,
    /// Replay the scenario against the bank
    Simulate {
        /// Also write a plain-text transcript to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare configured strategies for one principal
    Strategies {
        /// Principal to quote every strategy with
        #[arg(short, long, default_value_t = DEFAULT_AMOUNT)]
        amount: f64,
    },
}

impl From<Commands> for invsim::AppCommand {
    fn from(cmd: Commands) -> invsim::AppCommand {
        match cmd {
            Commands::Simulate { output, json } => {
                invsim::AppCommand::Simulate(SimulateOptions { output, json })
            }
            Commands::Strategies { amount } => invsim::AppCommand::Strategies { amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => invsim::cli::setup::setup(),
        Some(cmd) => invsim::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
