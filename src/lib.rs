pub mod cli;
pub mod core;

use crate::cli::simulate::SimulateOptions;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Simulate(SimulateOptions),
    Strategies { amount: f64 },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Investment simulator starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Simulate(options) => cli::simulate::run(&config, &options),
        AppCommand::Strategies { amount } => cli::strategies::run(&config, amount),
    }
}
