//! Main application entry point and high-level flow coordination.
//!
//! The flow after argument parsing:
//!
//! 1. Terminal setup for the long-running log block
//! 2. Signal handler registration
//! 3. Configuration loading
//! 4. Device discovery and group assembly
//! 5. The scheduling loop, which runs until a shutdown signal
//! 6. State restore and graceful cleanup

use anyhow::{Context, Result};

use duskr::args::{CliAction, ParsedArgs, display_help, display_version_info};
use duskr::config::Config;
use duskr::constants::EXIT_FAILURE;
use duskr::device::assemble_group;
use duskr::scheduler::Scheduler;
use duskr::signals::setup_signal_handler;
use duskr::sim::SimulatedAdapter;
use duskr::sunset::{SunriseSunsetApi, SunsetOracle};
use duskr::utils::TerminalGuard;
use duskr::{log_block_start, log_end, log_error_exit, log_version};

fn main() {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowHelp => display_help(),
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            labels,
        } => {
            if let Err(err) = run(debug_enabled, &labels) {
                log_error_exit!("{err:#}");
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
}

fn run(debug_enabled: bool, labels: &[String]) -> Result<()> {
    let _term = TerminalGuard::new().context("failed to initialize terminal features")?;

    log_version!();

    let signals = setup_signal_handler(debug_enabled)?;

    let config = Config::load()?;
    config.log_config();

    let mut adapter = SimulatedAdapter::household();
    log_block_start!("Discovering devices");
    let group = assemble_group(&mut adapter, labels)?;

    let oracle = SunsetOracle::new(Box::new(SunriseSunsetApi::new()?));

    let result = Scheduler::new(oracle, config, &signals).run(&mut adapter, &group);

    log_end!();
    result
}
