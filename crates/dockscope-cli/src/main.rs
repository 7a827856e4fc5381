mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialAnalysisConfig;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🔬 DockScope CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let partial_config = PartialAnalysisConfig::load(cli.config.as_deref())?;
    let set_values = cli.set_values.as_slice();

    let command_result = match cli.command {
        Commands::Summary(args) => {
            info!("Dispatching to 'summary' command.");
            commands::summary::run(args, partial_config, set_values).await
        }
        Commands::Extract(args) => {
            info!("Dispatching to 'extract' command.");
            commands::extract::run(args).await
        }
        Commands::Split(args) => {
            info!("Dispatching to 'split' command.");
            commands::split::run(args).await
        }
        Commands::Interactions(args) => {
            info!("Dispatching to 'interactions' command.");
            commands::interactions::run(args, partial_config, set_values).await
        }
        Commands::DockingBox(args) => {
            info!("Dispatching to 'box' command.");
            commands::docking_box::run(args, partial_config, set_values).await
        }
        Commands::Play(args) => {
            info!("Dispatching to 'play' command.");
            commands::play::run(args, partial_config, set_values).await
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
