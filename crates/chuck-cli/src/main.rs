//! Chuck CLI entry point

use clap::Parser;
use tracing::{error, info};

use chuck_cli::{app::ChuckApp, cli::Cli, commands::CommandDispatcher, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_configuration(&cli)?;
    config.apply_overrides(cli.data_dir.as_deref(), cli.api_url.as_deref(), cli.verbose)?;
    config.fill_default_data_dir();

    // Initialize logging
    setup_logging(config.cli.verbose);

    // Create application
    let app = match ChuckApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    // Execute the command
    if let Err(e) = CommandDispatcher::execute(cli, app).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!("Chuck CLI exited successfully");
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(config_path) => Ok(AppConfig::load_from_file(config_path)?),
        None => Ok(AppConfig::default()),
    }
}
