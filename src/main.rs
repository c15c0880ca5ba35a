//! ThinkTank - terminal client for the ThinkTank AI Assistant
//!
#![doc = "ThinkTank - terminal client for the ThinkTank AI Assistant"]
#![doc = "Main entry point for the thinktank application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use thinktank::cli::{Cli, Commands};
use thinktank::commands;
use thinktank::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { new } => {
            tracing::info!("Starting interactive chat");
            commands::chat::run_chat(config, new).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::debug!("Running sessions command: {:?}", command);
            commands::sessions::handle_sessions(&config, command)?;
            Ok(())
        }
        Commands::Health => {
            commands::account::handle_health(&config).await?;
            Ok(())
        }
        Commands::Theme { value } => {
            commands::account::handle_theme(&config, value)?;
            Ok(())
        }
        Commands::Whoami { name, email, role } => {
            commands::account::handle_whoami(&config, name, email, role)?;
            Ok(())
        }
        Commands::SignOut => {
            tracing::info!("Signing out");
            commands::account::handle_sign_out(&config)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with chat output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "thinktank=debug"
    } else {
        "thinktank=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
