//! Yummy - restaurant dashboard client
//!
#![doc = "Yummy - restaurant dashboard client"]
#![doc = "Main entry point for the Yummy command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yummy::cli::{Cli, Commands, ProfileCommand, SessionCommand};
use yummy::commands::{self, AppContext};
use yummy::config::Config;

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

    let ctx = AppContext::from_config(config)?;

    // Execute command
    match cli.command {
        Commands::Header { section } => {
            tracing::info!("Rendering header");
            commands::header::run_header(&ctx, section).await?;
            Ok(())
        }
        Commands::Dashboard { interactive } => {
            tracing::info!("Opening dashboard");
            commands::dashboard::run_dashboard(&ctx, interactive).await?;
            Ok(())
        }
        Commands::Profile { command } => match command {
            ProfileCommand::Update {
                first_name,
                last_name,
                phone,
                image,
                clear_image,
            } => {
                tracing::info!("Updating profile");
                let edits = commands::profile::ProfileEdits {
                    first_name,
                    last_name,
                    phone,
                    image,
                    clear_image,
                };
                commands::profile::update_profile(&ctx, edits).await?;
                Ok(())
            }
        },
        Commands::Session { command } => match command {
            SessionCommand::Import { access, refresh } => {
                commands::session::import(&ctx, access, refresh)?;
                Ok(())
            }
            SessionCommand::Status => {
                commands::session::status(&ctx)?;
                Ok(())
            }
        },
        Commands::Logout => {
            commands::logout::run_logout(&ctx)?;
            Ok(())
        }
        Commands::VerifyEmail {
            status,
            query,
            no_wait,
        } => {
            tracing::info!("Opening email verification page");
            commands::verify_email::run_verify_email(&ctx, status, query, no_wait).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so rendered views on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "yummy=debug" } else { "yummy=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
