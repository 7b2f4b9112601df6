//! Hanyu Tutor - Chinese lessons in the terminal
//!
#![doc = "Hanyu Tutor - Chinese lessons in the terminal"]
#![doc = "Main entry point for the hanyu-tutor application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hanyu_tutor::cli::{Cli, Commands};
use hanyu_tutor::commands;
use hanyu_tutor::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse first so --verbose can raise the log level
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { name } => {
            if let Some(n) = &name {
                tracing::debug!("Using learner name from CLI: {}", n);
            }
            commands::chat::run_chat(config, name).await?;
            Ok(())
        }
        Commands::Ask { text } => {
            commands::ask::run_ask(config, text).await?;
            Ok(())
        }
        Commands::Speak { text } => {
            commands::speak::run_speak(config, text).await?;
            Ok(())
        }
        Commands::Extract { text } => {
            commands::extract::run_extract(&text)?;
            Ok(())
        }
        Commands::Voices => {
            commands::voices::run_voices(config).await?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "hanyu_tutor=debug"
    } else {
        "hanyu_tutor=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // stderr keeps log lines out of the chat transcript on stdout
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
