//! playlist-converter - Convert JSPF playlists to XSPF

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_converter::config::Settings;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for converted output
    let filter = if cli.verbose {
        "playlist_converter=debug,tower_http=debug"
    } else {
        "playlist_converter=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut settings = Settings::load()?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            on_missing_location,
        } => {
            if let Some(policy) = on_missing_location {
                settings.missing_location = policy;
            }
            cli::commands::convert(input, output, &settings).await?;
        }
        Commands::Serve {
            bind,
            max_upload_mb,
            on_missing_location,
        } => {
            if let Some(bind) = bind {
                settings.bind_address = bind;
            }
            if let Some(max_upload_mb) = max_upload_mb {
                settings.max_upload_mb = max_upload_mb;
            }
            if let Some(policy) = on_missing_location {
                settings.missing_location = policy;
            }
            cli::commands::serve(&settings).await?;
        }
        Commands::Config { init } => {
            cli::commands::config(&settings, init)?;
        }
        Commands::Completion { shell } => {
            cli::commands::completion(shell);
        }
    }

    Ok(())
}
