use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use tastematch::catalog::fixture::FixtureCatalog;
use tastematch::catalog::spotify::SpotifyCatalog;
use tastematch::catalog::tokens::StaticTokenSource;
use tastematch::catalog::traits::CatalogProvider;
use tastematch::config::Config;
use tastematch::output::terminal;
use tastematch::pipeline::compare::Comparator;

/// Tastematch: compare the music tastes of two streaming accounts.
///
/// Pulls each user's top artists and tracks, scores how much they overlap,
/// and explains the result in a few sentences.
#[derive(Parser)]
#[command(name = "tastematch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two users' tastes
    Compare {
        /// First user id
        user1: String,

        /// Second user id
        user2: String,

        /// Print the raw comparison JSON instead of the colored report
        #[arg(long)]
        json: bool,

        /// Override the comparison deadline (seconds)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Show one user's taste profile
    Profile {
        /// The user id to profile
        user: String,

        /// Print the raw profile JSON instead of the colored report
        #[arg(long)]
        json: bool,
    },

    /// Start the JSON API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8080)
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tastematch=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            user1,
            user2,
            json,
            timeout_secs,
        } => {
            let config = Config::load()?;
            let comparator = build_comparator(&config)?;

            let timeout = timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(config.timeout);
            let deadline = tokio::time::Instant::now() + timeout;

            info!(user1 = %user1, user2 = %user2, "Comparing users");
            let result = comparator.compare(&user1, &user2, deadline).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_comparison(&result);
            }
        }

        Commands::Profile { user, json } => {
            let config = Config::load()?;
            let comparator = build_comparator(&config)?;
            let deadline = tokio::time::Instant::now() + config.timeout;

            let profile = comparator.profile(&user, deadline).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                terminal::display_profile(&profile);
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let comparator = build_comparator(&config)?;
            println!(
                "{}",
                format!("Starting tastematch API on http://{bind}:{port}").bold()
            );
            tastematch::web::run_server(config, comparator, port, &bind).await?;
        }
    }

    Ok(())
}

/// Pick the catalog backend from config and wrap it in a comparator.
///
/// A fixture file takes precedence; otherwise the Spotify Web API is used
/// with tokens read from the token file.
fn build_comparator(config: &Config) -> Result<Comparator> {
    config.require_catalog()?;

    let provider: Arc<dyn CatalogProvider> = match &config.fixtures_path {
        Some(path) => {
            let catalog = FixtureCatalog::from_file(path)?;
            info!(
                path = %path.display(),
                users = catalog.user_ids().count(),
                "Using fixture catalog"
            );
            Arc::new(catalog)
        }
        None => {
            let tokens = StaticTokenSource::from_file(&config.tokens_path)?;
            if tokens.is_empty() {
                println!(
                    "{}",
                    format!(
                        "Warning: no access tokens in {}; every lookup will report user not found",
                        config.tokens_path.display()
                    )
                    .yellow()
                );
            }
            Arc::new(SpotifyCatalog::new(
                &config.spotify_api_url,
                Arc::new(tokens),
                config.time_range,
            )?)
        }
    };

    Ok(Comparator::new(provider)
        .with_weights(config.weights)
        .with_top_limit(config.top_limit))
}
