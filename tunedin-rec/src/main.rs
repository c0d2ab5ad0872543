//! tunedin-rec - mood-matched track recommendation service
//!
//! Runs as an HTTP microservice (`serve`) or one-shot from the command line
//! (`recommend`, `analyze`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunedin_common::config::{load_config, TomlConfig};
use tunedin_rec::analysis::parse_analysis;
use tunedin_rec::{config, genres, AppState, RecommendError, Tempo};

/// Command-line arguments for tunedin-rec
#[derive(Parser, Debug)]
#[command(name = "tunedin-rec")]
#[command(about = "Mood-matched music track recommendation")]
#[command(version)]
struct Args {
    /// Config file (default: TUNEDIN_CONFIG, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides config and TUNEDIN_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Recommend one track and print it as JSON
    Recommend {
        /// Genre tag (repeatable)
        #[arg(short, long = "genre", required = true)]
        genres: Vec<String>,
        /// Target tempo in BPM
        #[arg(long, default_value_t = 100)]
        bpm: i64,
        /// Random seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Parse a mood analysis reply and print the result
    Analyze {
        /// Reply text
        #[arg(short, long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    // A bare level applies to our crates; anything else is a full directive
    let directive = if level.contains('=') || level.contains(',') {
        level
    } else {
        format!("tunedin_rec={0},tunedin_common={0},tower_http={0}", level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Command::Serve { bind } => serve(toml_config, bind).await,
        Command::Recommend { genres, bpm, seed } => {
            recommend(&toml_config, genres, bpm, seed).await
        }
        Command::Analyze { text } => analyze(&text),
    }
}

async fn serve(toml_config: TomlConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| toml_config.server.bind.clone());

    info!("Starting tunedin-rec (Recommendation) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {}", toml_config.catalog.api_base_url);

    let pipeline = config::build_pipeline(&toml_config).context("Failed to initialize pipeline")?;
    let state = AppState::new(
        Arc::new(pipeline),
        Duration::from_secs(toml_config.server.request_timeout_secs),
    );
    let app = tunedin_rec::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn recommend(
    toml_config: &TomlConfig,
    raw_genres: Vec<String>,
    bpm: i64,
    seed: Option<u64>,
) -> Result<()> {
    let pipeline = config::build_pipeline(toml_config).context("Failed to initialize pipeline")?;
    let tempo = Tempo::new(bpm);
    let timeout = Duration::from_secs(toml_config.server.request_timeout_secs);

    let run = async {
        match seed {
            Some(seed) => pipeline.recommend_seeded(&raw_genres, tempo, seed).await,
            None => pipeline.recommend(&raw_genres, tempo).await,
        }
    };
    let result = tokio::time::timeout(timeout, run)
        .await
        .unwrap_or(Err(RecommendError::Timeout(timeout.as_secs())))?;

    match result {
        Some(rec) => {
            println!("{}", serde_json::to_string_pretty(&rec)?);
            Ok(())
        }
        None => anyhow::bail!("No track matched the requested mood"),
    }
}

fn analyze(text: &str) -> Result<()> {
    let analysis = parse_analysis(text);
    let catalog_genres = genres::normalize(&analysis.genres);
    let output = serde_json::json!({
        "genres": analysis.genres,
        "bpm": analysis.tempo.bpm(),
        "catalog_genres": catalog_genres,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
