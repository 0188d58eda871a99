use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use live_scribe::{
    create_router, AppState, Config, HttpBackend, SessionDefaults, SimulatedMicrophone,
    TextAnalyzer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "live-scribe", about = "Gapless chunked live transcription")]
struct Args {
    /// Config file (without extension), e.g. config/live-scribe
    #[arg(long, default_value = "config/live-scribe")]
    config: String,

    /// Override the transcription backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Override the chunk duration in milliseconds
    #[arg(long)]
    chunk_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut cfg = Config::load_or_default(&args.config);

    if let Some(url) = args.backend_url {
        cfg.backend.url = url;
    }
    if let Some(chunk_ms) = args.chunk_ms {
        cfg.session.chunk_duration_ms = chunk_ms;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Transcription backend: {}", cfg.backend.url);
    info!(
        "Chunks: {}ms at {}Hz/{}ch",
        cfg.session.chunk_duration_ms, cfg.audio.sample_rate, cfg.audio.channels
    );

    let device = Arc::new(SimulatedMicrophone::new());
    let backend = Arc::new(
        HttpBackend::new(
            &cfg.backend.url,
            Duration::from_secs(cfg.backend.timeout_secs),
        )
        .context("Failed to build transcription client")?,
    );

    let analyzer = match &cfg.analysis {
        Some(analysis) => Some(Arc::new(TextAnalyzer::new(
            &analysis.url,
            Duration::from_secs(cfg.backend.timeout_secs),
        )?)),
        None => None,
    };

    let state = AppState::new(
        device,
        backend,
        analyzer,
        SessionDefaults {
            chunk_duration: Duration::from_millis(cfg.session.chunk_duration_ms),
            format: cfg.audio_format(),
        },
    );

    let addr = format!("{}:{}", cfg.http.bind, cfg.http.port);
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
