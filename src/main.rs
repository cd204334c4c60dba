//! Speech Timer - a speech/discussion session timer
//!
//! This is the main entry point for the speech-timer server.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use speech_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{phase_logger_task, session_ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("speech_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting speech-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, speech={}s, discussion={}s",
          config.host, config.port, config.speech, config.discussion);

    let settings = config.settings().context("invalid session durations")?;
    let state = Arc::new(AppState::new(config.port, config.host.clone(), settings)?);

    // Ticks for the running phase timer
    tokio::spawn(session_ticker_task(Arc::clone(&state)));
    // Console rendering of phase changes
    tokio::spawn(phase_logger_task(Arc::clone(&state)));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle              - Start the speech phase, or stop and re-arm");
    info!("  POST /reset               - Re-arm with the current settings");
    info!("  PUT  /settings            - Change speech and/or discussion durations");
    info!("  PUT  /settings/speech     - Change the speech duration");
    info!("  PUT  /settings/discussion - Change the discussion duration");
    info!("  GET  /status              - Current phase, remaining time and view");
    info!("  GET  /events              - Server-sent phase changes and ticks");
    info!("  GET  /health              - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result.context("failed to install signal handler")?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
