//! taskdeck server
//!
//! - Task CRUD: `POST /`, `GET /`, `PUT /:id`, `DELETE /:id`
//! - Request latency histograms at `/metrics`
//! - Graceful shutdown with a readiness drain window

use tracing_subscriber::{fmt, EnvFilter};

use taskdeck_core::error::{Result, TaskdeckError};
use taskdeck_server::{app_state::AppState, config, router, shutdown, store};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "taskdeck-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var(config::CONFIG_PATH_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;

    let store = store::connect(&config::database_url(&cfg)).await?;

    let state = AppState::new(cfg, store);
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| TaskdeckError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, "taskdeck-server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::drain_after(state, shutdown::os_signal()))
        .await
        .map_err(|e| TaskdeckError::Internal(format!("server failed: {e}")))?;

    tracing::info!("taskdeck-server stopped");
    Ok(())
}
