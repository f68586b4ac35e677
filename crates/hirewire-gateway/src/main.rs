//! hirewire gateway
//!
//! - WebSocket endpoint: /ws/connect (session cookie auth)
//! - Chat sends over the socket: persist, then fan out to both participants
//! - Notifications: POST /v1/notifications, fanned out to the recipient
//! - Heartbeat ping + read deadline per connection

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use hirewire_core::error::{HirewireError, Result};
use hirewire_gateway::{
    app_state::{AppState, Collaborators},
    config,
    infra::MemoryDirectory,
    router,
};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "hirewire-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| HirewireError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    // Local runs: every collaborator is the in-memory directory seeded from `dev`.
    let directory = Arc::new(MemoryDirectory::from_seed(&cfg.dev));
    let state = AppState::new(cfg, Collaborators::in_memory(directory))?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "hirewire-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HirewireError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HirewireError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
