//! # Snippetbox server
//!
//! Entry point for the snippet pastebin. The library crate holds everything
//! testable; this binary only wires it to the environment and a socket.
//!
//! ## Startup
//! 1. Logging, filtered by `RUST_LOG` (default `info,snippetbox=debug`)
//! 2. Configuration from the environment and `.env`, see [`Config`]
//! 3. Database migrations and the template cache
//! 4. The session table and a background sweep of expired sessions
//! 5. The router, served with peer addresses for the access log
//!
//! Any failure before the listener is bound aborts the process with the
//! error chain printed by `anyhow`.

use anyhow::Context;
use snippetbox::{
    config::Config,
    routes,
    session::{self, SessionLifetime},
    state::AppState,
};
use std::net::SocketAddr;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired session rows are deleted
const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snippetbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let app_state = AppState::new(&config).await?;
    tracing::info!("database ready, templates compiled");

    let session_store = SqliteStore::new(app_state.db.clone());
    session_store
        .migrate()
        .await
        .context("creating session table")?;

    // Expired sessions never load; this only reclaims their rows.
    let sweep_store = session_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            tracing::debug!("deleting expired sessions");
            if let Err(e) = sweep_store.delete_expired().await {
                tracing::error!(error = ?e, "session sweep failed");
            }
        }
    });

    let session_layer = session::manager_layer(session_store, config.cookie_secure);
    let lifetime = SessionLifetime(time::Duration::hours(config.session_lifetime_hours));

    let app = routes::router(app_state, session_layer, lifetime, config.static_dir());

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
