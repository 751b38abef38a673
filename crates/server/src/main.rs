//! Veda CRM - customer relationship backend.
//!
//! Serves the CRUD API (customers, follow-ups, products) and the compiled
//! front-end bundle on port 5000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API under `/api`
//! - Storage facade: authoritative in-memory store, optionally mirrored to
//!   `PostgreSQL` when `DATABASE_URL` is set
//! - A failing or absent backend never fails a request: the server degrades
//!   to in-memory operation and keeps serving

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veda_crm_server::config::ServerConfig;
use veda_crm_server::state::AppState;
use veda_crm_server::storage::{PgStore, Storage};
use veda_crm_server::{db, routes};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "veda_crm_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect the persistent backend if one is configured. Failure here is
    // not fatal: the storage facade degrades to in-memory operation.
    let persistent = match &config.database_url {
        Some(url) => connect_persistent(url).await,
        None => {
            tracing::info!("DATABASE_URL not set; running with in-memory storage only");
            None
        }
    };

    let storage = Storage::new(persistent);
    let state = AppState::new(config.clone(), storage);
    let app = routes::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("veda-crm serving on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Build the persistent store: connection pool plus migrations.
///
/// Any failure is logged and answered with `None`, putting the process in
/// degraded (in-memory only) mode for its lifetime.
async fn connect_persistent(database_url: &SecretString) -> Option<PgStore> {
    let pool = match db::create_pool(database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "failed to connect to persistent backend; continuing with in-memory storage only"
            );
            return None;
        }
    };

    if let Err(err) = db::MIGRATOR.run(&pool).await {
        tracing::warn!(
            error = %err,
            "failed to run migrations; continuing with in-memory storage only"
        );
        return None;
    }

    tracing::info!("persistent backend connected, migrations applied");
    Some(PgStore::new(pool))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
