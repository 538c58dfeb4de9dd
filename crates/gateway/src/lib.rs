//! Civicspot HTTP gateway.
//!
//! Serves the generic CRUD routes for registry resources plus the
//! registration use cases, all backed by one pooled database connection.

pub mod codec;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use common::{AppConfig, DatabaseConfig};
use crud::Database;
use users::Migrator;

use crate::config::SHUTDOWN_GRACE;
use crate::routes::create_router;
use crate::state::AppState;

/// Schema migration commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the HTTP server until Ctrl+C.
pub async fn run_server(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_shutdown(config, CancellationToken::new()).await
}

/// Run the HTTP server until Ctrl+C or until `shutdown` is cancelled.
///
/// In-flight requests get [`SHUTDOWN_GRACE`] to finish; after that their
/// tokens fire and they stop waiting on the store.
pub async fn run_server_with_shutdown(
    config: &AppConfig,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    db.run_migrations::<Migrator>().await?;
    info!(dialect = %config.database.dialect, "database ready");

    let requests = CancellationToken::new();
    let state = AppState::new(db, requests.clone());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.http.addr()).await?;
    info!("Civicspot listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, requests.clone()))
        .await?;

    requests.cancel();
    info!("Civicspot stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken, requests: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!(error = %e, "failed to listen for shutdown signal");
                shutdown.cancelled().await;
            }
        },
        _ = shutdown.cancelled() => info!("Shutdown requested"),
    }
    info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Draining in-flight requests");
    cancel_after(requests, SHUTDOWN_GRACE);
}

/// Cancel `token` once `grace` has elapsed.
pub fn cancel_after(token: CancellationToken, grace: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if !token.is_cancelled() {
            warn!("Grace period elapsed, cancelling in-flight requests");
            token.cancel();
        }
    })
}

/// Apply a migration command against the configured database.
pub async fn run_migrations(
    config: &DatabaseConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(config).await?;

    match action {
        MigrateAction::Up => {
            info!("Running migrations...");
            db.run_migrations::<Migrator>().await?;
            info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            info!("Rolling back last migration...");
            db.rollback_migration::<Migrator>().await?;
            info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status::<Migrator>().await? {
                let mark = if applied { "x" } else { " " };
                println!("[{mark}] {name}");
            }
        }
        MigrateAction::Fresh => {
            info!("Dropping all tables and re-running migrations...");
            db.fresh_migrations::<Migrator>().await?;
            info!("Fresh migration completed successfully");
        }
    }

    Ok(())
}
