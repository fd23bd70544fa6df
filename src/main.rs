//! FleetLink service entrypoint
//!
//! HTTP booking service for a logistics vehicle fleet.
//! Reads configuration from TOML file (~/.config/fleetlink/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use fleetlink::application::{start_completion_task, BookingService, FleetService};
use fleetlink::config::AppConfig;
use fleetlink::infrastructure::database::migrator::Migrator;
use fleetlink::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use fleetlink::{create_api_router, init_database, DatabaseConfig, SeaOrmRepositoryProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = AppConfig::resolve_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting FleetLink booking service...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn fleetlink::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let fleet_service = Arc::new(FleetService::new(repos.clone()));
    let booking_service = Arc::new(BookingService::new(repos.clone()));

    // ── Shutdown handling ──────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    // Background task that flips finished bookings to `completed`.
    start_completion_task(
        repos.clone(),
        shutdown.clone(),
        app_cfg.completion.check_interval_secs,
    );

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(fleet_service, booking_service, db);

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let server_shutdown = shutdown.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        server_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    });

    // Give in-flight requests a bounded window to drain after shutdown.
    let drain_timeout = std::time::Duration::from_secs(app_cfg.server.shutdown_timeout_secs);
    let drain_deadline = {
        let shutdown = shutdown.clone();
        async move {
            shutdown.wait().await;
            tokio::time::sleep(drain_timeout).await;
        }
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => {
            warn!("Graceful shutdown timed out after {:?}, exiting", drain_timeout);
        }
    }

    info!("FleetLink stopped");
    Ok(())
}
