use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clubevents_api::config::ServerConfig;
use clubevents_api::router::build_app_router;
use clubevents_api::state::AppState;
use clubevents_db::PgEventStore;
use clubevents_events::{
    AmqpNotificationPublisher, DirectoryConfig, HttpDirectoryClient, QueueConfig,
};
use clubevents_service::{EventService, ServiceConfig};

/// Upper bound for closing the broker connection on shutdown.
const PUBLISHER_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "clubevents_api=debug,clubevents_service=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = clubevents_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    clubevents_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    clubevents_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let service_config = ServiceConfig::from_env();

    let directory_config = DirectoryConfig::from_env(service_config.directory_timeout);
    tracing::info!(base_url = %directory_config.base_url, "User directory configured");
    let directory =
        HttpDirectoryClient::new(directory_config).expect("Failed to build directory client");

    let publisher = Arc::new(AmqpNotificationPublisher::new(QueueConfig::from_env()));
    tracing::info!(queue = publisher.queue_name(), "Notification publisher created");

    let service = EventService::new(
        Arc::new(PgEventStore::new(pool)),
        Arc::new(directory),
        publisher.clone(),
        service_config,
    );

    // --- App state ---
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if tokio::time::timeout(PUBLISHER_CLOSE_TIMEOUT, publisher.close())
        .await
        .is_err()
    {
        tracing::warn!("Timed out closing the notification publisher");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
