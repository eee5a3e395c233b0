use memorial_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, RepositoryState},
    storage::{LocalDiskStorage, StorageService, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: Configuration, Logging, Database, Storage, and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup: RUST_LOG wins, with sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memorial_api=debug,tower_http=info,axum=trace".into());

    // 3. Initialize logging based on environment.
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database initialization (Postgres). The acquire timeout bounds how
    // long a request can wait on store connectivity: prolonged unavailability
    // surfaces as a 503 instead of an indefinite hang.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Storage initialization: uploads live on local disk, served back
    // statically under /uploads.
    let disk = LocalDiskStorage::new(&config.upload_dir);
    disk.ensure_upload_dir().await;
    let storage = Arc::new(disk) as StorageState;

    // 6. Unified state assembly.
    let port = config.port;
    let app_state = AppState {
        repo,
        storage,
        config,
    };

    // 7. Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("FATAL: Failed to bind listening port.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:{}", port);
    tracing::info!(
        "API documentation (Swagger UI) available at: http://localhost:{}/swagger-ui",
        port
    );

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
