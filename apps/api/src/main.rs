use std::error::Error;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use usermgmt_api::api::{self, AppState};
use usermgmt_api::config::{Config, StorageBackend};
use usermgmt_api::infrastructure::repositories::{InMemoryUserStore, PostgresUserStore};
use usermgmt_api::service::UserService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let app = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;

            tracing::info!("Database connected successfully");

            if config.run_migrations {
                sqlx::migrate!().run(&pool).await?;
                tracing::info!("Migrations applied");
            }

            let service = UserService::new(PostgresUserStore::new(pool));
            api::router(AppState::new(service, &config.public_base_url))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            let service = UserService::new(InMemoryUserStore::new());
            api::router(AppState::new(service, &config.public_base_url))
        }
    };

    // Start server
    let addr = config.socket_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
