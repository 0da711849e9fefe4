use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use event_hub::config::{Config, StorageBackend};
use event_hub::routes::create_routes;
use event_hub::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    let (state, database) = AppState::from_config(&config);

    if let Some(db) = database {
        db.migrate().await.expect("Failed to run migrations");
    }

    if config.storage == StorageBackend::Memory {
        tracing::warn!("Using in-memory storage, data is lost on restart");
    }

    let app = create_routes(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
