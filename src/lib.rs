pub mod api;
pub mod config;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

// Export store types
pub use store::{ContactStore, InMemoryStore, PostgresStore, StoreError};

/// Load config, connect to PostgreSQL and serve until Ctrl-C
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // No-op when the binary has already installed a logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}",
        config.server.host,
        config.server.port
    );

    log::info!("Connecting to PostgreSQL...");
    let postgres_store =
        crate::store::PostgresStore::connect(&config.database_url(), &config.database).await?;
    postgres_store.ping().await?;

    let store = Arc::new(postgres_store);
    let app = crate::api::routes::create_router(store.clone());

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("server running on http://{}/api", bind_address);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    log::info!("Connection pool closed");
    Ok(())
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", err);
    }
    log::info!("shutdown signal received");
}
