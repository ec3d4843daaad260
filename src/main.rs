use std::net::SocketAddr;
use std::sync::Arc;

use rozhlas::common::logger;
use rozhlas::config::Config;
use rozhlas::server::AppState;
use rozhlas::store::MemoryStore;
use rozhlas::transport;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logger::init(&config.logging);

    let store = Arc::new(match &config.store.fixture {
        Some(path) => {
            MemoryStore::from_fixture(path).map_err(|e| e as Box<dyn std::error::Error>)?
        }
        None => MemoryStore::new(),
    });

    let state = Arc::new(AppState::new(
        store.clone(),
        store.clone(),
        config.clone(),
    ));
    let app = transport::router(Arc::clone(&state));

    let address: SocketAddr =
        format!("{}:{}", config.server.address, config.server.port).parse()?;
    info!("announcement hub listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("hub shut down");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
