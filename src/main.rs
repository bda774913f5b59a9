use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

mod actions;
mod assets;
mod client;
mod config;
mod messages;
mod relay;
mod server;
mod test_utils;

use crate::config::ServerConfig;
use crate::messages::RelayMessage;
use crate::relay::relay_task;
use crate::server::{create_router, AppState};

/// Entry point: starts the HTTP server with simple message passing
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = ServerConfig::from_env();
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on port {}", config.port);

    // Create the relay task; it is the only owner of the shared workspace
    let (relay_tx, relay_rx) = mpsc::unbounded_channel::<RelayMessage>();
    tokio::spawn(relay_task(relay_rx));

    let app = create_router(AppState {
        relay_tx,
        public_root: config.public_root,
    });

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
