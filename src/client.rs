use crate::actions::{ClientToServer, ServerToClient};
use crate::messages::RelayMessage;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Simple client handler using message passing
pub async fn handle_client(
    socket: WebSocket,
    addr: SocketAddr,
    relay_tx: mpsc::UnboundedSender<RelayMessage>,
) {
    // Create channels for this client
    let (writer_tx, writer_rx) = mpsc::unbounded_channel::<String>();

    let client_id = Uuid::new_v4();

    info!("Client {} connected from {}", client_id, addr);

    // Split the socket for reading and writing
    let (socket_writer, socket_reader) = socket.split();

    // Send initial handshake
    let connected_response = ServerToClient::connected(client_id);
    let _ = writer_tx.send(connected_response.to_json());

    // Spawn task to handle writing to the client socket
    let write_task = tokio::spawn(handle_client_writer(socket_writer, writer_rx));

    // Register with the relay; this also pushes the current workspace
    if relay_tx
        .send(RelayMessage::ClientConnected {
            client_id,
            response_tx: writer_tx.clone(),
        })
        .is_err()
    {
        error!("Relay is gone, dropping client {}", client_id);
        write_task.abort();
        return;
    }

    // Read from client
    read_client_events(client_id, addr, socket_reader, &relay_tx).await;

    // Cleanup on disconnect
    let _ = relay_tx.send(RelayMessage::ClientDisconnected { client_id });

    // Cancel background tasks
    write_task.abort();

    debug!("Client {} cleanup complete", client_id);
}

async fn read_client_events(
    client_id: Uuid,
    addr: SocketAddr,
    mut reader: SplitStream<WebSocket>,
    relay_tx: &mpsc::UnboundedSender<RelayMessage>,
) {
    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_client_event(client_id, text.as_bytes(), relay_tx);
            }
            Ok(Message::Binary(data)) => {
                handle_client_event(client_id, &data, relay_tx);
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Handled automatically by axum
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_id);
                break;
            }
            Err(e) => {
                error!("Client {} read error: {}", addr, e);
                break;
            }
        }
    }
}

/// Parse one inbound frame and forward it to the relay
fn handle_client_event(
    client_id: Uuid,
    frame: &[u8],
    relay_tx: &mpsc::UnboundedSender<RelayMessage>,
) {
    match serde_json::from_slice::<ClientToServer>(frame) {
        Ok(ClientToServer::WorkspaceUpdate { workspace, sender }) => {
            // The claimed sender id is not trusted; the connection id is
            if !sender.is_empty() && sender != client_id.to_string() {
                debug!(
                    "Client {} claimed sender id {}, overriding",
                    client_id, sender
                );
            }
            let _ = relay_tx.send(RelayMessage::WorkspaceUpdate {
                client_id,
                workspace,
            });
        }
        Err(e) => {
            error!("Failed to parse event from {}: {}", client_id, e);
        }
    }
}

/// Handle writing messages to the client socket
async fn handle_client_writer(
    mut writer: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = writer.send(Message::Text(message.into())).await {
            error!("Failed to write to client: {}", e);
            break;
        }
    }
}
