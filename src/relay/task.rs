use super::broadcaster::RelayBroadcaster;
use crate::actions::ServerToClient;
use crate::messages::RelayMessage;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Relay task - sole owner of the shared workspace state.
///
/// Every mutation arrives through the channel, so an update and its
/// broadcast never interleave with another client's update.
pub async fn relay_task(mut rx: mpsc::UnboundedReceiver<RelayMessage>) {
    let mut shared_state = String::new();
    let mut broadcaster = RelayBroadcaster::new();

    info!("Relay started");

    while let Some(msg) = rx.recv().await {
        match msg {
            RelayMessage::ClientConnected {
                client_id,
                response_tx,
            } => {
                broadcaster.add_client(client_id, response_tx);

                // Push the current workspace to the new client (may be empty)
                broadcaster.send_to(client_id, ServerToClient::load(shared_state.clone()));

                debug!("Client {} joined the relay", client_id);
            }
            RelayMessage::WorkspaceUpdate {
                client_id,
                workspace,
            } => {
                // Last write wins: replace the whole state, no merging
                shared_state = workspace;

                broadcaster.broadcast_except(
                    client_id,
                    ServerToClient::update(client_id, shared_state.clone()),
                );

                debug!(
                    "Client {} updated the workspace ({} bytes)",
                    client_id,
                    shared_state.len()
                );
            }
            RelayMessage::ClientDisconnected { client_id } => {
                broadcaster.remove_client(client_id);
                debug!("Client {} left the relay", client_id);
            }
        }
    }
    debug!("Relay task ended");
}
