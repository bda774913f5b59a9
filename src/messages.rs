use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug)]
pub enum RelayMessage {
    /// A new connection wants to receive broadcasts
    ClientConnected {
        client_id: Uuid,
        response_tx: mpsc::UnboundedSender<String>,
    },
    /// A client replaced its workspace; store it and forward to the others
    WorkspaceUpdate { client_id: Uuid, workspace: String },
    /// Client disconnected, drop it from the broadcast set
    ClientDisconnected { client_id: Uuid },
}
