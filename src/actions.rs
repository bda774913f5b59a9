use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Client to Server Events
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event")]
pub enum ClientToServer {
    // Workspace state replaced client-side, relayed to everyone else.
    // Clients also claim a `sender` id; the server ignores it and uses the
    // id of the connection the frame arrived on.
    #[serde(rename = "blockly-update")]
    WorkspaceUpdate {
        workspace: String,
        #[serde(default)]
        sender: String,
    },
}

// Server to Client Events
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event")]
pub enum ServerToClient {
    // Connection responses
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "clientId")]
        client_id: String,
    },
    #[serde(rename = "error")]
    Error { message: String },

    // Workspace events
    #[serde(rename = "blockly-load")]
    WorkspaceLoad { workspace: String },
    #[serde(rename = "blockly-update")]
    WorkspaceUpdate { workspace: String, sender: Uuid },
}

impl ServerToClient {
    // Simple, safe JSON conversion - no unwrapping!
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"event":"error","message":"Serialization failed"}"#.to_string()
        })
    }

    // Helper constructors for common responses
    pub fn connected(client_id: Uuid) -> Self {
        Self::Connected {
            client_id: client_id.to_string(),
        }
    }

    pub fn load(workspace: impl Into<String>) -> Self {
        Self::WorkspaceLoad {
            workspace: workspace.into(),
        }
    }

    pub fn update(sender: Uuid, workspace: impl Into<String>) -> Self {
        Self::WorkspaceUpdate {
            workspace: workspace.into(),
            sender,
        }
    }
}
