use crate::actions::ServerToClient;

/// Decode a raw outbound frame back into its event for assertions
#[allow(dead_code)]
pub fn decode_event(frame: &str) -> ServerToClient {
    serde_json::from_str(frame)
        .unwrap_or_else(|e| panic!("Invalid event frame {:?}: {}", frame, e))
}
