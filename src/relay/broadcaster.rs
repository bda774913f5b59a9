use crate::actions::ServerToClient;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct RelayBroadcaster {
    client_senders: HashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl RelayBroadcaster {
    pub fn new() -> Self {
        Self {
            client_senders: HashMap::new(),
        }
    }

    pub fn add_client(&mut self, client_id: Uuid, sender: mpsc::UnboundedSender<String>) {
        self.client_senders.insert(client_id, sender);
    }

    pub fn remove_client(&mut self, client_id: Uuid) {
        self.client_senders.remove(&client_id);
    }

    pub fn send_to(&self, client_id: Uuid, response: ServerToClient) {
        if let Some(sender) = self.client_senders.get(&client_id) {
            let _ = sender.send(response.to_json());
        }
    }

    pub fn broadcast_except(&self, except: Uuid, response: ServerToClient) {
        let message = response.to_json();
        for (&client_id, sender) in self.client_senders.iter() {
            if client_id != except {
                let _ = sender.send(message.clone());
            }
        }
    }
}
