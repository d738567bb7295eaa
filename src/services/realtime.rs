//! In-process real-time push to connected recipients.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// One pushed event as delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub payload: serde_json::Value,
}

/// Best-effort delivery to a recipient's live connections.
pub trait RealtimeTransport: Clone + Send + Sync + 'static {
    /// Returns `true` if at least one live connection accepted the event.
    fn send(
        &self,
        recipient_id: Uuid,
        event: &str,
        payload: &serde_json::Value,
    ) -> impl Future<Output = bool> + Send;
}

/// Live subscribers keyed by recipient. A recipient may hold several
/// connections (one per open tab or device).
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<Uuid, Vec<mpsc::UnboundedSender<RealtimeEvent>>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, recipient_id: Uuid) -> mpsc::UnboundedReceiver<RealtimeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .write()
            .await
            .entry(recipient_id)
            .or_default()
            .push(tx);
        log::info!("Realtime subscriber connected for {}", recipient_id);
        rx
    }

    /// Live connections for a recipient, not counting closed ones.
    pub async fn connection_count(&self, recipient_id: Uuid) -> usize {
        self.connections
            .read()
            .await
            .get(&recipient_id)
            .map_or(0, |senders| senders.iter().filter(|s| !s.is_closed()).count())
    }
}

impl RealtimeTransport for ConnectionRegistry {
    async fn send(&self, recipient_id: Uuid, event: &str, payload: &serde_json::Value) -> bool {
        let mut connections = self.connections.write().await;
        let Some(senders) = connections.get_mut(&recipient_id) else {
            return false;
        };

        let message = RealtimeEvent {
            event: event.to_string(),
            payload: payload.clone(),
        };
        // Dropped receivers fail the send and are pruned here.
        senders.retain(|tx| tx.send(message.clone()).is_ok());
        let delivered = !senders.is_empty();
        if !delivered {
            connections.remove(&recipient_id);
        }
        delivered
    }
}
