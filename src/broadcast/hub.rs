//! Registry of live viewers and fan-out of events to them.
//!
//! Each connected client owns the receiving half of a bounded channel; the
//! hub keeps the sending halves keyed by [`ClientId`]. Publishing never
//! blocks: a send either queues the event or fails because the client is
//! gone or has stopped draining its queue, in which case the client is dropped
//! from the registry.

use std::collections::HashMap;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::BroadcastEvent;

/// Events a client may have queued before it is considered stalled.
pub const CLIENT_QUEUE_CAPACITY: usize = 64;

/// Receiving half handed to a connected client.
pub type EventReceiver = mpsc::Receiver<BroadcastEvent>;

/// Opaque handle identifying one connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broadcast hub holding every currently connected client.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    /// Senders indexed by client.
    clients: RwLock<HashMap<ClientId, mpsc::Sender<BroadcastEvent>>>,
}

impl BroadcastHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client.
    ///
    /// The client only receives events published after this call returns.
    pub async fn connect(&self) -> (ClientId, EventReceiver) {
        let (tx, rx) = mpsc::channel(CLIENT_QUEUE_CAPACITY);
        let id = ClientId::new();
        self.clients.write().await.insert(id, tx);
        (id, rx)
    }

    /// Remove a client. Returns `false` if it was not registered.
    pub async fn disconnect(&self, id: ClientId) -> bool {
        self.clients.write().await.remove(&id).is_some()
    }

    /// Number of registered clients.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Send `event` to every registered client.
    ///
    /// Returns how many clients the event was queued for. Clients whose
    /// receiver has been dropped, or whose queue is full, are removed.
    pub async fn publish(&self, event: BroadcastEvent) -> usize {
        let snapshot: Vec<_> = {
            let clients = self.clients.read().await;
            clients
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Client {} stopped reading, dropping it", id);
                    dead.push(id);
                }
                Err(TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut clients = self.clients.write().await;
            for id in &dead {
                clients.remove(id);
                tracing::debug!("Dropped unreachable client {}", id);
            }
        }

        tracing::debug!(
            recipients = delivered,
            dropped = dead.len(),
            "Broadcast {}",
            event.kind()
        );

        delivered
    }
}
