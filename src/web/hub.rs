//! Fan-out of panel messages to every live WebSocket client.
//!
//! Each registered client owns an unbounded outbound queue drained by its
//! connection's writer task, so producers never block on transport I/O and
//! per-connection message order is preserved. A failed send means the writer
//! is gone; that client is dropped from the set without disturbing the rest.

use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Opaque handle for one registered client.
pub type ClientId = Uuid;

/// The live set of client connections.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    clients: Mutex<HashMap<ClientId, UnboundedSender<String>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client to the live set and return the receiving end of its
    /// outbound queue.
    ///
    /// The private greeting and the snapshot lines are queued while the set
    /// lock is held, so the new client's view starts consistent: they arrive
    /// before any broadcast that is enqueued after registration.
    pub async fn register(
        &self,
        greeting: String,
        snapshot: Vec<String>,
    ) -> (ClientId, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let mut clients = self.clients.lock().await;
        let _ = tx.send(greeting);
        for line in snapshot {
            let _ = tx.send(line);
        }
        clients.insert(id, tx);
        debug!(client = %id, total = clients.len(), "Client registered");
        (id, rx)
    }

    /// Remove a client from the live set. Removing an absent client is a
    /// no-op.
    pub async fn deregister(&self, id: ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(&id).is_some() {
            debug!(client = %id, total = clients.len(), "Client deregistered");
        }
    }

    /// Deliver `message` to every currently registered client.
    ///
    /// A client whose queue is closed is deregistered on the spot; delivery
    /// to the remaining clients is unaffected.
    pub async fn broadcast(&self, message: &str) {
        let mut clients = self.clients.lock().await;
        let mut gone: Vec<ClientId> = Vec::new();
        for (id, tx) in clients.iter() {
            if tx.send(message.to_string()).is_err() {
                gone.push(*id);
            }
        }
        for id in gone {
            clients.remove(&id);
            debug!(client = %id, "Client dropped on send failure");
        }
    }

    /// Number of currently registered clients.
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn register_plain(hub: &BroadcastHub) -> (ClientId, UnboundedReceiver<String>) {
        let (id, mut rx) = hub.register("hello test".to_string(), Vec::new()).await;
        assert_eq!(rx.recv().await.unwrap(), "hello test");
        (id, rx)
    }

    #[tokio::test]
    async fn broadcast_with_no_clients_is_fine() {
        let hub = BroadcastHub::new();
        hub.broadcast("redled on").await;
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_client() {
        let hub = BroadcastHub::new();
        let mut receivers = Vec::new();
        for _ in 0..5 {
            receivers.push(register_plain(&hub).await.1);
        }
        assert_eq!(hub.client_count().await, 5);

        hub.broadcast("greenled on").await;
        for rx in &mut receivers {
            assert_eq!(rx.recv().await.unwrap(), "greenled on");
        }
    }

    #[tokio::test]
    async fn greeting_and_snapshot_precede_broadcasts() {
        let hub = BroadcastHub::new();
        let snapshot = vec![
            "redled on".to_string(),
            "greenled off".to_string(),
            "blueled off".to_string(),
        ];
        let (_id, mut rx) = hub.register("hello 10.0.0.1:2001".to_string(), snapshot).await;
        hub.broadcast("adc0 512").await;

        assert_eq!(rx.recv().await.unwrap(), "hello 10.0.0.1:2001");
        assert_eq!(rx.recv().await.unwrap(), "redled on");
        assert_eq!(rx.recv().await.unwrap(), "greenled off");
        assert_eq!(rx.recv().await.unwrap(), "blueled off");
        assert_eq!(rx.recv().await.unwrap(), "adc0 512");
    }

    #[tokio::test]
    async fn failed_client_is_isolated_and_dropped() {
        let hub = BroadcastHub::new();
        let (_c1, mut rx1) = register_plain(&hub).await;
        let (_c2, rx2) = register_plain(&hub).await;
        let (_c3, mut rx3) = register_plain(&hub).await;

        // C2's writer goes away.
        drop(rx2);

        hub.broadcast("blueled on").await;
        assert_eq!(rx1.recv().await.unwrap(), "blueled on");
        assert_eq!(rx3.recv().await.unwrap(), "blueled on");
        assert_eq!(hub.client_count().await, 2);

        hub.broadcast("blueled off").await;
        assert_eq!(rx1.recv().await.unwrap(), "blueled off");
        assert_eq!(rx3.recv().await.unwrap(), "blueled off");
    }

    #[tokio::test]
    async fn deregister_is_idempotent() {
        let hub = BroadcastHub::new();
        let (id, _rx) = register_plain(&hub).await;
        hub.deregister(id).await;
        hub.deregister(id).await;
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn per_client_order_is_preserved() {
        let hub = BroadcastHub::new();
        let (_id, mut rx) = register_plain(&hub).await;
        for n in 0..100u16 {
            hub.broadcast(&format!("adc0 {}", n)).await;
        }
        for n in 0..100u16 {
            assert_eq!(rx.recv().await.unwrap(), format!("adc0 {}", n));
        }
    }
}
