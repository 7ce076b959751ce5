use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Per-subscriber queue depth. Deep enough to absorb a classification burst;
/// a subscriber that falls further behind loses messages rather than
/// stalling every publisher.
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

#[derive(Default)]
struct Registry {
    subscribers: HashMap<u64, mpsc::Sender<String>>,
    next_id: u64,
    dropped_messages: u64,
}

/// Publish-subscribe fan-out for serialized event messages.
///
/// Cheap to clone; clones share one subscriber registry. The registry mutex
/// is never held across an await.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
    queue_depth: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_queue_depth(DEFAULT_QUEUE_DEPTH)
    }

    /// Bus with a custom per-subscriber queue depth.
    pub fn with_queue_depth(queue_depth: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            queue_depth,
        }
    }

    /// Register a new subscriber and hand its receiving half to the caller.
    ///
    /// The caller owns the subscription; dropping the returned [`Subscriber`]
    /// (or calling [`EventBus::unsubscribe`]) deregisters it.
    pub fn subscribe(&self) -> Subscriber {
        let (tx, rx) = mpsc::channel(self.queue_depth);
        let mut registry = self.registry.lock().expect("bus registry poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(id, tx);
        debug!(subscriber_id = id, total = registry.subscribers.len(), "subscriber added");
        Subscriber {
            id,
            rx,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Remove a subscriber by id. No-op when already removed.
    pub fn unsubscribe(&self, id: u64) {
        let mut registry = self.registry.lock().expect("bus registry poisoned");
        if registry.subscribers.remove(&id).is_some() {
            debug!(subscriber_id = id, remaining = registry.subscribers.len(), "subscriber removed");
        }
    }

    /// Serialize `payload` once and deliver it to every subscriber
    /// registered at this moment. Returns the number of queues the message
    /// was accepted into.
    ///
    /// With zero subscribers this is a cheap no-op. A full queue drops the
    /// message for that subscriber; a closed queue (receiver dropped without
    /// unsubscribing) prunes the subscriber.
    pub fn emit<T: Serialize>(&self, payload: &T) -> usize {
        let message = match serde_json::to_string(payload) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "dropping unserializable bus payload");
                return 0;
            }
        };

        let mut registry = self.registry.lock().expect("bus registry poisoned");
        if registry.subscribers.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        let mut dropped = 0u64;
        let mut stale: Vec<u64> = Vec::new();

        for (&id, tx) in &registry.subscribers {
            match tx.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => dropped += 1,
                Err(TrySendError::Closed(_)) => stale.push(id),
            }
        }

        for id in stale {
            registry.subscribers.remove(&id);
            warn!(subscriber_id = id, "pruned closed subscriber");
        }
        if dropped > 0 {
            registry.dropped_messages += dropped;
            warn!(dropped, "slow subscribers dropped a message");
        }

        delivered
    }

    /// Number of currently registered subscribers. Introspection only.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .expect("bus registry poisoned")
            .subscribers
            .len()
    }

    /// Total messages dropped on full queues since the bus was created.
    pub fn dropped_messages(&self) -> u64 {
        self.registry
            .lock()
            .expect("bus registry poisoned")
            .dropped_messages
    }
}

/// A registered live consumer of bus messages.
///
/// Owned by the connection that created it; deregisters itself on drop.
pub struct Subscriber {
    id: u64,
    rx: mpsc::Receiver<String>,
    registry: Arc<Mutex<Registry>>,
}

impl Subscriber {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receive the next message; `None` once deregistered with no backlog.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.subscribers.remove(&self.id);
        }
    }
}
