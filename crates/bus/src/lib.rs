//! Pub/sub event bus decoupling producers from live observers.
//!
//! Producers `emit` serializable payloads; each registered [`Subscriber`]
//! receives the identical serialized message through its own bounded queue.
//! Delivery is fire-and-forget per subscriber: a full queue drops the
//! message (counted) instead of stalling the publisher, and a closed queue
//! deregisters the subscriber. The bus never owns queue lifetime: dropping
//! a `Subscriber` removes it from the registry.

mod bus;

pub use bus::{EventBus, Subscriber, DEFAULT_QUEUE_DEPTH};
