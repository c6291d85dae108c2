//! Message-broker contract for the file-ingestion pipeline.
//!
//! Producers publish JSON events onto one topic exchange; queues bind
//! to routing-key patterns; the correlation id carried in the message
//! properties is the only join key across the asynchronous hops.

pub mod amqp;
pub mod error;
pub mod memory;
pub mod ops;
pub mod topology;

pub use amqp::AmqpBroker;
pub use error::{MqError, MqResult};
pub use memory::MemoryBroker;

use async_trait::async_trait;

/// A message fetched from a queue, not yet settled.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Broker-assigned sequence number for this delivery.
    pub delivery_tag: u64,
    /// Correlation id from the message properties, if the producer set
    /// one.
    pub correlation_id: Option<String>,
    pub body: Vec<u8>,
}

/// Outgoing message properties.
///
/// The correlation id travels here, never inside the JSON body.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pub correlation_id: Option<String>,
    pub content_type: Option<String>,
    /// Persistent messages survive a broker restart.
    pub persistent: bool,
}

/// One logical sequence of broker operations.
///
/// Implementations are not required to be safe for concurrent use of a
/// single scan: callers of the scan helpers in [`ops`] must hold
/// exclusive access to the queue they examine.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Publishes onto the topic exchange. Failures are surfaced to the
    /// caller; no retry happens at this layer.
    async fn publish(&self, routing_key: &str, payload: &[u8], props: Properties)
        -> MqResult<()>;

    /// Non-blocking single fetch; `None` once the queue is exhausted.
    async fn get(&self, queue: &str) -> MqResult<Option<Delivery>>;

    /// Consumes a fetched message.
    async fn ack(&self, delivery_tag: u64) -> MqResult<()>;

    /// Returns a fetched message to its queue.
    async fn nack(&self, delivery_tag: u64) -> MqResult<()>;

    /// Discards everything in `queue`, returning how many messages were
    /// dropped. Purging an empty queue succeeds with 0.
    async fn purge(&self, queue: &str) -> MqResult<u32>;
}
