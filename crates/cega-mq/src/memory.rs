//! In-process topic broker.
//!
//! Plays the part of the real RabbitMQ in tests and local harnesses,
//! the same role the fake CentralEGA servers play in the deployment
//! test benches. Routing, delivery tags, and nack-requeue behavior
//! mirror what the scan tooling observes against a real broker with a
//! single consumer.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{MqError, MqResult};
use crate::topology::{self, routing_key_matches};
use crate::{Broker, Delivery, Properties};

#[derive(Debug, Clone)]
struct Stored {
    correlation_id: Option<String>,
    body: Vec<u8>,
}

struct Unacked {
    queue: String,
    /// Publish-order position, so a nack puts the message back where it
    /// was.
    seq: u64,
    message: Stored,
}

#[derive(Default)]
struct Inner {
    /// Per queue: publish sequence number to message, kept sorted so
    /// fetch order matches publish order even across requeues.
    queues: HashMap<String, BTreeMap<u64, Stored>>,
    /// `(routing key pattern, queue)` pairs.
    bindings: Vec<(String, String)>,
    unacked: HashMap<u64, Unacked>,
    next_seq: u64,
    next_tag: u64,
}

/// In-memory topic exchange plus its bound queues.
#[derive(Default)]
pub struct MemoryBroker {
    inner: Mutex<Inner>,
}

impl MemoryBroker {
    /// Empty broker: no queues, no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Broker with the standard `v1.*` topology declared.
    #[must_use]
    pub fn with_default_topology() -> Self {
        let broker = Self::new();
        for queue in topology::QUEUES {
            broker.declare_queue(queue);
        }
        for (pattern, queue) in topology::BINDINGS {
            broker.bind(pattern, queue);
        }
        broker
    }

    /// Declares a queue; redeclaration keeps existing messages.
    pub fn declare_queue(&self, name: &str) {
        self.inner
            .lock()
            .queues
            .entry(name.to_string())
            .or_default();
    }

    /// Binds a routing-key pattern to a queue.
    pub fn bind(&self, pattern: &str, queue: &str) {
        self.declare_queue(queue);
        self.inner
            .lock()
            .bindings
            .push((pattern.to_string(), queue.to_string()));
    }

    /// Messages currently visible on `queue` (unacked ones excluded).
    #[must_use]
    pub fn depth(&self, queue: &str) -> usize {
        self.inner
            .lock()
            .queues
            .get(queue)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn publish(
        &self,
        routing_key: &str,
        payload: &[u8],
        props: Properties,
    ) -> MqResult<()> {
        let mut inner = self.inner.lock();
        let targets: Vec<String> = inner
            .bindings
            .iter()
            .filter(|(pattern, _)| routing_key_matches(pattern, routing_key))
            .map(|(_, queue)| queue.clone())
            .collect();
        // A key no queue is bound to is silently dropped, as a topic
        // exchange does.
        for queue in targets {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let stored = Stored {
                correlation_id: props.correlation_id.clone(),
                body: payload.to_vec(),
            };
            inner
                .queues
                .entry(queue)
                .or_default()
                .insert(seq, stored);
        }
        Ok(())
    }

    async fn get(&self, queue: &str) -> MqResult<Option<Delivery>> {
        let mut inner = self.inner.lock();
        let entries = inner
            .queues
            .get_mut(queue)
            .ok_or_else(|| MqError::UnknownQueue(queue.to_string()))?;
        let Some((seq, message)) = entries.pop_first() else {
            return Ok(None);
        };
        let delivery_tag = inner.next_tag;
        inner.next_tag += 1;
        let delivery = Delivery {
            delivery_tag,
            correlation_id: message.correlation_id.clone(),
            body: message.body.clone(),
        };
        inner.unacked.insert(
            delivery_tag,
            Unacked {
                queue: queue.to_string(),
                seq,
                message,
            },
        );
        Ok(Some(delivery))
    }

    async fn ack(&self, delivery_tag: u64) -> MqResult<()> {
        self.inner
            .lock()
            .unacked
            .remove(&delivery_tag)
            .map(|_| ())
            .ok_or(MqError::UnknownDelivery(delivery_tag))
    }

    async fn nack(&self, delivery_tag: u64) -> MqResult<()> {
        let mut inner = self.inner.lock();
        let unacked = inner
            .unacked
            .remove(&delivery_tag)
            .ok_or(MqError::UnknownDelivery(delivery_tag))?;
        inner
            .queues
            .entry(unacked.queue)
            .or_default()
            .insert(unacked.seq, unacked.message);
        Ok(())
    }

    async fn purge(&self, queue: &str) -> MqResult<u32> {
        let mut inner = self.inner.lock();
        let entries = inner
            .queues
            .get_mut(queue)
            .ok_or_else(|| MqError::UnknownQueue(queue.to_string()))?;
        let count = entries.len() as u32;
        entries.clear();
        Ok(count)
    }
}
