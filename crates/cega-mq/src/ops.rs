//! Publish and queue-scan operations used by the operator tooling.
//!
//! Scans are two-phase: every visible message is fetched with
//! non-blocking gets, then matches are acked (consumed) and everything
//! else is nacked back onto the queue, so the visible depth of
//! unrelated traffic is unchanged. Scans assume exclusive,
//! single-consumer access to the queue for their whole duration; the
//! delivery-tag loop guard only protects against broker redelivery
//! anomalies, not against concurrent consumers.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use uuid::Uuid;

use crate::error::{MqError, MqResult};
use crate::{Broker, Properties};

/// Publishes a JSON event and returns the correlation id it carried.
///
/// The id is attached to the message properties, never to the body; a
/// fresh v4 UUID is generated when the caller does not supply one.
pub async fn publish_event(
    broker: &dyn Broker,
    routing_key: &str,
    body: &Value,
    correlation_id: Option<String>,
) -> MqResult<String> {
    let correlation_id = correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let payload = serde_json::to_vec(body)?;
    broker
        .publish(
            routing_key,
            &payload,
            Properties {
                correlation_id: Some(correlation_id.clone()),
                content_type: Some("application/json".to_string()),
                persistent: true,
            },
        )
        .await?;
    Ok(correlation_id)
}

/// One message examined during a scan.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub delivery_tag: u64,
    pub correlation_id: Option<String>,
    pub body: Value,
}

/// How matched messages are settled after the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    /// Ack matches; they leave the queue.
    ConsumeMatches,
    /// Nack everything, matches included; the queue is untouched.
    NackAll,
}

/// Drains `queue`, classifies each message, settles, and returns the
/// hits in delivery order. Non-JSON bodies are treated as misses.
async fn scan(
    broker: &dyn Broker,
    queue: &str,
    mut is_hit: impl FnMut(Option<&str>, &Value) -> bool,
    settle: Settle,
) -> MqResult<Vec<ScanHit>> {
    let mut seen = HashSet::new();
    let mut hits: Vec<ScanHit> = Vec::new();
    let mut misses: Vec<u64> = Vec::new();

    while let Some(delivery) = broker.get(queue).await? {
        if !seen.insert(delivery.delivery_tag) {
            // Same tag twice: the broker redelivered mid-scan.
            break;
        }
        match serde_json::from_slice::<Value>(&delivery.body) {
            Ok(body) if is_hit(delivery.correlation_id.as_deref(), &body) => {
                hits.push(ScanHit {
                    delivery_tag: delivery.delivery_tag,
                    correlation_id: delivery.correlation_id,
                    body,
                });
            }
            _ => misses.push(delivery.delivery_tag),
        }
    }

    for tag in misses {
        broker.nack(tag).await?;
    }
    for hit in &hits {
        match settle {
            Settle::ConsumeMatches => broker.ack(hit.delivery_tag).await?,
            Settle::NackAll => broker.nack(hit.delivery_tag).await?,
        }
    }
    Ok(hits)
}

fn pick(hits: Vec<ScanHit>, latest: bool) -> MqResult<String> {
    let hit = if latest {
        hits.into_iter().max_by_key(|hit| hit.delivery_tag)
    } else {
        hits.into_iter().min_by_key(|hit| hit.delivery_tag)
    };
    hit.and_then(|hit| hit.correlation_id).ok_or(MqError::NoMatch)
}

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

/// Correlation id of the event published by `user` for `filepath`.
///
/// Matching messages are consumed; everything else goes back onto the
/// queue. With `latest`, duplicates resolve to the highest delivery
/// tag.
pub async fn find_by_ownership(
    broker: &dyn Broker,
    queue: &str,
    user: &str,
    filepath: &str,
    latest: bool,
) -> MqResult<String> {
    let hits = scan(
        broker,
        queue,
        |_, body| field(body, "user") == Some(user) && field(body, "filepath") == Some(filepath),
        Settle::ConsumeMatches,
    )
    .await?;
    pick(hits, latest)
}

/// Correlation ids for `user` across several filepaths, keyed by
/// filepath. Fails with `NoMatch` unless every filepath was found;
/// found matches are consumed either way.
pub async fn find_all_by_ownership(
    broker: &dyn Broker,
    queue: &str,
    user: &str,
    filepaths: &[String],
) -> MqResult<HashMap<String, String>> {
    let wanted: HashSet<&str> = filepaths.iter().map(String::as_str).collect();
    let hits = scan(
        broker,
        queue,
        |_, body| {
            field(body, "user") == Some(user)
                && field(body, "filepath").is_some_and(|path| wanted.contains(path))
        },
        Settle::ConsumeMatches,
    )
    .await?;

    let mut found = HashMap::new();
    for hit in hits {
        if let (Some(path), Some(correlation_id)) =
            (field(&hit.body, "filepath"), hit.correlation_id)
        {
            // First delivery wins for each filepath.
            found.entry(path.to_string()).or_insert(correlation_id);
        }
    }
    if found.len() != wanted.len() {
        return Err(MqError::NoMatch);
    }
    Ok(found)
}

/// Correlation id of the event whose encrypted-integrity checksum is
/// `checksum`. Both the `checksum` and legacy `hash` spellings are
/// recognized.
pub async fn find_by_checksum(
    broker: &dyn Broker,
    queue: &str,
    checksum: &str,
    latest: bool,
) -> MqResult<String> {
    let hits = scan(
        broker,
        queue,
        |_, body| {
            body.get("encrypted_integrity")
                .map(|integrity| {
                    field(integrity, "checksum")
                        .or_else(|| field(integrity, "hash"))
                        == Some(checksum)
                })
                .unwrap_or(false)
        },
        Settle::ConsumeMatches,
    )
    .await?;
    pick(hits, latest)
}

/// Dumps the message carrying `correlation_id` without consuming
/// anything: every examined message, the match included, is returned to
/// the queue.
pub async fn fetch_by_correlation(
    broker: &dyn Broker,
    queue: &str,
    correlation_id: &str,
) -> MqResult<ScanHit> {
    let hits = scan(
        broker,
        queue,
        |id, _| id == Some(correlation_id),
        Settle::NackAll,
    )
    .await?;
    hits.into_iter().next().ok_or(MqError::NoMatch)
}

/// Resets the named queues, returning the per-queue discard counts.
/// Purging an already-empty queue reports zero.
pub async fn purge_queues(
    broker: &dyn Broker,
    queues: &[String],
) -> MqResult<Vec<(String, u32)>> {
    let mut counts = Vec::with_capacity(queues.len());
    for queue in queues {
        let count = broker.purge(queue).await?;
        counts.push((queue.clone(), count));
    }
    Ok(counts)
}
