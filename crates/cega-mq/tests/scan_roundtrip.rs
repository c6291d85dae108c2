//! End-to-end publish/scan behavior against the in-memory broker.

use cega_mq::ops::{
    fetch_by_correlation, find_all_by_ownership, find_by_checksum, find_by_ownership,
    publish_event, purge_queues,
};
use cega_mq::{topology, Broker, MemoryBroker, MqError, Properties};
use serde_json::json;

fn ingestion_event(user: &str, filepath: &str) -> serde_json::Value {
    json!({ "user": user, "filepath": filepath, "stable_id": "EGAF_0" })
}

#[tokio::test]
async fn published_correlation_id_is_recovered_from_the_bound_queue() {
    let broker = MemoryBroker::with_default_topology();
    let correlation_id = publish_event(
        &broker,
        "files.inbox",
        &ingestion_event("alice", "/inbox/alice/f.c4gh"),
        None,
    )
    .await
    .unwrap();

    let found = find_by_ownership(
        &broker,
        topology::QUEUE_INBOX,
        "alice",
        "/inbox/alice/f.c4gh",
        false,
    )
    .await
    .unwrap();
    assert_eq!(found, correlation_id);
    // The match was consumed.
    assert_eq!(broker.depth(topology::QUEUE_INBOX), 0);
}

#[tokio::test]
async fn non_matching_scan_leaves_the_queue_untouched() {
    let broker = MemoryBroker::with_default_topology();
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/inbox/alice/f.c4gh"),
        Some("C1".to_string()),
    )
    .await
    .unwrap();

    let err = find_by_ownership(
        &broker,
        topology::QUEUE_FILES,
        "bob",
        "/inbox/alice/f.c4gh",
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, MqError::NoMatch));
    // Nacked back: still visible for the next scan.
    assert_eq!(broker.depth(topology::QUEUE_FILES), 1);

    let found = find_by_ownership(
        &broker,
        topology::QUEUE_FILES,
        "alice",
        "/inbox/alice/f.c4gh",
        false,
    )
    .await
    .unwrap();
    assert_eq!(found, "C1");
}

#[tokio::test]
async fn latest_flag_picks_the_highest_delivery_tag() {
    let broker = MemoryBroker::with_default_topology();
    let event = ingestion_event("alice", "/inbox/alice/f.c4gh");
    publish_event(&broker, "files", &event, Some("C1".to_string()))
        .await
        .unwrap();
    publish_event(&broker, "files", &event, Some("C2".to_string()))
        .await
        .unwrap();

    let latest = find_by_ownership(
        &broker,
        topology::QUEUE_FILES,
        "alice",
        "/inbox/alice/f.c4gh",
        true,
    )
    .await
    .unwrap();
    assert_eq!(latest, "C2");
}

#[tokio::test]
async fn multi_match_requires_every_filepath() {
    let broker = MemoryBroker::with_default_topology();
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/inbox/alice/a.c4gh"),
        Some("CA".to_string()),
    )
    .await
    .unwrap();
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/inbox/alice/b.c4gh"),
        Some("CB".to_string()),
    )
    .await
    .unwrap();

    let paths = vec![
        "/inbox/alice/a.c4gh".to_string(),
        "/inbox/alice/b.c4gh".to_string(),
    ];
    let found = find_all_by_ownership(&broker, topology::QUEUE_FILES, "alice", &paths)
        .await
        .unwrap();
    assert_eq!(found["/inbox/alice/a.c4gh"], "CA");
    assert_eq!(found["/inbox/alice/b.c4gh"], "CB");

    // One of three missing: all-or-fail.
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/inbox/alice/a.c4gh"),
        Some("CA2".to_string()),
    )
    .await
    .unwrap();
    let paths = vec![
        "/inbox/alice/a.c4gh".to_string(),
        "/inbox/alice/missing.c4gh".to_string(),
    ];
    let err = find_all_by_ownership(&broker, topology::QUEUE_FILES, "alice", &paths)
        .await
        .unwrap_err();
    assert!(matches!(err, MqError::NoMatch));
}

#[tokio::test]
async fn checksum_match_reads_both_spellings() {
    let broker = MemoryBroker::with_default_topology();
    publish_event(
        &broker,
        "files",
        &json!({
            "user": "alice",
            "filepath": "/inbox/alice/f.c4gh",
            "encrypted_integrity": {"checksum": "aaa", "algorithm": "md5"}
        }),
        Some("C1".to_string()),
    )
    .await
    .unwrap();
    publish_event(
        &broker,
        "files",
        &json!({
            "user": "bob",
            "filepath": "/inbox/bob/g.c4gh",
            "encrypted_integrity": {"hash": "bbb", "algorithm": "sha256"}
        }),
        Some("C2".to_string()),
    )
    .await
    .unwrap();

    let by_checksum = find_by_checksum(&broker, topology::QUEUE_FILES, "aaa", false)
        .await
        .unwrap();
    assert_eq!(by_checksum, "C1");
    let by_hash = find_by_checksum(&broker, topology::QUEUE_FILES, "bbb", false)
        .await
        .unwrap();
    assert_eq!(by_hash, "C2");
}

#[tokio::test]
async fn correlation_dump_is_non_destructive() {
    let broker = MemoryBroker::with_default_topology();
    publish_event(
        &broker,
        "files.completed",
        &ingestion_event("alice", "/inbox/alice/f.c4gh"),
        Some("C1".to_string()),
    )
    .await
    .unwrap();

    let hit = fetch_by_correlation(&broker, topology::QUEUE_COMPLETED, "C1")
        .await
        .unwrap();
    assert_eq!(hit.correlation_id.as_deref(), Some("C1"));
    assert_eq!(hit.body["user"], "alice");
    // The match itself was nacked, not consumed.
    assert_eq!(broker.depth(topology::QUEUE_COMPLETED), 1);

    let err = fetch_by_correlation(&broker, topology::QUEUE_COMPLETED, "C9")
        .await
        .unwrap_err();
    assert!(matches!(err, MqError::NoMatch));
}

#[tokio::test]
async fn non_json_bodies_are_skipped_and_requeued() {
    let broker = MemoryBroker::with_default_topology();
    broker
        .publish(
            "files",
            b"not json at all",
            Properties {
                correlation_id: Some("C0".to_string()),
                content_type: None,
                persistent: true,
            },
        )
        .await
        .unwrap();
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/inbox/alice/f.c4gh"),
        Some("C1".to_string()),
    )
    .await
    .unwrap();

    let found = find_by_ownership(
        &broker,
        topology::QUEUE_FILES,
        "alice",
        "/inbox/alice/f.c4gh",
        false,
    )
    .await
    .unwrap();
    assert_eq!(found, "C1");
    assert_eq!(broker.depth(topology::QUEUE_FILES), 1);
}

#[tokio::test]
async fn purge_reports_counts_and_is_idempotent() {
    let broker = MemoryBroker::with_default_topology();
    publish_event(
        &broker,
        "files",
        &ingestion_event("alice", "/a"),
        None,
    )
    .await
    .unwrap();
    publish_event(
        &broker,
        "files.error",
        &ingestion_event("alice", "/a"),
        None,
    )
    .await
    .unwrap();

    let queues: Vec<String> = topology::QUEUES.iter().map(|q| q.to_string()).collect();
    let counts = purge_queues(&broker, &queues).await.unwrap();
    let total: u32 = counts.iter().map(|(_, count)| count).sum();
    assert_eq!(total, 2);

    let counts = purge_queues(&broker, &queues).await.unwrap();
    assert!(counts.iter().all(|(_, count)| *count == 0));
}
