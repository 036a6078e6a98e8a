#![allow(clippy::unwrap_used)]
// Integration tests for `SandboxCluster` driven through the capability traits.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use pretty_assertions::assert_eq;

use kestrel_core::{
    Admin, CGroupLister, ConnectionDetails, ErrorKind, OffsetLister, ReadDetails, RecordReader,
    SandboxCluster, SchemaLister, SubjectLister, TopicDeleter, TopicLister,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn session(cluster: &SandboxCluster) -> Arc<dyn Admin> {
    let instantiate = cluster.instantiator();
    instantiate(&ConnectionDetails::new(["localhost:9092"])).unwrap()
}

// ── Session tests ───────────────────────────────────────────────────

#[test]
fn test_instantiator_requires_bootstrap_servers() {
    let cluster = SandboxCluster::new();
    let instantiate = cluster.instantiator();
    let err = instantiate(&ConnectionDetails::new(Vec::<String>::new()))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_sessions_share_cluster_state() {
    let cluster = SandboxCluster::new();
    cluster.insert_topic("shared", 1, 1);

    let first = session(&cluster);
    first.delete_topic("shared").await.unwrap();

    let second = session(&cluster);
    assert!(second.list_topics().await.unwrap().is_empty());
}

// ── Topic tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_demo_topics_are_listed_by_name() {
    let admin = session(&SandboxCluster::with_demo_data());
    let names: Vec<String> = admin
        .list_topics()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&"orders".to_string()));
}

#[tokio::test]
async fn test_delete_unknown_topic_leaves_listing_unchanged() {
    let admin = session(&SandboxCluster::with_demo_data());
    let before = admin.list_topics().await.unwrap();

    let err = admin.delete_topic("does-not-exist").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(admin.list_topics().await.unwrap(), before);
}

#[tokio::test]
async fn test_read_stops_at_end_of_partition() {
    let admin = session(&SandboxCluster::with_demo_data());
    let stream = admin
        .read_records(ReadDetails {
            topic: "audit-log".into(),
            partition: 0,
            start_offset: 3,
            limit: 100,
        })
        .await
        .unwrap();
    let offsets: Vec<i64> = stream.map(|r| r.unwrap().offset).collect().await;
    assert_eq!(offsets, vec![3, 4]);
}

#[tokio::test]
async fn test_read_unknown_partition_is_not_found() {
    let admin = session(&SandboxCluster::with_demo_data());
    let err = admin
        .read_records(ReadDetails {
            topic: "audit-log".into(),
            partition: 9,
            start_offset: 0,
            limit: 1,
        })
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ── Group and registry tests ────────────────────────────────────────

#[tokio::test]
async fn test_demo_groups_have_offsets() {
    let admin = session(&SandboxCluster::with_demo_data());
    let groups = admin.list_consumer_groups().await.unwrap();
    assert!(groups.iter().any(|g| g.is_active()));
    assert!(groups.iter().any(|g| !g.is_active()));

    let offsets = admin.list_offsets("billing-service").await.unwrap();
    assert!(offsets.iter().any(|o| o.topic == "orders"));
}

#[tokio::test]
async fn test_subjects_require_registry() {
    let admin = session(&SandboxCluster::new());
    let err = admin.list_subjects().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_demo_subject_versions_resolve() {
    let admin = session(&SandboxCluster::with_demo_data());
    let subjects = admin.list_subjects().await.unwrap();
    let orders = subjects.iter().find(|s| s.name == "orders-value").unwrap();
    assert_eq!(orders.latest_version(), Some(3));

    let schemas = admin
        .list_versions("orders-value", &orders.versions)
        .await
        .unwrap();
    assert_eq!(schemas.len(), 3);
    assert!(schemas.iter().all(|s| s.err.is_none()));
}

// ── Latency ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_latency_delays_operations() {
    let cluster = SandboxCluster::new();
    cluster.set_latency(Some(Duration::from_secs(30))).await;
    let admin = session(&cluster);

    let result = tokio::time::timeout(Duration::from_secs(10), admin.list_topics()).await;
    assert!(result.is_err());
}
