// Demo data for `SandboxCluster::with_demo_data`.

use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use super::SandboxCluster;
use crate::connection::SchemaRegistryDetails;
use crate::model::{ConsumerRecord, GroupMember, TopicPartitionOffset};

const TOPICS: [(&str, i32, i32); 6] = [
    ("audit-log", 1, 3),
    ("inventory.updates", 4, 2),
    ("orders", 3, 3),
    ("payments", 6, 3),
    ("shipments", 2, 2),
    ("users", 2, 1),
];

const ORDER_SCHEMAS: [&str; 3] = [
    r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"string"}]}"#,
    r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"string"},{"name":"amount","type":"double"}]}"#,
    r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"string"},{"name":"amount","type":"double"},{"name":"currency","type":"string","default":"EUR"}]}"#,
];

const USER_SCHEMA: &str =
    r#"{"type":"record","name":"User","fields":[{"name":"id","type":"long"},{"name":"email","type":"string"}]}"#;

pub(super) fn seed(cluster: &SandboxCluster) {
    for (name, partitions, replicas) in TOPICS {
        cluster.insert_topic(name, partitions, replicas);
    }

    let now = Utc::now();
    for i in 0..24_i64 {
        let partition = i32::try_from(i % 3).unwrap_or_default();
        append(
            cluster,
            "orders",
            partition,
            Some(format!("order-{i:04}")),
            format!(r#"{{"id":"order-{i:04}","amount":{}.50}}"#, 10 + i),
            now - ChronoDuration::minutes(24 - i),
        );
    }
    for i in 0..5_i64 {
        append(
            cluster,
            "audit-log",
            0,
            None,
            format!("user admin performed action #{i}"),
            now - ChronoDuration::hours(5 - i),
        );
    }

    cluster.insert_group(
        "billing-service",
        vec![member("billing-1", "10.0.4.12"), member("billing-2", "10.0.4.13")],
        vec![
            offset("orders", 0, 8),
            offset("orders", 1, 7),
            offset("orders", 2, 8),
            offset("payments", 0, 0),
        ],
    );
    cluster.insert_group(
        "analytics",
        Vec::new(),
        vec![offset("orders", 0, 3), offset("audit-log", 0, 5)],
    );
    cluster.insert_group(
        "shipping-tracker",
        vec![member("tracker", "10.0.7.2")],
        vec![offset("shipments", 0, 0), offset("shipments", 1, 0)],
    );

    for schema in ORDER_SCHEMAS {
        cluster.register_schema("orders-value", schema);
    }
    cluster.register_schema("users-value", USER_SCHEMA);

    if let Ok(url) = url::Url::parse("http://localhost:8081") {
        if let Ok(mut registry) = cluster.inner.registry.try_write() {
            *registry = Some(SchemaRegistryDetails {
                url,
                username: None,
                password: None,
            });
        }
    }
}

fn append(
    cluster: &SandboxCluster,
    topic: &str,
    partition: i32,
    key: Option<String>,
    value: String,
    timestamp: chrono::DateTime<Utc>,
) {
    let Some(mut state) = cluster.inner.topics.get_mut(topic) else {
        return;
    };
    let Some(log) = usize::try_from(partition)
        .ok()
        .and_then(|p| state.partitions.get_mut(p))
    else {
        return;
    };
    let offset = i64::try_from(log.len()).unwrap_or(i64::MAX);
    log.push(ConsumerRecord {
        partition,
        offset,
        key,
        value,
        timestamp,
    });
}

fn member(client_id: &str, host: &str) -> GroupMember {
    GroupMember {
        member_id: format!("{client_id}-{}", Uuid::new_v4()),
        client_id: client_id.to_string(),
        client_host: format!("/{host}"),
    }
}

fn offset(topic: &str, partition: i32, offset: i64) -> TopicPartitionOffset {
    TopicPartitionOffset {
        topic: topic.to_string(),
        partition,
        offset,
    }
}
