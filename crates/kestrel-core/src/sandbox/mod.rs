// ── In-memory sandbox cluster ──
//
// A complete, process-local implementation of every admin capability.
// Backs the binary's offline mode and the test suites. Storage is lock-free
// (`DashMap`) so concurrently running commands never block each other.

mod demo;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::admin::{
    Admin, CGroupDeleter, CGroupLister, ConfigLister, ConfigUpdater, Instantiator, OffsetLister,
    Publisher, RecordReader, SchemaLister, SraSetter, SubjectLister, TopicCreator, TopicDeleter,
    TopicLister,
};
use crate::connection::{ConnectionDetails, SchemaRegistryDetails};
use crate::error::AdminError;
use crate::model::{
    ConsumerGroup, ConsumerRecord, GroupMember, ListedTopic, ProducerRecord, PublishResult,
    ReadDetails, RecordStream, ResourceRef, Schema, Subject, TopicCreationDetails,
    TopicPartitionOffset,
};

/// Config keys every sandbox topic starts with, in broker order.
const DEFAULT_TOPIC_CONFIGS: [(&str, &str); 6] = [
    ("cleanup.policy", "delete"),
    ("compression.type", "producer"),
    ("max.message.bytes", "1048588"),
    ("min.insync.replicas", "1"),
    ("retention.bytes", "-1"),
    ("retention.ms", "604800000"),
];

#[derive(Debug, Clone)]
struct TopicState {
    replicas: i32,
    partitions: Vec<Vec<ConsumerRecord>>,
    configs: IndexMap<String, String>,
}

impl TopicState {
    fn new(partition_count: i32, replicas: i32) -> Self {
        let partitions = (0..partition_count).map(|_| Vec::new()).collect();
        let configs = DEFAULT_TOPIC_CONFIGS
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self {
            replicas,
            partitions,
            configs,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::as_conversions)]
    fn partition_count(&self) -> i32 {
        self.partitions.len() as i32
    }
}

#[derive(Debug, Clone)]
struct GroupState {
    state: String,
    members: Vec<GroupMember>,
    offsets: Vec<TopicPartitionOffset>,
}

struct SandboxInner {
    topics: DashMap<String, TopicState>,
    groups: DashMap<String, GroupState>,
    subjects: DashMap<String, Vec<Schema>>,
    registry: RwLock<Option<SchemaRegistryDetails>>,
    latency: RwLock<Option<Duration>>,
    offline: AtomicBool,
    next_schema_id: AtomicU32,
}

/// In-memory cluster implementing the full [`Admin`] capability set.
///
/// Cheaply cloneable; clones share the same data.
#[derive(Clone)]
pub struct SandboxCluster {
    inner: Arc<SandboxInner>,
}

impl Default for SandboxCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxCluster {
    /// An empty cluster with no schema registry configured.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SandboxInner {
                topics: DashMap::new(),
                groups: DashMap::new(),
                subjects: DashMap::new(),
                registry: RwLock::new(None),
                latency: RwLock::new(None),
                offline: AtomicBool::new(false),
                next_schema_id: AtomicU32::new(100),
            }),
        }
    }

    /// A cluster pre-populated with topics, records, groups and schemas.
    pub fn with_demo_data() -> Self {
        let cluster = Self::new();
        demo::seed(&cluster);
        cluster
    }

    /// Builds an [`Instantiator`] handing out sessions onto this cluster.
    ///
    /// Every session shares the same data, so a reconnect sees prior writes.
    pub fn instantiator(&self) -> Instantiator {
        let cluster = self.clone();
        Arc::new(move |details: &ConnectionDetails| {
            if details.bootstrap_servers.is_empty() {
                return Err(AdminError::network("no bootstrap servers configured"));
            }
            if let Some(sasl) = &details.sasl {
                if sasl.username.is_empty() {
                    return Err(AdminError::Auth {
                        message: "SASL username must not be empty".into(),
                    });
                }
            }
            debug!(server = details.primary_server(), "opening sandbox session");
            Ok(Arc::new(cluster.clone()) as Arc<dyn Admin>)
        })
    }

    /// Delay every operation by `latency` (used to exercise timeouts).
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.inner.latency.write().await = latency;
    }

    /// Make every operation fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Insert a topic directly, bypassing validation.
    pub fn insert_topic(&self, name: impl Into<String>, partition_count: i32, replicas: i32) {
        self.inner
            .topics
            .insert(name.into(), TopicState::new(partition_count, replicas));
    }

    /// Insert or replace a consumer group.
    pub fn insert_group(
        &self,
        name: impl Into<String>,
        members: Vec<GroupMember>,
        offsets: Vec<TopicPartitionOffset>,
    ) {
        let state = if members.is_empty() { "Empty" } else { "Stable" };
        self.inner.groups.insert(
            name.into(),
            GroupState {
                state: state.into(),
                members,
                offsets,
            },
        );
    }

    /// Register a new version of a subject, returning its version number.
    pub fn register_schema(&self, subject: impl Into<String>, value: impl Into<String>) -> u32 {
        let id = self.inner.next_schema_id.fetch_add(1, Ordering::SeqCst);
        let mut versions = self.inner.subjects.entry(subject.into()).or_default();
        let version = versions.last().map_or(1, |s| s.version + 1);
        versions.push(Schema {
            id: id.to_string(),
            value: value.into(),
            version,
            err: None,
        });
        version
    }

    async fn enter(&self) -> Result<(), AdminError> {
        let latency = *self.inner.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(AdminError::network("cluster unreachable"));
        }
        Ok(())
    }

    fn topic_not_found(name: &str) -> AdminError {
        AdminError::not_found("Topic", name)
    }
}

fn pick_partition(key: Option<&str>, state: &TopicState) -> usize {
    match key {
        Some(key) => {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let slot = (hasher.finish() % state.partitions.len() as u64) as usize;
            slot
        }
        None => state
            .partitions
            .iter()
            .enumerate()
            .min_by_key(|(_, records)| records.len())
            .map_or(0, |(idx, _)| idx),
    }
}

// ── Capability implementations ───────────────────────────────────────

#[async_trait]
impl TopicLister for SandboxCluster {
    async fn list_topics(&self) -> Result<Vec<ListedTopic>, AdminError> {
        self.enter().await?;
        let mut topics: Vec<ListedTopic> = self
            .inner
            .topics
            .iter()
            .map(|entry| {
                ListedTopic::new(entry.key().clone(), entry.partition_count(), entry.replicas)
            })
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(topics)
    }
}

#[async_trait]
impl TopicCreator for SandboxCluster {
    async fn create_topic(&self, details: TopicCreationDetails) -> Result<(), AdminError> {
        self.enter().await?;
        if details.name.trim().is_empty() {
            return Err(AdminError::validation("topic name must not be empty"));
        }
        if details.partition_count < 1 {
            return Err(AdminError::validation("partition count must be at least 1"));
        }
        if details.replication_factor < 1 {
            return Err(AdminError::validation(
                "replication factor must be at least 1",
            ));
        }

        let entry = self.inner.topics.entry(details.name.clone());
        match entry {
            Entry::Occupied(_) => Err(AdminError::conflict(format!(
                "topic '{}' already exists",
                details.name
            ))),
            Entry::Vacant(slot) => {
                let mut state = TopicState::new(
                    details.partition_count,
                    i32::from(details.replication_factor),
                );
                for config in details.configs {
                    state.configs.insert(config.key, config.value);
                }
                slot.insert(state);
                debug!(topic = %details.name, "sandbox topic created");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl TopicDeleter for SandboxCluster {
    async fn delete_topic(&self, name: &str) -> Result<(), AdminError> {
        self.enter().await?;
        self.inner
            .topics
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::topic_not_found(name))
    }
}

#[async_trait]
impl Publisher for SandboxCluster {
    async fn publish(&self, record: ProducerRecord) -> Result<PublishResult, AdminError> {
        self.enter().await?;
        let mut topic = self
            .inner
            .topics
            .get_mut(&record.topic)
            .ok_or_else(|| Self::topic_not_found(&record.topic))?;

        let partition = match record.partition {
            Some(p) if p < 0 || p >= topic.partition_count() => {
                return Err(AdminError::validation(format!(
                    "partition {p} out of range for topic '{}'",
                    record.topic
                )));
            }
            #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
            Some(p) => p as usize,
            None => pick_partition(record.key.as_deref(), &topic),
        };

        let log = topic
            .partitions
            .get_mut(partition)
            .ok_or_else(|| AdminError::validation("partition out of range"))?;
        #[allow(clippy::cast_possible_wrap, clippy::as_conversions)]
        let offset = log.len() as i64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::as_conversions)]
        let partition = partition as i32;
        log.push(ConsumerRecord {
            partition,
            offset,
            key: record.key,
            value: record.value,
            timestamp: Utc::now(),
        });
        Ok(PublishResult { partition, offset })
    }
}

#[async_trait]
impl RecordReader for SandboxCluster {
    async fn read_records(&self, details: ReadDetails) -> Result<RecordStream, AdminError> {
        self.enter().await?;
        {
            let topic = self
                .inner
                .topics
                .get(&details.topic)
                .ok_or_else(|| Self::topic_not_found(&details.topic))?;
            if details.partition < 0 || details.partition >= topic.partition_count() {
                return Err(AdminError::not_found(
                    "Partition",
                    format!("{}/{}", details.topic, details.partition),
                ));
            }
        }

        let cluster = self.clone();
        let stream = async_stream::stream! {
            #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
            let partition = details.partition as usize;
            #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
            let mut next = details.start_offset.max(0) as usize;
            let mut yielded = 0;
            while yielded < details.limit {
                let record = cluster
                    .inner
                    .topics
                    .get(&details.topic)
                    .and_then(|t| t.partitions.get(partition).and_then(|p| p.get(next).cloned()));
                let Some(record) = record else {
                    break;
                };
                yield Ok(record);
                next += 1;
                yielded += 1;
            }
        };
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl OffsetLister for SandboxCluster {
    async fn list_offsets(&self, group: &str) -> Result<Vec<TopicPartitionOffset>, AdminError> {
        self.enter().await?;
        self.inner
            .groups
            .get(group)
            .map(|g| g.offsets.clone())
            .ok_or_else(|| AdminError::not_found("Consumer group", group))
    }
}

#[async_trait]
impl CGroupLister for SandboxCluster {
    async fn list_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, AdminError> {
        self.enter().await?;
        let mut groups: Vec<ConsumerGroup> = self
            .inner
            .groups
            .iter()
            .map(|entry| ConsumerGroup {
                name: entry.key().clone(),
                state: entry.state.clone(),
                members: entry.members.clone(),
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }
}

#[async_trait]
impl CGroupDeleter for SandboxCluster {
    async fn delete_consumer_group(&self, name: &str) -> Result<(), AdminError> {
        self.enter().await?;
        let removed = self
            .inner
            .groups
            .remove_if(name, |_, group| group.members.is_empty());
        if removed.is_some() {
            return Ok(());
        }
        if self.inner.groups.contains_key(name) {
            Err(AdminError::conflict(format!(
                "consumer group '{name}' still has active members"
            )))
        } else {
            Err(AdminError::not_found("Consumer group", name))
        }
    }
}

#[async_trait]
impl ConfigUpdater for SandboxCluster {
    async fn update_config(
        &self,
        resource: &ResourceRef,
        key: &str,
        value: &str,
    ) -> Result<(), AdminError> {
        self.enter().await?;
        let ResourceRef::Topic(name) = resource else {
            return Err(AdminError::not_found("Broker", resource.name()));
        };
        let mut topic = self
            .inner
            .topics
            .get_mut(name)
            .ok_or_else(|| Self::topic_not_found(name))?;
        if value.trim().is_empty() {
            return Err(AdminError::validation(format!("value for '{key}' is empty")));
        }
        let Some(slot) = topic.configs.get_mut(key) else {
            return Err(AdminError::validation(format!("unknown config key '{key}'")));
        };
        value.clone_into(slot);
        Ok(())
    }
}

#[async_trait]
impl ConfigLister for SandboxCluster {
    async fn list_configs(
        &self,
        resource: &ResourceRef,
    ) -> Result<IndexMap<String, String>, AdminError> {
        self.enter().await?;
        let ResourceRef::Topic(name) = resource else {
            return Err(AdminError::not_found("Broker", resource.name()));
        };
        self.inner
            .topics
            .get(name)
            .map(|t| t.configs.clone())
            .ok_or_else(|| Self::topic_not_found(name))
    }
}

#[async_trait]
impl SraSetter for SandboxCluster {
    async fn set_schema_registry(&self, details: SchemaRegistryDetails) -> Result<(), AdminError> {
        self.enter().await?;
        if details.username.is_some() && details.password.is_none() {
            return Err(AdminError::Auth {
                message: "schema registry password missing".into(),
            });
        }
        *self.inner.registry.write().await = Some(details);
        Ok(())
    }
}

#[async_trait]
impl SubjectLister for SandboxCluster {
    async fn list_subjects(&self) -> Result<Vec<Subject>, AdminError> {
        self.enter().await?;
        if self.inner.registry.read().await.is_none() {
            return Err(AdminError::not_found("Schema registry", "no registry configured"));
        }
        let mut subjects: Vec<Subject> = self
            .inner
            .subjects
            .iter()
            .map(|entry| Subject {
                name: entry.key().clone(),
                versions: entry.iter().map(|s| s.version).collect(),
            })
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }
}

#[async_trait]
impl SchemaLister for SandboxCluster {
    async fn list_versions(
        &self,
        subject: &str,
        versions: &[u32],
    ) -> Result<Vec<Schema>, AdminError> {
        self.enter().await?;
        let registered = self
            .inner
            .subjects
            .get(subject)
            .ok_or_else(|| AdminError::not_found("Subject", subject))?;
        Ok(versions
            .iter()
            .map(|version| {
                registered
                    .iter()
                    .find(|s| s.version == *version)
                    .cloned()
                    .unwrap_or_else(|| Schema {
                        id: String::new(),
                        value: String::new(),
                        version: *version,
                        err: Some(format!("version {version} not found")),
                    })
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    fn creation(name: &str, partitions: i32, replication: i16) -> TopicCreationDetails {
        TopicCreationDetails {
            name: name.into(),
            partition_count: partitions,
            replication_factor: replication,
            configs: vec![],
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_names() {
        let cluster = SandboxCluster::new();
        cluster.create_topic(creation("a", 1, 1)).await.unwrap();
        let err = cluster.create_topic(creation("a", 1, 1)).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn create_rejects_invalid_counts() {
        let cluster = SandboxCluster::new();
        for details in [creation("a", 0, 1), creation("b", 1, 0), creation(" ", 1, 1)] {
            let err = cluster.create_topic(details).await.unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Validation);
        }
        assert!(cluster.list_topics().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_applies_extra_configs() {
        let cluster = SandboxCluster::new();
        let mut details = creation("compacted", 1, 1);
        details
            .configs
            .push(crate::ConfigEntry::new("cleanup.policy", "compact"));
        cluster.create_topic(details).await.unwrap();

        let configs = cluster
            .list_configs(&ResourceRef::Topic("compacted".into()))
            .await
            .unwrap();
        assert_eq!(configs.get("cleanup.policy").unwrap(), "compact");
    }

    #[tokio::test]
    async fn publish_then_read_back_in_order() {
        let cluster = SandboxCluster::new();
        cluster.insert_topic("events", 1, 1);
        for i in 0..5 {
            let result = cluster
                .publish(ProducerRecord {
                    topic: "events".into(),
                    key: None,
                    value: format!("v{i}"),
                    partition: Some(0),
                })
                .await
                .unwrap();
            assert_eq!(result.offset, i);
        }

        let stream = cluster
            .read_records(ReadDetails {
                topic: "events".into(),
                partition: 0,
                start_offset: 1,
                limit: 3,
            })
            .await
            .unwrap();
        let values: Vec<String> = stream.map(|r| r.unwrap().value).collect().await;
        assert_eq!(values, vec!["v1", "v2", "v3"]);
    }

    #[tokio::test]
    async fn publish_to_missing_partition_is_rejected() {
        let cluster = SandboxCluster::new();
        cluster.insert_topic("events", 2, 1);
        let err = cluster
            .publish(ProducerRecord {
                topic: "events".into(),
                key: None,
                value: "x".into(),
                partition: Some(2),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn group_with_members_cannot_be_deleted() {
        let cluster = SandboxCluster::new();
        cluster.insert_group(
            "busy",
            vec![GroupMember {
                member_id: "m-1".into(),
                client_id: "c-1".into(),
                client_host: "/10.0.0.1".into(),
            }],
            vec![],
        );
        let err = cluster.delete_consumer_group("busy").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Conflict);

        let err = cluster.delete_consumer_group("ghost").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_config_requires_known_key() {
        let cluster = SandboxCluster::new();
        cluster.insert_topic("t", 1, 1);
        let topic = ResourceRef::Topic("t".into());

        cluster.update_config(&topic, "retention.ms", "1000").await.unwrap();
        let err = cluster.update_config(&topic, "nope", "1").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);

        let configs = cluster.list_configs(&topic).await.unwrap();
        assert_eq!(configs.get("retention.ms").unwrap(), "1000");
    }

    #[tokio::test]
    async fn offline_cluster_reports_network_errors() {
        let cluster = SandboxCluster::new();
        cluster.set_offline(true);
        let err = cluster.list_topics().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Network);
    }

    #[tokio::test]
    async fn missing_versions_carry_an_error() {
        let cluster = SandboxCluster::new();
        cluster.register_schema("s", "{}");
        let schemas = cluster.list_versions("s", &[1, 7]).await.unwrap();
        assert!(schemas[0].err.is_none());
        assert!(schemas[1].err.is_some());
    }
}
