// ── Admin capabilities ──
//
// One narrow trait per cluster operation. A client implementation provides
// all of them; UI components receive only the `Arc<dyn …>` they call, so a
// list page depends on its lister and a deleting page additionally on its
// deleter. Implementations are stateless from the UI's point of view beyond
// the connection they hold.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::connection::{ConnectionDetails, SchemaRegistryDetails};
use crate::error::AdminError;
use crate::model::{
    ConsumerGroup, ListedTopic, ProducerRecord, PublishResult, ReadDetails, RecordStream,
    ResourceRef, Schema, Subject, TopicCreationDetails, TopicPartitionOffset,
};

/// Lists every topic in the cluster.
#[async_trait]
pub trait TopicLister: Send + Sync {
    async fn list_topics(&self) -> Result<Vec<ListedTopic>, AdminError>;
}

/// Creates topics.
#[async_trait]
pub trait TopicCreator: Send + Sync {
    /// Fails with `Conflict` if the name exists and `Validation` on
    /// non-positive partition or replication counts.
    async fn create_topic(&self, details: TopicCreationDetails) -> Result<(), AdminError>;
}

/// Deletes topics.
#[async_trait]
pub trait TopicDeleter: Send + Sync {
    async fn delete_topic(&self, name: &str) -> Result<(), AdminError>;
}

/// Publishes single records.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, record: ProducerRecord) -> Result<PublishResult, AdminError>;
}

/// Reads bounded runs of records from one partition.
#[async_trait]
pub trait RecordReader: Send + Sync {
    /// The returned stream is lazy: nothing is fetched until it is polled.
    async fn read_records(&self, details: ReadDetails) -> Result<RecordStream, AdminError>;
}

/// Lists committed offsets of a consumer group.
#[async_trait]
pub trait OffsetLister: Send + Sync {
    async fn list_offsets(&self, group: &str) -> Result<Vec<TopicPartitionOffset>, AdminError>;
}

/// Lists consumer groups.
#[async_trait]
pub trait CGroupLister: Send + Sync {
    async fn list_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, AdminError>;
}

/// Deletes consumer groups.
#[async_trait]
pub trait CGroupDeleter: Send + Sync {
    /// Fails with `Conflict` while the group still has members.
    async fn delete_consumer_group(&self, name: &str) -> Result<(), AdminError>;
}

/// Updates a single config key of a resource.
#[async_trait]
pub trait ConfigUpdater: Send + Sync {
    async fn update_config(
        &self,
        resource: &ResourceRef,
        key: &str,
        value: &str,
    ) -> Result<(), AdminError>;
}

/// Lists the config of a resource, in broker order.
#[async_trait]
pub trait ConfigLister: Send + Sync {
    async fn list_configs(
        &self,
        resource: &ResourceRef,
    ) -> Result<IndexMap<String, String>, AdminError>;
}

/// Points the session at a schema registry.
#[async_trait]
pub trait SraSetter: Send + Sync {
    async fn set_schema_registry(&self, details: SchemaRegistryDetails) -> Result<(), AdminError>;
}

/// Lists schema registry subjects.
#[async_trait]
pub trait SubjectLister: Send + Sync {
    async fn list_subjects(&self) -> Result<Vec<Subject>, AdminError>;
}

/// Fetches specific versions of one subject.
#[async_trait]
pub trait SchemaLister: Send + Sync {
    async fn list_versions(&self, subject: &str, versions: &[u32])
    -> Result<Vec<Schema>, AdminError>;
}

/// The full capability set of one admin session.
pub trait Admin:
    TopicLister
    + TopicCreator
    + TopicDeleter
    + Publisher
    + RecordReader
    + OffsetLister
    + CGroupLister
    + CGroupDeleter
    + ConfigUpdater
    + ConfigLister
    + SraSetter
    + SubjectLister
    + SchemaLister
{
}

impl<T> Admin for T where
    T: TopicLister
        + TopicCreator
        + TopicDeleter
        + Publisher
        + RecordReader
        + OffsetLister
        + CGroupLister
        + CGroupDeleter
        + ConfigUpdater
        + ConfigLister
        + SraSetter
        + SubjectLister
        + SchemaLister
{
}

/// Builds an admin session from connection details.
///
/// Called once per session and again on every explicit reconnect; the
/// returned handle is never mutated in place.
pub type Instantiator =
    Arc<dyn Fn(&ConnectionDetails) -> Result<Arc<dyn Admin>, AdminError> + Send + Sync>;
