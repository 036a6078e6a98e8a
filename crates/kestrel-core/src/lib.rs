//! Domain layer between a streaming-data cluster and the kestrel console.
//!
//! This crate owns everything the UI needs to know about a cluster without
//! knowing how to talk to one:
//!
//! - **Capability traits** ([`admin`]): one narrow, object-safe trait per
//!   administrative operation ([`TopicLister`], [`TopicDeleter`],
//!   [`CGroupLister`], ...). Pages depend only on the capabilities they use;
//!   [`Admin`] bundles all of them into the session handle.
//!
//! - **[`ConnectionDetails`]**: bootstrap servers, optional SASL credentials
//!   and TLS flag. Handed to an [`Instantiator`] once per session.
//!
//! - **Error taxonomy** ([`AdminError`], [`ErrorEnvelope`]): every failure is
//!   a value tagged with the [`Operation`] that produced it.
//!
//! - **Domain model** ([`model`]): immutable snapshots of topics, consumer
//!   groups, schemas, configs and records.
//!
//! - **[`SandboxCluster`]**: an in-memory cluster implementing every
//!   capability, used for offline exploration and tests.

pub mod admin;
pub mod connection;
pub mod error;
pub mod model;
pub mod sandbox;

use std::time::Duration;

/// Upper bound for any single cluster operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Primary re-exports ──────────────────────────────────────────────
pub use admin::{
    Admin, CGroupDeleter, CGroupLister, ConfigLister, ConfigUpdater, Instantiator, OffsetLister,
    Publisher, RecordReader, SchemaLister, SraSetter, SubjectLister, TopicCreator, TopicDeleter,
    TopicLister,
};
pub use connection::{ConnectionDetails, SaslConfig, SaslProtocol, SchemaRegistryDetails};
pub use error::{AdminError, ErrorEnvelope, ErrorKind, Operation};
pub use sandbox::SandboxCluster;

pub use model::{
    ConfigEntry, ConsumerGroup, ConsumerRecord, GroupMember, ListedTopic, ProducerRecord,
    PublishResult, ReadDetails, RecordStream, ResourceRef, Schema, Subject,
    TopicCreationDetails, TopicPartitionOffset,
};
