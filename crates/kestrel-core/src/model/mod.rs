// ── Domain model ──
//
// Immutable snapshots handed from capabilities to the UI. A fresh listing
// always replaces the previous collection; nothing here is patched in place.

pub mod cgroup;
pub mod record;
pub mod schema;
pub mod topic;

pub use cgroup::{ConsumerGroup, GroupMember, TopicPartitionOffset};
pub use record::{ConsumerRecord, ProducerRecord, PublishResult, ReadDetails, RecordStream};
pub use schema::{Schema, Subject};
pub use topic::{ConfigEntry, ListedTopic, ResourceRef, TopicCreationDetails};
