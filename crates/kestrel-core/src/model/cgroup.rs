// ── Consumer group domain types ──

use serde::{Deserialize, Serialize};

/// A member of a consumer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
}

/// A consumer group and its current members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroup {
    pub name: String,
    pub state: String,
    pub members: Vec<GroupMember>,
}

impl ConsumerGroup {
    pub fn is_active(&self) -> bool {
        !self.members.is_empty()
    }
}

/// Committed offset of a group on one topic partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPartitionOffset {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}
