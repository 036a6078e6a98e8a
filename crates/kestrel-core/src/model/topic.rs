// ── Topic domain types ──

use serde::{Deserialize, Serialize};

/// A topic as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedTopic {
    pub name: String,
    pub partition_count: i32,
    pub replicas: i32,
}

impl ListedTopic {
    pub fn new(name: impl Into<String>, partition_count: i32, replicas: i32) -> Self {
        Self {
            name: name.into(),
            partition_count,
            replicas,
        }
    }
}

/// One configuration key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parameters of a topic creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCreationDetails {
    pub name: String,
    pub partition_count: i32,
    pub replication_factor: i16,
    pub configs: Vec<ConfigEntry>,
}

/// The resource a config operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Topic(String),
    Broker(i32),
}

impl ResourceRef {
    pub fn name(&self) -> String {
        match self {
            Self::Topic(name) => name.clone(),
            Self::Broker(id) => id.to_string(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic(name) => write!(f, "topic {name}"),
            Self::Broker(id) => write!(f, "broker {id}"),
        }
    }
}
