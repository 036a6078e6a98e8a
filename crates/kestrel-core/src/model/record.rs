// ── Record domain types ──

use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// A record to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerRecord {
    pub topic: String,
    pub key: Option<String>,
    pub value: String,
    pub partition: Option<i32>,
}

/// Where a published record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishResult {
    pub partition: i32,
    pub offset: i64,
}

/// Parameters of a bounded read from one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadDetails {
    pub topic: String,
    pub partition: i32,
    pub start_offset: i64,
    pub limit: usize,
}

/// A record read back from the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerRecord {
    pub partition: i32,
    pub offset: i64,
    pub key: Option<String>,
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

/// Lazy, finite, non-restartable sequence of records.
///
/// Yields at most `ReadDetails::limit` items, then ends.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<ConsumerRecord, AdminError>> + Send>>;
