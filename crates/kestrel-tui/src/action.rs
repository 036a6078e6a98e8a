//! All possible UI messages. Actions are the sole mechanism for state mutation.
//!
//! Terminal input, navigation requests and admin results all travel as
//! `Action`s through the single render/update loop. Admin results are
//! produced by [`Command`]s running on the worker pool and come back as
//! ordinary values; failures arrive as [`Action::Error`].

use std::fmt;

use crossterm::event::KeyEvent;
use indexmap::IndexMap;
use uuid::Uuid;

use kestrel_core::{
    AdminError, ConsumerGroup, ConsumerRecord, ErrorEnvelope, ListedTopic, Operation,
    PublishResult, ResourceRef, Schema, Subject, TopicPartitionOffset,
};

use crate::command::Command;
use crate::tabs::TabId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A destructive operation waiting for the operator's go-ahead.
pub struct Confirm {
    pub prompt: String,
    pub command: Command,
}

impl Confirm {
    pub fn new(prompt: impl Into<String>, command: Command) -> Self {
        Self {
            prompt: prompt.into(),
            command,
        }
    }
}

impl fmt::Debug for Confirm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Confirm")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// "Listing started" notification of a two-phase operation.
///
/// Carries the completion command. Whoever receives this must take the
/// completion and dispatch it; until then the listing never finishes.
#[derive(Debug)]
pub struct ListingStarted {
    pub completion: Option<Command>,
}

impl ListingStarted {
    pub fn new(completion: Command) -> Self {
        Self {
            completion: Some(completion),
        }
    }
}

#[derive(Debug)]
pub enum Action {
    // ── Terminal ─────────────────────────────────────────────────────
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
    Quit,

    // ── Session ──────────────────────────────────────────────────────
    SwitchTab(TabId),
    Reconnect,
    Notify(Notification),
    RequestConfirm(Confirm),
    Error(ErrorEnvelope),

    // ── Navigation ───────────────────────────────────────────────────
    LoadTopicsPage,
    LoadCreateTopicPage,
    LoadTopicConfigsPage { topic: String },
    LoadPublishPage { topic: ListedTopic },
    LoadRecordsPage { topic: ListedTopic, partition: i32 },
    LoadCGroupsPage,
    LoadCGroupTopicsPage { group: ConsumerGroup },
    LoadSubjectsPage,
    LoadSchemaDetailsPage { subject: Subject },

    // ── Topics ───────────────────────────────────────────────────────
    TopicsListed(Vec<ListedTopic>),
    TopicCreated { name: String },
    TopicDeleted { name: String },
    Published { topic: String, result: PublishResult },
    RecordsReadStarted { read_id: Uuid, next: Option<Command> },
    RecordReceived {
        read_id: Uuid,
        record: ConsumerRecord,
        next: Option<Command>,
    },
    RecordsReadFinished { read_id: Uuid },
    ConfigsListed {
        resource: ResourceRef,
        configs: IndexMap<String, String>,
    },
    ConfigUpdated {
        resource: ResourceRef,
        key: String,
        value: String,
    },

    // ── Consumer groups ──────────────────────────────────────────────
    ConsumerGroupListingStarted(ListingStarted),
    ConsumerGroupsListed(Vec<ConsumerGroup>),
    ConsumerGroupDeleted { name: String },
    OffsetsListed {
        group: String,
        offsets: Vec<TopicPartitionOffset>,
    },

    // ── Schema registry ──────────────────────────────────────────────
    SchemaRegistryConnected,
    SubjectsListed(Vec<Subject>),
    SchemasListed { subject: String, schemas: Vec<Schema> },
}

impl Action {
    pub fn error(operation: Operation, cause: AdminError) -> Self {
        Self::Error(ErrorEnvelope::new(operation, cause))
    }

    /// The tab an action belongs to, if it is tab-scoped.
    ///
    /// Errors, keys and session actions return `None`; the app routes those
    /// itself.
    pub fn tab(&self) -> Option<TabId> {
        match self {
            Self::LoadTopicsPage
            | Self::LoadCreateTopicPage
            | Self::LoadTopicConfigsPage { .. }
            | Self::LoadPublishPage { .. }
            | Self::LoadRecordsPage { .. }
            | Self::TopicsListed(_)
            | Self::TopicCreated { .. }
            | Self::TopicDeleted { .. }
            | Self::Published { .. }
            | Self::RecordsReadStarted { .. }
            | Self::RecordReceived { .. }
            | Self::RecordsReadFinished { .. }
            | Self::ConfigsListed { .. }
            | Self::ConfigUpdated { .. } => Some(TabId::Topics),

            Self::LoadCGroupsPage
            | Self::LoadCGroupTopicsPage { .. }
            | Self::ConsumerGroupListingStarted(_)
            | Self::ConsumerGroupsListed(_)
            | Self::ConsumerGroupDeleted { .. }
            | Self::OffsetsListed { .. } => Some(TabId::ConsumerGroups),

            Self::LoadSubjectsPage
            | Self::LoadSchemaDetailsPage { .. }
            | Self::SchemaRegistryConnected
            | Self::SubjectsListed(_)
            | Self::SchemasListed { .. } => Some(TabId::SchemaRegistry),

            _ => None,
        }
    }

    /// Toast text for successful mutations.
    pub fn success_message(&self) -> Option<String> {
        match self {
            Self::TopicCreated { name } => Some(format!("Topic {name} created")),
            Self::TopicDeleted { name } => Some(format!("Topic {name} deleted")),
            Self::Published { topic, result } => Some(format!(
                "Published to {topic}/{} @ {}",
                result.partition, result.offset
            )),
            Self::ConfigUpdated { key, value, .. } => Some(format!("{key} set to {value}")),
            Self::ConsumerGroupDeleted { name } => Some(format!("Consumer group {name} deleted")),
            _ => None,
        }
    }
}
