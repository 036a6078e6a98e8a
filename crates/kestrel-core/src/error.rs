// ── Admin error types ──
//
// User-facing failures of cluster operations. A client implementation maps
// its transport errors into one of these kinds; the UI never sees protocol
// codes. Failures travel as values inside an `ErrorEnvelope`, tagged with
// the operation that produced them.

use thiserror::Error;

/// Unified error type for cluster operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Operation timed out after {secs}s")]
    Timeout { secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },
}

/// Discriminant of [`AdminError`], for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ErrorKind {
    Network,
    Auth,
    Timeout,
    NotFound,
    Conflict,
    Validation,
}

impl AdminError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::Timeout {
            secs: after.as_secs(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }
}

/// Every cluster and schema registry capability, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum Operation {
    ListTopics,
    CreateTopic,
    DeleteTopic,
    Publish,
    ReadRecords,
    ListOffsets,
    ListConsumerGroups,
    DeleteConsumerGroup,
    UpdateConfig,
    ListConfigs,
    SetSchemaRegistryConnection,
    ListSubjects,
    ListVersions,
    Connect,
}

/// A failed operation, delivered to the UI as an ordinary message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed: {cause}")]
pub struct ErrorEnvelope {
    pub operation: Operation,
    #[source]
    pub cause: AdminError,
}

impl ErrorEnvelope {
    pub fn new(operation: Operation, cause: AdminError) -> Self {
        Self { operation, cause }
    }
}
