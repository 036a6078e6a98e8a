// ── Schema registry domain types ──

use serde::{Deserialize, Serialize};

/// A registry subject and the versions registered under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub versions: Vec<u32>,
}

impl Subject {
    pub fn latest_version(&self) -> Option<u32> {
        self.versions.iter().copied().max()
    }
}

/// One registered schema version.
///
/// `err` is set when the version could not be fetched; the rest of the
/// listing is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub value: String,
    pub version: u32,
    pub err: Option<String>,
}
