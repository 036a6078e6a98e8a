//! Configuration for the kestrel console.
//!
//! TOML cluster profiles, credential resolution (env + plaintext), and
//! translation to `kestrel_core::ConnectionDetails`. Values are layered as
//! built-in defaults, then the config file, then `KESTREL_` environment
//! variables (nested keys separated by `__`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kestrel_core::{ConnectionDetails, SaslConfig, SaslProtocol, SchemaRegistryDetails};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no cluster named '{name}' in config")]
    UnknownCluster { name: String },

    #[error("no password configured for cluster '{cluster}'")]
    NoCredentials { cluster: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Cluster to connect to when none is named on the command line.
    pub default_cluster: Option<String>,

    /// UI defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named cluster profiles.
    #[serde(default)]
    pub clusters: BTreeMap<String, ClusterProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Maximum number of records fetched by one read.
    #[serde(default = "default_read_limit")]
    pub read_limit: usize,

    /// Tick interval of the event loop, in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            read_limit: default_read_limit(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_read_limit() -> usize {
    50
}
fn default_tick_rate_ms() -> u64 {
    250
}

/// A named cluster.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClusterProfile {
    /// Bootstrap addresses, `host:port`.
    pub bootstrap_servers: Vec<String>,

    /// Wrap the transport in TLS.
    #[serde(default)]
    pub ssl_enabled: bool,

    pub sasl: Option<SaslProfile>,

    pub schema_registry: Option<RegistryProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaslProfile {
    pub username: String,

    /// Plaintext password (prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// "plaintext" or "ssl".
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    "plaintext".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryProfile {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Resolve a cluster by name, falling back to `default_cluster` and then
    /// to the only configured cluster.
    pub fn cluster(&self, name: Option<&str>) -> Result<(&str, &ClusterProfile), ConfigError> {
        let wanted = name.or(self.default_cluster.as_deref());
        match wanted {
            Some(wanted) => self
                .clusters
                .get_key_value(wanted)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| ConfigError::UnknownCluster {
                    name: wanted.into(),
                }),
            None if self.clusters.len() == 1 => self
                .clusters
                .iter()
                .next()
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| ConfigError::UnknownCluster {
                    name: String::new(),
                }),
            None => Err(ConfigError::Validation {
                field: "default_cluster".into(),
                reason: format!(
                    "{} clusters configured and none selected",
                    self.clusters.len()
                ),
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "kestrel", "kestrel").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("kestrel");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KESTREL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to runtime types ────────────────────────────────────

/// Resolve the SASL password: `password_env` first, then plaintext.
pub fn resolve_password(sasl: &SaslProfile, cluster: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = sasl.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Some(ref pw) = sasl.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        cluster: cluster.into(),
    })
}

/// Build `ConnectionDetails` from a cluster profile.
pub fn profile_to_connection_details(
    profile: &ClusterProfile,
    cluster: &str,
) -> Result<ConnectionDetails, ConfigError> {
    let servers: Vec<&str> = profile
        .bootstrap_servers
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if servers.is_empty() {
        return Err(ConfigError::Validation {
            field: "bootstrap_servers".into(),
            reason: format!("cluster '{cluster}' has no bootstrap servers"),
        });
    }

    let mut details = ConnectionDetails::new(servers).with_ssl(profile.ssl_enabled);
    if let Some(ref sasl) = profile.sasl {
        let protocol =
            SaslProtocol::from_str(&sasl.protocol).map_err(|_| ConfigError::Validation {
                field: "sasl.protocol".into(),
                reason: format!("expected 'plaintext' or 'ssl', got '{}'", sasl.protocol),
            })?;
        details = details.with_sasl(SaslConfig {
            username: sasl.username.clone(),
            password: resolve_password(sasl, cluster)?,
            protocol,
        });
    }
    Ok(details)
}

/// Build `SchemaRegistryDetails` if the profile configures a registry.
pub fn profile_to_registry_details(
    profile: &ClusterProfile,
) -> Result<Option<SchemaRegistryDetails>, ConfigError> {
    let Some(ref registry) = profile.schema_registry else {
        return Ok(None);
    };
    let url: url::Url = registry
        .url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "schema_registry.url".into(),
            reason: format!("invalid URL: {}", registry.url),
        })?;
    Ok(Some(SchemaRegistryDetails {
        url,
        username: registry.username.clone(),
        password: registry.password.clone().map(SecretString::from),
    }))
}
