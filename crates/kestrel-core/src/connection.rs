// ── Runtime connection details ──
//
// These types describe *how* to reach a cluster and its schema registry.
// They carry credential data but never touch disk. The config crate builds
// them and the application root owns them for the lifetime of a session.

use secrecy::SecretString;
use url::Url;

/// SASL mechanism transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SaslProtocol {
    #[default]
    Plaintext,
    Ssl,
}

/// SASL credential pair.
#[derive(Debug, Clone)]
pub struct SaslConfig {
    pub username: String,
    pub password: SecretString,
    pub protocol: SaslProtocol,
}

/// Everything needed to open an admin session against one cluster.
///
/// Immutable once built; a reconnect builds a fresh value.
#[derive(Debug, Clone)]
pub struct ConnectionDetails {
    /// Ordered bootstrap addresses (`host:port`).
    pub bootstrap_servers: Vec<String>,
    /// Optional SASL credentials.
    pub sasl: Option<SaslConfig>,
    /// Whether the transport is wrapped in TLS.
    pub ssl_enabled: bool,
}

impl ConnectionDetails {
    pub fn new(bootstrap_servers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into_iter().map(Into::into).collect(),
            sasl: None,
            ssl_enabled: false,
        }
    }

    #[must_use]
    pub fn with_sasl(mut self, sasl: SaslConfig) -> Self {
        self.sasl = Some(sasl);
        self
    }

    #[must_use]
    pub fn with_ssl(mut self, enabled: bool) -> Self {
        self.ssl_enabled = enabled;
        self
    }

    /// First bootstrap address, used as a display label.
    pub fn primary_server(&self) -> &str {
        self.bootstrap_servers.first().map_or("", String::as_str)
    }
}

/// Schema registry endpoint and optional basic-auth credentials.
#[derive(Debug, Clone)]
pub struct SchemaRegistryDetails {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn builder_keeps_server_order() {
        let details = ConnectionDetails::new(["b:9092", "a:9092"]).with_ssl(true);
        assert_eq!(details.bootstrap_servers, vec!["b:9092", "a:9092"]);
        assert_eq!(details.primary_server(), "b:9092");
        assert!(details.ssl_enabled);
        assert!(details.sasl.is_none());
    }

    #[test]
    fn primary_server_of_empty_list_is_blank() {
        let details = ConnectionDetails::new(Vec::<String>::new());
        assert_eq!(details.primary_server(), "");
    }

    #[test]
    fn sasl_protocol_parses_snake_case() {
        assert_eq!(SaslProtocol::from_str("ssl").ok(), Some(SaslProtocol::Ssl));
        assert_eq!(SaslProtocol::Plaintext.to_string(), "plaintext");
    }
}
