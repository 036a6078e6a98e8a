#![allow(clippy::unwrap_used)]
// Loading and saving config files.

use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use kestrel_config::{
    ClusterProfile, Config, RegistryProfile, SaslProfile, load_config_from,
    profile_to_connection_details, profile_to_registry_details, save_config_to,
};
use kestrel_core::SaslProtocol;

const SAMPLE: &str = r#"
default_cluster = "local"

[defaults]
read_limit = 20

[clusters.local]
bootstrap_servers = ["localhost:9092"]

[clusters.prod]
bootstrap_servers = ["broker-1:9093", "broker-2:9093"]
ssl_enabled = true

[clusters.prod.sasl]
username = "ops"
password_env = "KESTREL_PROD_PASSWORD"
protocol = "ssl"

[clusters.prod.schema_registry]
url = "https://registry.internal:8081"
username = "ops"
password = "registry-secret"
"#;

// Every test that loads runs inside a `Jail`, which serializes access to the
// process environment.

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.clusters.is_empty());
        assert_eq!(cfg.defaults.read_limit, 50);
        assert_eq!(cfg.defaults.tick_rate_ms, 250);
        Ok(())
    });
}

#[test]
fn test_file_values_and_env_overrides() {
    Jail::expect_with(|jail| {
        jail.create_file("kestrel.toml", SAMPLE)?;
        jail.set_env("KESTREL_DEFAULT_CLUSTER", "prod");
        jail.set_env("KESTREL_PROD_PASSWORD", "from-env");

        let cfg = load_config_from(Path::new("kestrel.toml")).unwrap();
        assert_eq!(cfg.defaults.read_limit, 20);

        let (name, profile) = cfg.cluster(None).unwrap();
        assert_eq!(name, "prod");

        let details = profile_to_connection_details(profile, name).unwrap();
        assert_eq!(details.bootstrap_servers, vec!["broker-1:9093", "broker-2:9093"]);
        assert!(details.ssl_enabled);
        let sasl = details.sasl.unwrap();
        assert_eq!(sasl.protocol, SaslProtocol::Ssl);
        assert_eq!(sasl.password.expose_secret(), "from-env");

        let registry = profile_to_registry_details(profile).unwrap().unwrap();
        assert_eq!(registry.url.host_str(), Some("registry.internal"));
        Ok(())
    });
}

#[test]
fn test_nested_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file("kestrel.toml", SAMPLE)?;
        jail.set_env("KESTREL_DEFAULTS__READ_LIMIT", "5");

        let cfg = load_config_from(Path::new("kestrel.toml")).unwrap();
        assert_eq!(cfg.defaults.read_limit, 5);
        Ok(())
    });
}

#[test]
fn test_save_then_load_keeps_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config {
        default_cluster: Some("staging".into()),
        ..Config::default()
    };
    cfg.clusters.insert(
        "staging".into(),
        ClusterProfile {
            bootstrap_servers: vec!["staging:9092".into()],
            ssl_enabled: false,
            sasl: Some(SaslProfile {
                username: "svc".into(),
                password: Some("pw".into()),
                password_env: None,
                protocol: "plaintext".into(),
            }),
            schema_registry: Some(RegistryProfile {
                url: "http://staging:8081".into(),
                username: None,
                password: None,
            }),
        },
    );
    save_config_to(&cfg, &path).unwrap();

    Jail::expect_with(|_jail| {
        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.cluster(None).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(profile.bootstrap_servers, vec!["staging:9092"]);
        assert_eq!(profile.sasl.as_ref().unwrap().username, "svc");
        Ok(())
    });
}

#[test]
fn test_invalid_registry_url_is_rejected() {
    let profile = ClusterProfile {
        bootstrap_servers: vec!["a:9092".into()],
        schema_registry: Some(RegistryProfile {
            url: "not a url".into(),
            username: None,
            password: None,
        }),
        ..ClusterProfile::default()
    };
    assert!(profile_to_registry_details(&profile).is_err());
}
