//! Entry point: CLI parsing, tracing setup, panic hooks, session setup.
//!
//! Logs go to a file (default `/tmp/kestrel.log`); writing to stdout would
//! corrupt the terminal UI.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use kestrel_config::Config;
use kestrel_core::{ConnectionDetails, SandboxCluster, SchemaRegistryDetails};
use kestrel_tui::app::{App, Session};
use kestrel_tui::tui;

/// Terminal console for browsing and administering a streaming-data cluster.
#[derive(Parser, Debug)]
#[command(name = "kestrel", version, about)]
struct Cli {
    /// Cluster profile from the config file
    #[arg(short, long, env = "KESTREL_CLUSTER")]
    cluster: Option<String>,

    /// Ignore configured clusters and explore a seeded in-memory cluster
    #[arg(long)]
    sandbox: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/kestrel.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The guard must live as long as the app so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kestrel={log_level},kestrel_tui={log_level},kestrel_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("kestrel.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Connection details for the chosen cluster, or the sandbox profile when
/// none is configured.
fn resolve_cluster(
    cli: &Cli,
    config: &Config,
) -> Result<(ConnectionDetails, Option<SchemaRegistryDetails>)> {
    if cli.sandbox {
        return Ok((ConnectionDetails::new(["sandbox:9092"]), None));
    }
    if config.clusters.is_empty() && cli.cluster.is_none() {
        warn!("no clusters configured, using the sandbox");
        return Ok((ConnectionDetails::new(["sandbox:9092"]), None));
    }

    let (name, profile) = config.cluster(cli.cluster.as_deref())?;
    let details = kestrel_config::profile_to_connection_details(profile, name)?;
    let registry = kestrel_config::profile_to_registry_details(profile)?;
    info!(cluster = name, servers = ?details.bootstrap_servers, "using configured cluster");
    Ok((details, registry))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = kestrel_config::load_config().wrap_err_with(|| {
        format!(
            "failed to load {}",
            kestrel_config::config_path().display()
        )
    })?;
    let (details, registry) = resolve_cluster(&cli, &config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting kestrel");

    // The sandbox is the only admin backend compiled in; any other client
    // plugs in through the same instantiator.
    let cluster = SandboxCluster::with_demo_data();
    let session = Session {
        instantiator: cluster.instantiator(),
        details,
        registry,
        read_limit: config.defaults.read_limit,
        tick_rate: Duration::from_millis(config.defaults.tick_rate_ms),
    };

    let mut app = App::new(session)?;
    app.run().await?;

    Ok(())
}
