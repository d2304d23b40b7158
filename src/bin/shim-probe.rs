//! Inspect routing decisions for a connection string.
//!
//! Loads the router identity and named clusters from a TOML file, wraps the
//! dry-run echo driver and reports what the router would do with a URL.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use hive_shim_router::cluster::{ClusterRegistry, NamedCluster};
use hive_shim_router::config::watcher::ConfigWatcher;
use hive_shim_router::config::{load_config, ShimConfig};
use hive_shim_router::driver::echo::{EchoConnection, EchoDriver};
use hive_shim_router::driver::{Driver, Properties};
use hive_shim_router::observability::logging;
use hive_shim_router::routing::{Routed, ShimRouter};

#[derive(Parser)]
#[command(name = "shim-probe")]
#[command(about = "Inspect Hive shim routing decisions", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the router's shim id.
    #[arg(long)]
    shim_id: Option<String>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cheap acceptance checks only
    Check { url: String },
    /// Route a dry-run connect through the echo driver
    Route {
        url: String,
        /// Connection property, repeatable
        #[arg(short = 'p', long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// List configured clusters
    Clusters,
    /// Re-route a URL every time the config file changes
    Watch { url: String },
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ShimConfig::default(),
    };
    if let Some(shim_id) = cli.shim_id {
        config.router.shim_id = Some(shim_id);
    }

    logging::init(cli.log_level.as_deref().unwrap_or(&config.observability.log_level));
    tracing::debug!(
        shim_id = ?config.router.shim_id,
        clusters = config.clusters.len(),
        "Configuration loaded"
    );

    let registry = Arc::new(ClusterRegistry::from_config(&config.clusters));
    let router = Arc::new(ShimRouter::from_config(
        &config.router,
        Box::new(EchoDriver::new()),
        registry.clone(),
    ));

    let report = match cli.command {
        Commands::Check { url } => {
            json!({
                "url": url,
                "eligible": router.is_eligible(&url),
                "delegate_selected": router.select_delegate(&url).is_some(),
                "accepts_url": router.accepts_url(&url)?,
            })
        }
        Commands::Route { url, properties } => {
            let properties: Properties = properties.into_iter().collect();
            route_report(&router, &url, &properties)
        }
        Commands::Clusters => {
            let clusters: Vec<NamedCluster> = registry.clusters().iter().map(|c| NamedCluster::clone(c)).collect();
            serde_json::to_value(clusters)?
        }
        Commands::Watch { url } => {
            let path = cli.config.clone().ok_or("watch requires --config")?;
            print_report(&route_report(&router, &url, &Properties::new()))?;

            let router = Arc::clone(&router);
            let _watcher = ConfigWatcher::new(&path, registry).run(move |_| {
                if let Err(e) = print_report(&route_report(&router, &url, &Properties::new())) {
                    tracing::error!(error = %e, "Failed to write report");
                }
            })?;
            loop {
                std::thread::park();
            }
        }
    };

    print_report(&report)?;
    Ok(())
}

fn print_report(report: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn route_report(router: &ShimRouter, url: &str, properties: &Properties) -> Value {
    match router.route(url, properties) {
        Ok(Routed::Connected(conn)) => {
            let context = conn
                .as_any()
                .downcast_ref::<EchoConnection>()
                .and_then(EchoConnection::context)
                .map(str::to_string);
            json!({
                "url": url,
                "outcome": "connected",
                "forwarded_url": conn.url(),
                "context": context,
            })
        }
        Ok(Routed::Declined(reason)) => json!({
            "url": url,
            "outcome": "declined",
            "reason": reason,
        }),
        Err(e) => {
            let mut causes = Vec::new();
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                causes.push(cause.to_string());
                source = std::error::Error::source(cause);
            }
            json!({
                "url": url,
                "outcome": "error",
                "error": e.to_string(),
                "sql_state": e.sql_state(),
                "causes": causes,
            })
        }
    }
}
