//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shim router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::jdbc::DEFAULT_CLUSTER_PARAMETER;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShimConfig {
    /// Identity of the router.
    pub router: RouterConfig,

    /// Named clusters the router may serve.
    pub clusters: Vec<ClusterConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Router identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Shim served by this router. Absent disables the router.
    pub shim_id: Option<String>,

    /// Whether this router is the default handler.
    pub default_configuration: bool,

    /// Session parameter that names the cluster in a URL.
    pub cluster_parameter: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            shim_id: None,
            default_configuration: true,
            cluster_parameter: DEFAULT_CLUSTER_PARAMETER.to_string(),
        }
    }
}

/// Named cluster definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    /// Unique cluster name referenced from URLs.
    pub name: String,

    /// Shim the cluster requires.
    #[serde(default)]
    pub shim_identifier: Option<String>,

    /// HiveServer2 host.
    #[serde(default)]
    pub hive_host: Option<String>,

    /// HiveServer2 port.
    #[serde(default)]
    pub hive_port: Option<u16>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
