//! Named-cluster subsystem.
//!
//! # Data Flow
//! ```text
//! [[clusters]] in config
//!     → registry.rs (name → NamedCluster, swappable snapshot)
//!     → ClusterResolver::resolve(name)
//!     → router compares NamedCluster::shim_identifier with its own shim id
//! ```
//!
//! # Design Decisions
//! - The router only looks clusters up; it never owns them
//! - Lookups are lock-free reads of an immutable snapshot
//! - A reload replaces the whole snapshot

pub mod registry;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::ClusterConfig;

pub use registry::ClusterRegistry;

/// A registered backend target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCluster {
    name: String,
    shim_identifier: Option<String>,
    hive_host: Option<String>,
    hive_port: Option<u16>,
}

impl NamedCluster {
    pub fn new(name: impl Into<String>, shim_identifier: Option<String>) -> Self {
        Self {
            name: name.into(),
            shim_identifier,
            hive_host: None,
            hive_port: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the shim this cluster requires.
    pub fn shim_identifier(&self) -> Option<&str> {
        self.shim_identifier.as_deref()
    }

    pub fn hive_host(&self) -> Option<&str> {
        self.hive_host.as_deref()
    }

    pub fn hive_port(&self) -> Option<u16> {
        self.hive_port
    }
}

impl From<&ClusterConfig> for NamedCluster {
    fn from(config: &ClusterConfig) -> Self {
        Self {
            name: config.name.clone(),
            shim_identifier: config.shim_identifier.clone(),
            hive_host: config.hive_host.clone(),
            hive_port: config.hive_port,
        }
    }
}

/// Errors raised while resolving the cluster a URL refers to.
#[derive(Debug, Error)]
pub enum ClusterLookupError {
    /// The URL carries no named-cluster parameter.
    #[error("URL does not reference a named cluster (missing '{parameter}')")]
    NoClusterReference { parameter: String },

    /// No cluster is registered under the name.
    #[error("Named cluster '{0}' not found")]
    NotFound(String),

    /// The registry could not be consulted.
    #[error("Cluster registry unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of named clusters by name.
pub trait ClusterResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<NamedCluster>, ClusterLookupError>;
}
