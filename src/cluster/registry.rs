//! In-memory cluster registry.
//!
//! # Responsibilities
//! - Hold the current set of named clusters
//! - Resolve clusters by exact name
//! - Accept wholesale replacement on config reload

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::cluster::{ClusterLookupError, ClusterResolver, NamedCluster};
use crate::config::ClusterConfig;

type ClusterMap = HashMap<String, Arc<NamedCluster>>;

/// Registry of named clusters shared between the router and the config watcher.
#[derive(Debug)]
pub struct ClusterRegistry {
    clusters: ArcSwap<ClusterMap>,
}

impl ClusterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            clusters: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Create a registry from configuration.
    pub fn from_config(configs: &[ClusterConfig]) -> Self {
        let registry = Self::new();
        registry.replace(configs);
        registry
    }

    /// Replace every cluster with the given configuration.
    pub fn replace(&self, configs: &[ClusterConfig]) {
        let map: ClusterMap = configs
            .iter()
            .map(|c| (c.name.clone(), Arc::new(NamedCluster::from(c))))
            .collect();
        tracing::debug!(clusters = map.len(), "Cluster registry updated");
        self.clusters.store(Arc::new(map));
    }

    /// Insert or overwrite a single cluster.
    pub fn insert(&self, cluster: NamedCluster) {
        self.clusters.rcu(|current| {
            let mut next = ClusterMap::clone(current);
            next.insert(cluster.name().to_string(), Arc::new(cluster.clone()));
            next
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<NamedCluster>> {
        self.clusters.load().get(name).cloned()
    }

    /// Registered cluster names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clusters.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// All clusters, sorted by name.
    pub fn clusters(&self) -> Vec<Arc<NamedCluster>> {
        let mut all: Vec<Arc<NamedCluster>> = self.clusters.load().values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn len(&self) -> usize {
        self.clusters.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClusterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterResolver for ClusterRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<NamedCluster>, ClusterLookupError> {
        self.get(name)
            .ok_or_else(|| ClusterLookupError::NotFound(name.to_string()))
    }
}
