//! Configuration file watcher for hot reload of named clusters.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::cluster::ClusterRegistry;
use crate::config::loader::load_config;

/// A watcher that monitors the configuration file and refreshes the cluster registry.
///
/// Only `[[clusters]]` are reloaded; the router identity is fixed at startup.
pub struct ConfigWatcher {
    path: PathBuf,
    registry: Arc<ClusterRegistry>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, registry: Arc<ClusterRegistry>) -> Self {
        Self {
            path: path.to_path_buf(),
            registry,
        }
    }

    /// Re-read the file and swap the registry contents.
    ///
    /// An invalid file leaves the registry untouched.
    pub fn reload(&self) -> bool {
        reload_into(&self.path, &self.registry)
    }

    /// Watch the file and reload the registry whenever it changes.
    ///
    /// The parent directory is watched and events are filtered by file name.
    /// `on_reload` runs on the watcher thread after each successful swap.
    /// Watching stops when the returned watcher is dropped.
    pub fn run<F>(self, on_reload: F) -> Result<RecommendedWatcher, notify::Error>
    where
        F: Fn(&ClusterRegistry) + Send + 'static,
    {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let Self { path, registry } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                if !event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    return;
                }
                tracing::debug!(path = ?path, kind = ?event.kind, "Config file changed");
                if reload_into(&path, &registry) {
                    on_reload(&registry);
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Watching config for cluster changes");
        Ok(watcher)
    }
}

fn reload_into(path: &Path, registry: &ClusterRegistry) -> bool {
    match load_config(path) {
        Ok(config) => {
            registry.replace(&config.clusters);
            tracing::info!(clusters = config.clusters.len(), "Cluster registry reloaded");
            true
        }
        Err(e) => {
            tracing::error!("Failed to reload config: {}. Keeping current clusters.", e);
            false
        }
    }
}
