//! Shared utilities for routing integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hive_shim_router::cluster::{ClusterLookupError, ClusterRegistry, ClusterResolver, NamedCluster};
use hive_shim_router::driver::{Connection, Driver, DriverPropertyInfo, ParentLogger, Properties};
use hive_shim_router::error::{SqlError, SqlResult};
use hive_shim_router::jdbc::HiveUrlParser;
use hive_shim_router::routing::context;
use hive_shim_router::routing::{RouterIdentity, ShimRouter};

pub const SHIM: &str = "cdh514";

/// Connection handed out by [`SpyDriver`].
#[derive(Debug)]
pub struct TestConnection {
    pub url: String,
}

impl Connection for TestConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn test_connection(url: &str) -> Box<dyn Connection> {
    Box::new(TestConnection { url: url.to_string() })
}

/// Everything a [`SpyDriver`] observed.
#[derive(Debug, Default)]
pub struct SpyLog {
    pub connect_calls: AtomicUsize,
    pub accepts_calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
    pub properties: Mutex<Vec<Properties>>,
    pub contexts: Mutex<Vec<Option<String>>>,
}

impl SpyLog {
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn accepts_calls(&self) -> usize {
        self.accepts_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.connect_calls() + self.accepts_calls()
    }

    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }

    pub fn last_context(&self) -> Option<String> {
        self.contexts.lock().unwrap().last().cloned().flatten()
    }
}

type ConnectFn = Box<dyn Fn(&str) -> SqlResult<Option<Box<dyn Connection>>> + Send + Sync>;
type AcceptsFn = Box<dyn Fn(&str) -> SqlResult<bool> + Send + Sync>;
type CompliantFn = Box<dyn Fn() -> SqlResult<bool> + Send + Sync>;
type LoggerFn = Box<dyn Fn() -> SqlResult<Option<ParentLogger>> + Send + Sync>;

/// Programmable delegate that records every call.
pub struct SpyDriver {
    log: Arc<SpyLog>,
    on_accepts: AcceptsFn,
    on_connect: ConnectFn,
    on_jdbc_compliant: CompliantFn,
    on_parent_logger: LoggerFn,
}

impl SpyDriver {
    /// A delegate that accepts everything and connects successfully.
    pub fn new() -> (Self, Arc<SpyLog>) {
        let log = Arc::new(SpyLog::default());
        let driver = Self {
            log: Arc::clone(&log),
            on_accepts: Box::new(|_: &str| Ok(true)),
            on_connect: Box::new(|url: &str| Ok(Some(test_connection(url)))),
            on_jdbc_compliant: Box::new(|| Ok(true)),
            on_parent_logger: Box::new(|| Ok(Some(ParentLogger::new("spy")))),
        };
        (driver, log)
    }

    pub fn rejecting(self) -> Self {
        self.on_accepts(|_| Ok(false))
    }

    pub fn on_accepts<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> SqlResult<bool> + Send + Sync + 'static,
    {
        self.on_accepts = Box::new(f);
        self
    }

    pub fn on_connect<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> SqlResult<Option<Box<dyn Connection>>> + Send + Sync + 'static,
    {
        self.on_connect = Box::new(f);
        self
    }

    pub fn on_jdbc_compliant<F>(mut self, f: F) -> Self
    where
        F: Fn() -> SqlResult<bool> + Send + Sync + 'static,
    {
        self.on_jdbc_compliant = Box::new(f);
        self
    }

    pub fn on_parent_logger<F>(mut self, f: F) -> Self
    where
        F: Fn() -> SqlResult<Option<ParentLogger>> + Send + Sync + 'static,
    {
        self.on_parent_logger = Box::new(f);
        self
    }
}

impl Driver for SpyDriver {
    fn connect(&self, url: &str, properties: &Properties) -> SqlResult<Option<Box<dyn Connection>>> {
        self.log.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.log.urls.lock().unwrap().push(url.to_string());
        self.log.properties.lock().unwrap().push(properties.clone());
        self.log
            .contexts
            .lock()
            .unwrap()
            .push(context::current().map(|c| c.to_string()));
        (self.on_connect)(url)
    }

    fn accepts_url(&self, url: &str) -> SqlResult<bool> {
        self.log.accepts_calls.fetch_add(1, Ordering::SeqCst);
        (self.on_accepts)(url)
    }

    fn property_info(&self, url: &str, _properties: &Properties) -> SqlResult<Vec<DriverPropertyInfo>> {
        Ok(vec![DriverPropertyInfo::new("url", Some(url.to_string()))])
    }

    fn major_version(&self) -> i32 {
        3
    }

    fn minor_version(&self) -> i32 {
        1
    }

    fn jdbc_compliant(&self) -> SqlResult<bool> {
        (self.on_jdbc_compliant)()
    }

    fn parent_logger(&self) -> SqlResult<Option<ParentLogger>> {
        (self.on_parent_logger)()
    }
}

/// Resolver whose backing store is always unavailable.
pub struct UnavailableResolver;

impl ClusterResolver for UnavailableResolver {
    fn resolve(&self, _name: &str) -> Result<Arc<NamedCluster>, ClusterLookupError> {
        Err(ClusterLookupError::Unavailable("metastore offline".into()))
    }
}

/// Registry with `prod` on [`SHIM`], `legacy` on `hdp26`, `upper` on `CDH514`
/// and `bare` with no shim identifier.
pub fn registry() -> Arc<ClusterRegistry> {
    let registry = ClusterRegistry::new();
    registry.insert(NamedCluster::new("prod", Some(SHIM.into())));
    registry.insert(NamedCluster::new("legacy", Some("hdp26".into())));
    registry.insert(NamedCluster::new("upper", Some("CDH514".into())));
    registry.insert(NamedCluster::new("bare", None));
    Arc::new(registry)
}

pub fn router_with(driver: SpyDriver, identity: RouterIdentity, resolver: Arc<dyn ClusterResolver>) -> ShimRouter {
    ShimRouter::new(Box::new(driver), identity, Arc::new(HiveUrlParser::new(resolver)))
}

/// Default-configuration router on [`SHIM`] over [`registry`].
pub fn router(driver: SpyDriver) -> ShimRouter {
    router_with(driver, RouterIdentity::new(SHIM), registry())
}

pub fn cluster_url(cluster: &str) -> String {
    format!("jdbc:hive2://hive.example:10000/default;pentahoNamedCluster={}", cluster)
}

pub fn not_supported(message: &str) -> SqlError {
    SqlError::with_state(message, hive_shim_router::error::SQL_STATE_NOT_SUPPORTED)
}
