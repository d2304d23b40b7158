//! Connection routing and dispatch.
//!
//! # Responsibilities
//! - Decide whether a connection string belongs to this shim at all
//! - Match the URL's named cluster against the router's shim identity
//! - Forward accepted connects to the delegate inside the shim's context
//! - Turn the delegate's "not supported" failures into declines
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Declines are values (`Routed::Declined`), never errors
//! - Parse failures are errors; lookup failures are declines
//! - The delegate receives the canonical URL, not the raw string

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cluster::{ClusterResolver, NamedCluster};
use crate::config::RouterConfig;
use crate::driver::{Connection, Driver, DriverPropertyInfo, ParentLogger, Properties};
use crate::error::{chain_reports_not_supported, SqlError, SqlErrorKind, SqlResult};
use crate::jdbc::{HiveUrlParser, JdbcUrlParser};
use crate::observability::metrics;
use crate::routing::context::{ContextGuard, ExecutionContext};
use crate::routing::matcher::{MarkerMatcher, SchemeSegmentMatcher, UrlMatcher};

/// Configuration baked into a router at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterIdentity {
    /// Shim this router serves. `None` disables the router.
    pub shim_id: Option<String>,
    /// Only the default-configuration router accepts URLs.
    pub default_configuration: bool,
}

impl RouterIdentity {
    pub fn new(shim_id: impl Into<String>) -> Self {
        Self {
            shim_id: Some(shim_id.into()),
            default_configuration: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            shim_id: None,
            default_configuration: false,
        }
    }
}

impl From<&RouterConfig> for RouterIdentity {
    fn from(config: &RouterConfig) -> Self {
        Self {
            shim_id: config.shim_id.clone(),
            default_configuration: config.default_configuration,
        }
    }
}

/// Why a router declined a connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    /// Router disabled or URL outside the driver family.
    NotEligible,
    /// URL carries a marker of a sibling driver family.
    SiblingDriver,
    /// No delegate is configured.
    NoDelegate,
    /// Router is not the default-configuration instance.
    NotDefaultConfiguration,
    /// The named cluster could not be resolved.
    ClusterUnresolved,
    /// The cluster requires a different shim.
    ShimMismatch,
    /// The delegate does not accept the URL.
    DelegateRejected,
    /// The delegate returned no connection.
    DelegateDeclined,
    /// The delegate reported SQL state 0A000.
    NotSupported,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::NotEligible => "not_eligible",
            DeclineReason::SiblingDriver => "sibling_driver",
            DeclineReason::NoDelegate => "no_delegate",
            DeclineReason::NotDefaultConfiguration => "not_default_configuration",
            DeclineReason::ClusterUnresolved => "cluster_unresolved",
            DeclineReason::ShimMismatch => "shim_mismatch",
            DeclineReason::DelegateRejected => "delegate_rejected",
            DeclineReason::DelegateDeclined => "delegate_declined",
            DeclineReason::NotSupported => "not_supported",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a routed connect.
#[derive(Debug)]
pub enum Routed {
    Connected(Box<dyn Connection>),
    Declined(DeclineReason),
}

impl Routed {
    pub fn into_connection(self) -> Option<Box<dyn Connection>> {
        match self {
            Routed::Connected(conn) => Some(conn),
            Routed::Declined(_) => None,
        }
    }

    pub fn decline_reason(&self) -> Option<DeclineReason> {
        match self {
            Routed::Connected(_) => None,
            Routed::Declined(reason) => Some(*reason),
        }
    }
}

/// Driver wrapper that routes Hive connections to the shim they belong to.
pub struct ShimRouter {
    identity: RouterIdentity,
    delegate: Option<Box<dyn Driver>>,
    parser: Arc<dyn JdbcUrlParser>,
    context: Arc<ExecutionContext>,
    scheme: SchemeSegmentMatcher,
    sibling: MarkerMatcher,
}

impl ShimRouter {
    /// Create a router around `delegate`.
    pub fn new(delegate: Box<dyn Driver>, identity: RouterIdentity, parser: Arc<dyn JdbcUrlParser>) -> Self {
        Self::build(Some(delegate), identity, parser)
    }

    /// Create a router with no delegate; it declines everything.
    pub fn without_delegate(identity: RouterIdentity, parser: Arc<dyn JdbcUrlParser>) -> Self {
        Self::build(None, identity, parser)
    }

    /// Create a router from configuration, resolving clusters through `resolver`.
    pub fn from_config(config: &RouterConfig, delegate: Box<dyn Driver>, resolver: Arc<dyn ClusterResolver>) -> Self {
        let parser = HiveUrlParser::with_cluster_parameter(resolver, config.cluster_parameter.clone());
        Self::new(delegate, RouterIdentity::from(config), Arc::new(parser))
    }

    fn build(delegate: Option<Box<dyn Driver>>, identity: RouterIdentity, parser: Arc<dyn JdbcUrlParser>) -> Self {
        let context = Arc::new(ExecutionContext::new(env!("CARGO_PKG_NAME"), identity.shim_id.clone()));
        Self {
            identity,
            delegate,
            parser,
            context,
            scheme: SchemeSegmentMatcher::hive2(),
            sibling: MarkerMatcher::simba(),
        }
    }

    pub fn identity(&self) -> &RouterIdentity {
        &self.identity
    }

    /// Context installed on the calling thread while the delegate runs.
    pub fn context(&self) -> &Arc<ExecutionContext> {
        &self.context
    }

    /// Cheap syntactic pre-filter: does this URL belong to the driver family?
    pub fn is_eligible(&self, url: &str) -> bool {
        self.identity.shim_id.is_some() && self.scheme.matches(url)
    }

    /// Delegate to try for `url`, if any.
    pub fn select_delegate(&self, url: &str) -> Option<&dyn Driver> {
        if self.sibling.matches(url) || !self.is_eligible(url) {
            return None;
        }
        self.delegate.as_deref()
    }

    /// Whether this router accepts `url` for `cluster` through `delegate`.
    pub fn accepts(&self, url: &str, delegate: Option<&dyn Driver>, cluster: Option<&NamedCluster>) -> bool {
        self.acceptance(url, delegate, cluster).is_ok()
    }

    fn acceptance(
        &self,
        url: &str,
        delegate: Option<&dyn Driver>,
        cluster: Option<&NamedCluster>,
    ) -> Result<(), DeclineReason> {
        if !self.identity.default_configuration {
            return Err(DeclineReason::NotDefaultConfiguration);
        }
        let delegate = delegate.ok_or(DeclineReason::NoDelegate)?;
        let cluster = cluster.ok_or(DeclineReason::ClusterUnresolved)?;
        if !self.requires_this_shim(cluster) {
            return Err(DeclineReason::ShimMismatch);
        }
        match delegate.accepts_url(url) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DeclineReason::DelegateRejected),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Delegate failed to answer accepts_url");
                Err(DeclineReason::DelegateRejected)
            }
        }
    }

    fn requires_this_shim(&self, cluster: &NamedCluster) -> bool {
        match (&self.identity.shim_id, cluster.shim_identifier()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    fn decline(&self, url: &str, reason: DeclineReason) -> Routed {
        tracing::debug!(url = %url, reason = %reason, shim = ?self.identity.shim_id, "Declining connection");
        metrics::record_decline(reason.as_str());
        Routed::Declined(reason)
    }

    /// Route a connect, reporting why the router declined when it does.
    pub fn route(&self, url: &str, properties: &Properties) -> SqlResult<Routed> {
        if !self.is_eligible(url) {
            return Ok(self.decline(url, DeclineReason::NotEligible));
        }
        let Some(delegate) = self.select_delegate(url) else {
            let reason = if self.sibling.matches(url) {
                DeclineReason::SiblingDriver
            } else {
                DeclineReason::NoDelegate
            };
            return Ok(self.decline(url, reason));
        };

        let parsed = self.parser.parse(url).map_err(|e| {
            metrics::record_connect("parse_error");
            SqlError::new(format!("Unable to parse jdbc url: {}", url)).caused_by(e)
        })?;

        let cluster = match parsed.named_cluster() {
            Ok(cluster) => cluster,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Named cluster not resolved");
                return Ok(self.decline(url, DeclineReason::ClusterUnresolved));
            }
        };

        if let Err(reason) = self.acceptance(url, Some(delegate), Some(cluster.as_ref())) {
            return Ok(self.decline(url, reason));
        }

        let _context = ContextGuard::enter(Arc::clone(&self.context));
        let target = parsed.to_string();
        tracing::debug!(cluster = %cluster.name(), url = %target, "Forwarding connect to delegate");

        match delegate.connect(&target, properties) {
            Ok(Some(conn)) => {
                metrics::record_connect("connected");
                Ok(Routed::Connected(conn))
            }
            Ok(None) => Ok(self.decline(url, DeclineReason::DelegateDeclined)),
            Err(e) if chain_reports_not_supported(&e) => Ok(self.decline(url, DeclineReason::NotSupported)),
            Err(e) => {
                tracing::warn!(cluster = %cluster.name(), error = %e, "Delegate connect failed");
                metrics::record_connect("error");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for ShimRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShimRouter")
            .field("identity", &self.identity)
            .field("has_delegate", &self.delegate.is_some())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Driver for ShimRouter {
    fn connect(&self, url: &str, properties: &Properties) -> SqlResult<Option<Box<dyn Connection>>> {
        self.route(url, properties).map(Routed::into_connection)
    }

    /// Never fails; without a resolved cluster this answers false.
    fn accepts_url(&self, url: &str) -> SqlResult<bool> {
        Ok(self.accepts(url, self.select_delegate(url), None))
    }

    fn property_info(&self, url: &str, properties: &Properties) -> SqlResult<Vec<DriverPropertyInfo>> {
        match &self.delegate {
            Some(delegate) => delegate.property_info(url, properties),
            None => Ok(Vec::new()),
        }
    }

    fn major_version(&self) -> i32 {
        self.delegate.as_ref().map_or(-1, |d| d.major_version())
    }

    fn minor_version(&self) -> i32 {
        self.delegate.as_ref().map_or(-1, |d| d.minor_version())
    }

    fn jdbc_compliant(&self) -> SqlResult<bool> {
        let Some(delegate) = &self.delegate else {
            return Ok(false);
        };
        Ok(delegate.jdbc_compliant().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Delegate failed to report JDBC compliance");
            false
        }))
    }

    fn parent_logger(&self) -> SqlResult<Option<ParentLogger>> {
        let Some(delegate) = &self.delegate else {
            return Ok(None);
        };
        delegate.parent_logger().map_err(|e| match e.kind() {
            SqlErrorKind::FeatureNotSupported => e,
            SqlErrorKind::General => SqlError::feature_not_supported_from(e),
        })
    }
}
