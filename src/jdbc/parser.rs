//! Hive JDBC URL parsing and canonicalisation.
//!
//! # Responsibilities
//! - Split `jdbc:hive2://authority/db;k=v;...?conf#vars` into its parts
//! - Keep session parameters in their original order
//! - Resolve the named cluster the URL refers to
//! - Re-serialise the URL in canonical form for the delegate
//!
//! # Design Decisions
//! - Authority and path syntax is delegated to the `url` crate
//! - A comma-separated host list (ZooKeeper discovery) is split before parsing;
//!   each entry is validated on its own
//! - Session parameter keys and values are percent-decoded for lookup and
//!   forwarded as written
//! - A repeated session parameter keeps its first position and its last value
//! - A session segment without `=` is a structural error

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::{Position, Url};

use crate::cluster::{ClusterLookupError, ClusterResolver, NamedCluster};

/// Session parameter naming the cluster a URL is addressed to.
pub const DEFAULT_CLUSTER_PARAMETER: &str = "pentahoNamedCluster";

const JDBC_PREFIX: &str = "jdbc:";

/// Structural errors raised while parsing a JDBC URL.
#[derive(Debug, Error)]
pub enum UrlParseError {
    #[error("URL '{0}' should start with jdbc:")]
    MissingPrefix(String),

    #[error("Invalid URL '{url}': {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL '{0}' has no authority section")]
    NotHierarchical(String),

    #[error("URL '{0}' has an empty entry in its host list")]
    EmptyHost(String),

    #[error("Malformed session parameter '{0}' (expected key=value)")]
    MalformedParameter(String),
}

/// Parses raw connection strings into [`JdbcUrl`]s.
pub trait JdbcUrlParser: Send + Sync {
    fn parse(&self, url: &str) -> Result<JdbcUrl, UrlParseError>;
}

/// Additional `host[:port]` entry of a host list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HostPort {
    host: String,
    port: Option<u16>,
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Session parameter, decoded for lookup with its written form kept.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionParameter {
    key: String,
    value: String,
    raw: String,
}

/// Structured view of a JDBC URL.
#[derive(Clone)]
pub struct JdbcUrl {
    base: Url,
    extra_hosts: Vec<HostPort>,
    parameters: Vec<SessionParameter>,
    query: Option<String>,
    fragment: Option<String>,
    cluster_parameter: String,
    resolver: Arc<dyn ClusterResolver>,
}

impl JdbcUrl {
    /// URL scheme without the `jdbc:` prefix, e.g. `hive2`.
    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    /// First host of the authority.
    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }

    pub fn port(&self) -> Option<u16> {
        self.base.port()
    }

    /// Every `host[:port]` of the authority, in URL order.
    pub fn hosts(&self) -> impl Iterator<Item = (&str, Option<u16>)> + '_ {
        let first = self.base.host_str().map(|host| (host, self.base.port()));
        first
            .into_iter()
            .chain(self.extra_hosts.iter().map(|h| (h.host.as_str(), h.port)))
    }

    /// Database name from the path; empty when the path is `/` or absent.
    pub fn database(&self) -> &str {
        self.base.path().trim_start_matches('/')
    }

    /// Decoded value of the session parameter with decoded name `key`.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Decoded session parameters in URL order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.parameters.iter().map(|p| (p.key.as_str(), p.value.as_str()))
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Name of the cluster the URL refers to, if any.
    pub fn cluster_name(&self) -> Option<&str> {
        self.parameter(&self.cluster_parameter)
    }

    /// Look up the cluster this URL is addressed to.
    pub fn named_cluster(&self) -> Result<Arc<NamedCluster>, ClusterLookupError> {
        let name = self
            .cluster_name()
            .ok_or_else(|| ClusterLookupError::NoClusterReference {
                parameter: self.cluster_parameter.clone(),
            })?;
        self.resolver.resolve(name)
    }
}

impl fmt::Display for JdbcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", JDBC_PREFIX, &self.base[..Position::AfterPort])?;
        for host in &self.extra_hosts {
            write!(f, ",{}", host)?;
        }
        f.write_str(&self.base[Position::BeforePath..])?;
        for parameter in &self.parameters {
            write!(f, ";{}", parameter.raw)?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for JdbcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JdbcUrl")
            .field("base", &self.base.as_str())
            .field("extra_hosts", &self.extra_hosts)
            .field("parameters", &self.parameters)
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .field("cluster_parameter", &self.cluster_parameter)
            .finish_non_exhaustive()
    }
}

/// Parser for `jdbc:hive2:` style URLs backed by a cluster resolver.
#[derive(Clone)]
pub struct HiveUrlParser {
    resolver: Arc<dyn ClusterResolver>,
    cluster_parameter: String,
}

impl HiveUrlParser {
    pub fn new(resolver: Arc<dyn ClusterResolver>) -> Self {
        Self::with_cluster_parameter(resolver, DEFAULT_CLUSTER_PARAMETER)
    }

    pub fn with_cluster_parameter(resolver: Arc<dyn ClusterResolver>, parameter: impl Into<String>) -> Self {
        Self {
            resolver,
            cluster_parameter: parameter.into(),
        }
    }
}

fn strip_jdbc_prefix(raw: &str) -> Option<&str> {
    let prefix = raw.get(..JDBC_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(JDBC_PREFIX)
        .then(|| &raw[JDBC_PREFIX.len()..])
}

/// Byte range of the authority in `scheme://authority/...`.
fn authority_span(rest: &str) -> Option<(usize, usize)> {
    let colon = rest.find(':')?;
    if !rest[colon..].starts_with("://") {
        return None;
    }
    let start = colon + 3;
    let end = rest[start..]
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .map_or(rest.len(), |len| start + len);
    Some((start, end))
}

fn parse_host_entry(raw: &str, scheme_prefix: &str, entry: &str) -> Result<HostPort, UrlParseError> {
    let url = Url::parse(&format!("{}{}", scheme_prefix, entry)).map_err(|source| UrlParseError::Invalid {
        url: raw.to_string(),
        source,
    })?;
    match url.host_str() {
        Some(host) if !host.is_empty() && url.path().is_empty() => Ok(HostPort {
            host: host.to_string(),
            port: url.port(),
        }),
        _ => Err(UrlParseError::EmptyHost(raw.to_string())),
    }
}

fn decode(component: &str) -> String {
    percent_decode_str(component).decode_utf8_lossy().into_owned()
}

impl JdbcUrlParser for HiveUrlParser {
    fn parse(&self, raw: &str) -> Result<JdbcUrl, UrlParseError> {
        let rest = strip_jdbc_prefix(raw).ok_or_else(|| UrlParseError::MissingPrefix(raw.to_string()))?;

        let mut extra_hosts = Vec::new();
        let single: Cow<'_, str> = match authority_span(rest) {
            Some((start, end)) if rest[start..end].contains(',') => {
                let mut entries = rest[start..end].split(',');
                let first = entries.next().unwrap_or_default();
                if first.is_empty() {
                    return Err(UrlParseError::EmptyHost(raw.to_string()));
                }
                for entry in entries {
                    extra_hosts.push(parse_host_entry(raw, &rest[..start], entry)?);
                }
                Cow::Owned(format!("{}{}{}", &rest[..start], first, &rest[end..]))
            }
            _ => Cow::Borrowed(rest),
        };

        let mut base = Url::parse(&single).map_err(|source| UrlParseError::Invalid {
            url: raw.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(UrlParseError::NotHierarchical(raw.to_string()));
        }

        let query = base.query().map(str::to_string);
        let fragment = base.fragment().map(str::to_string);

        let path = base.path().to_string();
        let mut segments = path.split(';');
        let database = segments.next().unwrap_or_default().to_string();

        let mut parameters: Vec<SessionParameter> = Vec::new();
        for segment in segments.filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| UrlParseError::MalformedParameter(segment.to_string()))?;
            let parameter = SessionParameter {
                key: decode(key),
                value: decode(value),
                raw: segment.to_string(),
            };
            match parameters.iter_mut().find(|p| p.key == parameter.key) {
                Some(existing) => *existing = parameter,
                None => parameters.push(parameter),
            }
        }

        base.set_path(&database);
        base.set_query(None);
        base.set_fragment(None);

        Ok(JdbcUrl {
            base,
            extra_hosts,
            parameters,
            query,
            fragment,
            cluster_parameter: self.cluster_parameter.clone(),
            resolver: Arc::clone(&self.resolver),
        })
    }
}
