//! Driver capability surface.
//!
//! # Data Flow
//! ```text
//! Handler chain
//!     → dyn Driver (ShimRouter or a raw delegate)
//!     → connect(url, properties)
//!     → Some(connection) | None (not my URL) | Err(SqlError)
//! ```
//!
//! # Design Decisions
//! - One trait, several implementors: the router is registrable wherever a
//!   plain driver is
//! - `Ok(None)` from `connect` means "try the next handler", never an error
//! - Properties are passed through verbatim

pub mod echo;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::SqlResult;

/// Opaque key/value bag handed to the driver untouched.
pub type Properties = BTreeMap<String, String>;

/// A live connection produced by a driver.
pub trait Connection: Send + fmt::Debug {
    /// URL the connection was opened against.
    fn url(&self) -> &str;

    /// Access to the concrete type for callers that know the driver.
    fn as_any(&self) -> &dyn Any;
}

/// Description of one connection property a driver understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverPropertyInfo {
    pub name: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    pub choices: Vec<String>,
}

impl DriverPropertyInfo {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
            required: false,
            choices: Vec::new(),
        }
    }
}

/// Handle to the log target a driver writes its events under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLogger {
    target: String,
}

impl ParentLogger {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// The capability interface shared by the router and the drivers it wraps.
pub trait Driver: Send + Sync {
    /// Attempt a connection. `Ok(None)` declines the URL.
    fn connect(&self, url: &str, properties: &Properties) -> SqlResult<Option<Box<dyn Connection>>>;

    /// Whether this driver thinks it can open `url`.
    fn accepts_url(&self, url: &str) -> SqlResult<bool>;

    /// Properties the driver understands for `url`.
    fn property_info(&self, url: &str, properties: &Properties) -> SqlResult<Vec<DriverPropertyInfo>>;

    fn major_version(&self) -> i32;

    fn minor_version(&self) -> i32;

    fn jdbc_compliant(&self) -> SqlResult<bool>;

    /// Log target of the driver, if it exposes one.
    fn parent_logger(&self) -> SqlResult<Option<ParentLogger>>;
}
