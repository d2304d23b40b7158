//! Dry-run driver.
//!
//! Accepts `jdbc:hive2:` URLs and hands back a connection that only records
//! what it was opened with. Used by `shim-probe` to show what the router would
//! forward without touching a real server.

use std::any::Any;

use crate::driver::{Connection, Driver, DriverPropertyInfo, ParentLogger, Properties};
use crate::error::SqlResult;
use crate::routing::context;

const ECHO_PREFIX: &str = "jdbc:hive2:";

/// Connection returned by [`EchoDriver`].
#[derive(Debug, Clone)]
pub struct EchoConnection {
    url: String,
    properties: Properties,
    context: Option<String>,
}

impl EchoConnection {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Execution context that was active when the connection was opened.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl Connection for EchoConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct EchoDriver;

impl EchoDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for EchoDriver {
    fn connect(&self, url: &str, properties: &Properties) -> SqlResult<Option<Box<dyn Connection>>> {
        if !url.starts_with(ECHO_PREFIX) {
            return Ok(None);
        }
        let context = context::current().map(|ctx| ctx.to_string());
        tracing::info!(url = %url, context = ?context, "Echo connection opened");
        Ok(Some(Box::new(EchoConnection {
            url: url.to_string(),
            properties: properties.clone(),
            context,
        })))
    }

    fn accepts_url(&self, url: &str) -> SqlResult<bool> {
        Ok(url.starts_with(ECHO_PREFIX))
    }

    fn property_info(&self, _url: &str, properties: &Properties) -> SqlResult<Vec<DriverPropertyInfo>> {
        Ok(properties
            .iter()
            .map(|(k, v)| DriverPropertyInfo::new(k.clone(), Some(v.clone())))
            .collect())
    }

    fn major_version(&self) -> i32 {
        1
    }

    fn minor_version(&self) -> i32 {
        0
    }

    fn jdbc_compliant(&self) -> SqlResult<bool> {
        Ok(false)
    }

    fn parent_logger(&self) -> SqlResult<Option<ParentLogger>> {
        Ok(Some(ParentLogger::new(module_path!())))
    }
}
