//! Hive shim connection router.
//!
//! Wraps a Hive JDBC-style driver and decides, per connection string, whether
//! the request belongs to this shim: the URL must be a `:hive2:` URL, must not
//! carry a sibling driver's marker, and must name a cluster whose shim
//! identifier matches the router's. Accepted connects are forwarded to the
//! delegate inside the shim's execution context; everything else is declined
//! so the next handler in the chain can try.

pub mod cluster;
pub mod config;
pub mod driver;
pub mod error;
pub mod jdbc;
pub mod observability;
pub mod routing;

pub use config::schema::ShimConfig;
pub use driver::{Connection, Driver, Properties};
pub use error::{SqlError, SqlErrorKind, SqlResult};
pub use routing::{DeclineReason, Routed, RouterIdentity, ShimRouter};
