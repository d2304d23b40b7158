//! JDBC URL handling.
//!
//! # Data Flow
//! ```text
//! raw "jdbc:hive2://host:port/db;k=v?conf#vars"
//!     → JdbcUrlParser::parse
//!     → JdbcUrl (canonical authority/path, ordered session parameters)
//!     → JdbcUrl::named_cluster() via ClusterResolver
//!     → Display: canonical string handed to the delegate
//! ```

pub mod parser;

pub use parser::{HiveUrlParser, JdbcUrl, JdbcUrlParser, UrlParseError, DEFAULT_CLUSTER_PARAMETER};
