//! Driver-level error type and failure classification.
//!
//! `SqlError` plays the part of a JDBC `SQLException`: a message, an optional
//! five-character SQL state and an optional underlying cause. Delegate errors
//! travel through the router as `SqlError` so that their cause chain stays
//! inspectable via [`std::error::Error::source`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// SQL state "feature not supported" with no subclass specified.
pub const SQL_STATE_NOT_SUPPORTED: &str = "0A000";

/// Upper bound on the number of links inspected when walking a cause chain.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Boxed error used as the cause of a [`SqlError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Broad category of a [`SqlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlErrorKind {
    /// Any database error.
    General,
    /// The driver does not support the requested operation.
    FeatureNotSupported,
}

impl fmt::Display for SqlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlErrorKind::General => write!(f, "general"),
            SqlErrorKind::FeatureNotSupported => write!(f, "feature not supported"),
        }
    }
}

/// Error raised by a driver or by the router on its behalf.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SqlError {
    message: String,
    sql_state: Option<String>,
    kind: SqlErrorKind,
    #[source]
    source: Option<BoxError>,
}

/// Result type for driver operations.
pub type SqlResult<T> = Result<T, SqlError>;

impl SqlError {
    /// Create a general error with no SQL state and no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql_state: None,
            kind: SqlErrorKind::General,
            source: None,
        }
    }

    /// Create a general error carrying a SQL state.
    pub fn with_state(message: impl Into<String>, sql_state: impl Into<String>) -> Self {
        Self {
            sql_state: Some(sql_state.into()),
            ..Self::new(message)
        }
    }

    /// Create a "feature not supported" error.
    pub fn feature_not_supported(message: impl Into<String>) -> Self {
        Self {
            kind: SqlErrorKind::FeatureNotSupported,
            ..Self::new(message)
        }
    }

    /// Wrap an arbitrary error into a "feature not supported" error.
    ///
    /// The message is taken from the cause, which stays reachable through
    /// `source()`.
    pub fn feature_not_supported_from(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            message: cause.to_string(),
            sql_state: None,
            kind: SqlErrorKind::FeatureNotSupported,
            source: Some(cause),
        }
    }

    /// Attach an underlying cause.
    pub fn caused_by(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sql_state(&self) -> Option<&str> {
        self.sql_state.as_deref()
    }

    pub fn kind(&self) -> SqlErrorKind {
        self.kind
    }

    /// Returns true if this error, taken on its own, reports SQL state `0A000`.
    pub fn is_not_supported_state(&self) -> bool {
        self.sql_state() == Some(SQL_STATE_NOT_SUPPORTED)
    }
}

/// Walk `err` and its chain of causes looking for a [`SqlError`] with SQL
/// state `0A000`.
///
/// At most [`MAX_CAUSE_DEPTH`] links are inspected.
pub fn chain_reports_not_supported(err: &(dyn StdError + 'static)) -> bool {
    let mut cause = Some(err);
    let mut depth = 0;
    while let Some(current) = cause {
        if depth == MAX_CAUSE_DEPTH {
            tracing::warn!(depth, "Cause chain truncated during classification");
            break;
        }
        if let Some(sql) = current.downcast_ref::<SqlError>() {
            if sql.is_not_supported_state() {
                return true;
            }
        }
        cause = current.source();
        depth += 1;
    }
    false
}
