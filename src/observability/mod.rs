//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router decisions produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (outcome and decline counters)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so probe output on stdout stays machine-readable
//! - Metrics are cheap (facade calls, no-op without a recorder)

pub mod logging;
pub mod metrics;
