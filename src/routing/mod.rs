//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! connect(url, properties)
//!     → matcher.rs (":hive2:" segment, sibling-driver marker)
//!     → router.rs (parse, resolve cluster, match shim identity)
//!     → context.rs (swap thread context for the delegate call)
//!     → delegate.connect(canonical url, properties)
//!     → Return: Connected, Declined(reason) or error
//! ```
//!
//! # Design Decisions
//! - Router compiled at startup, immutable at runtime
//! - No regex in hot path (literal matching only)
//! - Deterministic: same input and registry always give the same decision
//! - Declines are local; only structural and delegate errors propagate

pub mod context;
pub mod matcher;
pub mod router;

pub use router::{DeclineReason, Routed, RouterIdentity, ShimRouter};
