//! Routing metrics.
//!
//! # Metrics
//! - `shim_router_connect_total` (counter): connect attempts by outcome
//! - `shim_router_declines_total` (counter): declines by reason
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

use ::metrics::counter;

/// Record a connect outcome (`connected`, `declined`, `error`, `parse_error`).
pub fn record_connect(outcome: &'static str) {
    counter!("shim_router_connect_total", "outcome" => outcome).increment(1);
}

/// Record a decline with its reason.
pub fn record_decline(reason: &'static str) {
    counter!("shim_router_declines_total", "reason" => reason).increment(1);
    record_connect("declined");
}
