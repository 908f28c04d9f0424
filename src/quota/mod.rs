//! Per-user request quota enforcement.
//!
//! Meters weather requests against a rolling window. The window resets
//! lazily at check time; there is no background timer.

mod record;
mod tracker;

pub use record::UserQuota;
pub use tracker::{DenialReason, QuotaDecision, QuotaTracker};
