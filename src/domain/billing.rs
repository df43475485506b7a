//! Duration-based fee computation
//!
//! All money is handled in integer cents. The public API layer converts
//! to decimal at the boundary.

use chrono::{DateTime, Utc};

/// Result of a fee computation for one parking session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Billable elapsed time in seconds (clamped to >= 0)
    pub elapsed_seconds: i64,
    /// Total fee in cents, partial hours billed proportionally,
    /// rounded up to the next cent
    pub fee_cents: i64,
    /// Set when `exit_time` preceded `entry_time`. The elapsed time is
    /// clamped to zero instead of producing a negative fee; callers
    /// should log the anomaly.
    pub clock_anomaly: bool,
}

/// Calculate the fee for a completed parking session.
///
/// `fee = ceil_to_cent(elapsed_hours * hourly_rate)`, computed as exact
/// integer arithmetic: `ceil(elapsed_seconds * rate_cents / 3600)`.
/// There is no minimum charge and no rounding up to whole hours.
pub fn parking_fee(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    hourly_rate_cents: i64,
) -> FeeBreakdown {
    let raw_elapsed = (exit_time - entry_time).num_seconds();
    let clock_anomaly = raw_elapsed < 0;
    let elapsed_seconds = raw_elapsed.max(0);

    let fee_cents = ceil_div(elapsed_seconds * hourly_rate_cents, 3600);

    FeeBreakdown {
        elapsed_seconds,
        fee_cents,
        clock_anomaly,
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

/// Convert cents to a decimal amount for API output
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Convert a decimal amount from API input to cents
pub fn amount_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Format cents as a human-readable amount, e.g. `7.50`
pub fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

// ── Tests ──────────────────────────────────────────────────────
