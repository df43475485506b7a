//! Parking session ledger entry

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One completed check-in/checkout cycle.
///
/// Appended to the ledger exactly once per successful checkout and never
/// mutated afterwards. Total revenue is the sum of `fee_cents` over the
/// whole ledger, so it accumulates across re-occupations of the same spot
/// and survives spot deletion.
#[derive(Debug, Clone)]
pub struct ParkingSession {
    /// Ledger sequence number, assigned by storage on append
    pub id: i64,
    /// Spot the vehicle was parked at (may no longer exist)
    pub spot_id: Uuid,
    /// Spot label at checkout time, kept for history display
    pub spot_number: String,
    pub vehicle_license: String,
    pub driver_name: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Finalized fee in cents
    pub fee_cents: i64,
}
