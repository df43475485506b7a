//! Spot API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::{CheckIn, NewSpot, SpotUpdate};
use crate::domain::{
    billing, DomainError, DomainResult, ParkingSession, ParkingSpot, SpotFilter, SpotStatus,
    SpotType,
};

/// A parking spot as the dashboard consumes it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpotDto {
    /// Unique spot ID
    pub id: Uuid,
    /// Short label, unique within the lot
    pub spot_number: String,
    /// One of `regular`, `handicap`, `vip`, `electric`
    pub spot_type: String,
    /// One of `available`, `occupied`, `reserved`, `maintenance`
    pub status: String,
    /// Derived: true iff status is `occupied`
    pub is_occupied: bool,
    /// License plate of the parked vehicle (occupied spots only)
    pub vehicle_license: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    /// Check-in time of the current vehicle
    pub entry_time: Option<DateTime<Utc>>,
    /// Checkout time of the most recent session
    pub exit_time: Option<DateTime<Utc>>,
    /// Hourly rate as a decimal amount, e.g. 5.0
    pub hourly_rate: f64,
    /// Fee of the most recent completed session, two-place decimal
    pub total_fee: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpotDto {
    pub fn from_domain(spot: ParkingSpot) -> Self {
        Self {
            id: spot.id,
            spot_number: spot.spot_number,
            spot_type: spot.spot_type.to_string(),
            status: spot.status.to_string(),
            is_occupied: spot.status == SpotStatus::Occupied,
            vehicle_license: spot.vehicle_license,
            driver_name: spot.driver_name,
            driver_phone: spot.driver_phone,
            entry_time: spot.entry_time,
            exit_time: spot.exit_time,
            hourly_rate: billing::cents_to_amount(spot.hourly_rate_cents),
            total_fee: spot.last_fee_cents.map(billing::cents_to_amount),
            created_at: spot.created_at,
            updated_at: spot.updated_at,
        }
    }
}

/// One completed check-in/checkout cycle
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: i64,
    pub spot_id: Uuid,
    pub spot_number: String,
    pub vehicle_license: String,
    pub driver_name: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Finalized fee, two-place decimal
    pub fee: f64,
}

impl SessionDto {
    pub fn from_domain(session: ParkingSession) -> Self {
        Self {
            id: session.id,
            spot_id: session.spot_id,
            spot_number: session.spot_number,
            vehicle_license: session.vehicle_license,
            driver_name: session.driver_name,
            entry_time: session.entry_time,
            exit_time: session.exit_time,
            fee: billing::cents_to_amount(session.fee_cents),
        }
    }
}

/// Request to create a spot
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSpotRequest {
    /// Spot label, e.g. "A1"
    pub spot_number: String,
    /// One of `regular`, `handicap`, `vip`, `electric`
    pub spot_type: String,
    /// Hourly rate as a decimal amount. Defaults to 5.0
    pub hourly_rate: Option<f64>,
    /// Initial status; defaults to `available`. `occupied` is rejected
    pub status: Option<String>,
}

impl CreateSpotRequest {
    pub fn into_command(self) -> DomainResult<NewSpot> {
        Ok(NewSpot {
            spot_number: self.spot_number,
            spot_type: parse_spot_type(&self.spot_type)?,
            hourly_rate_cents: billing::amount_to_cents(self.hourly_rate.unwrap_or(5.0)),
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSpotRequest {
    pub spot_number: Option<String>,
    pub spot_type: Option<String>,
    pub hourly_rate: Option<f64>,
    /// Any status except `occupied` (check-in is the only path in)
    pub status: Option<String>,
}

impl UpdateSpotRequest {
    pub fn into_command(self) -> DomainResult<SpotUpdate> {
        Ok(SpotUpdate {
            spot_number: self.spot_number,
            spot_type: self
                .spot_type
                .as_deref()
                .map(parse_spot_type)
                .transpose()?,
            hourly_rate_cents: self.hourly_rate.map(billing::amount_to_cents),
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

/// Request to check a vehicle in
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// License plate; must not be empty
    pub vehicle_license: String,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
}

impl CheckInRequest {
    pub fn into_command(self) -> CheckIn {
        CheckIn {
            vehicle_license: self.vehicle_license,
            driver_name: self.driver_name,
            driver_phone: self.driver_phone,
        }
    }
}

/// Listing filters; empty values pass all
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SpotListQuery {
    /// Filter by status
    pub status: Option<String>,
    /// Filter by spot type
    pub spot_type: Option<String>,
    /// Case-insensitive search by spot number or license plate
    pub search: Option<String>,
}

impl SpotListQuery {
    /// The dashboard sends all three parameters on every request, empty
    /// when unused, so blank values mean "no filter".
    pub fn into_filter(self) -> DomainResult<SpotFilter> {
        Ok(SpotFilter {
            status: non_blank(self.status)
                .as_deref()
                .map(parse_status)
                .transpose()?,
            spot_type: non_blank(self.spot_type)
                .as_deref()
                .map(parse_spot_type)
                .transpose()?,
            search: non_blank(self.search),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Unknown values are rejected at the boundary so free-form strings
/// never reach the lifecycle engine.
fn parse_status(s: &str) -> DomainResult<SpotStatus> {
    SpotStatus::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown status '{}'", s)))
}

fn parse_spot_type(s: &str) -> DomainResult<SpotType> {
    SpotType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown spot_type '{}'", s)))
}

// ── Tests ──────────────────────────────────────────────────────
