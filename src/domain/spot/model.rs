//! Parking spot domain entity and status state machine

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::billing;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::session::ParkingSession;

/// Spot lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "reserved" => Some(Self::Reserved),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical spot category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotType {
    Regular,
    Handicap,
    Vip,
    Electric,
}

impl SpotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Handicap => "handicap",
            Self::Vip => "vip",
            Self::Electric => "electric",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "handicap" => Some(Self::Handicap),
            "vip" => Some(Self::Vip),
            "electric" => Some(Self::Electric),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single physical parking space.
///
/// Invariant: the occupancy fields (`vehicle_license`, `driver_name`,
/// `driver_phone`, `entry_time`) are populated iff `status` is
/// `Occupied`. All transitions go through the methods below; storage
/// implementations persist the record as-is.
#[derive(Debug, Clone)]
pub struct ParkingSpot {
    /// Unique ID, assigned at creation, never reused
    pub id: Uuid,
    /// Short label, unique within the lot
    pub spot_number: String,
    pub spot_type: SpotType,
    pub status: SpotStatus,
    /// Hourly rate in cents, >= 0
    pub hourly_rate_cents: i64,
    pub vehicle_license: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    /// Set at check-in, cleared at checkout
    pub entry_time: Option<DateTime<Utc>>,
    /// Retained from the most recent checkout for display
    pub exit_time: Option<DateTime<Utc>>,
    /// Fee of the most recent completed session, in cents
    pub last_fee_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSpot {
    /// Create a new spot. Status defaults to `Available` when not given;
    /// `Occupied` is not a valid initial status (check-in is the only
    /// path into it).
    pub fn new(
        spot_number: impl Into<String>,
        spot_type: SpotType,
        hourly_rate_cents: i64,
        status: Option<SpotStatus>,
    ) -> DomainResult<Self> {
        let spot_number = spot_number.into();
        validate_spot_number(&spot_number)?;
        validate_hourly_rate(hourly_rate_cents)?;

        let status = status.unwrap_or(SpotStatus::Available);
        if status == SpotStatus::Occupied {
            return Err(DomainError::InvalidTransition(
                "a spot cannot be created as occupied; use check-in".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            spot_number,
            spot_type,
            status,
            hourly_rate_cents,
            vehicle_license: None,
            driver_name: None,
            driver_phone: None,
            entry_time: None,
            exit_time: None,
            last_fee_cents: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Derived from status, never set independently
    pub fn is_occupied(&self) -> bool {
        self.status == SpotStatus::Occupied
    }

    /// Check a vehicle in: `available -> occupied`.
    pub fn check_in(
        &mut self,
        vehicle_license: &str,
        driver_name: Option<String>,
        driver_phone: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status != SpotStatus::Available {
            return Err(DomainError::InvalidTransition(format!(
                "spot {} is {}, not available",
                self.spot_number, self.status
            )));
        }
        let vehicle_license = vehicle_license.trim();
        if vehicle_license.is_empty() {
            return Err(DomainError::Validation(
                "vehicle_license must not be empty".to_string(),
            ));
        }

        self.status = SpotStatus::Occupied;
        self.vehicle_license = Some(vehicle_license.to_string());
        self.driver_name = driver_name.filter(|s| !s.trim().is_empty());
        self.driver_phone = driver_phone.filter(|s| !s.trim().is_empty());
        self.entry_time = Some(now);
        self.exit_time = None;
        self.updated_at = now;
        Ok(())
    }

    /// Check the vehicle out: `occupied -> available`. Computes the fee,
    /// clears the occupancy fields and returns the finalized session
    /// (the ledger entry is unsaved; `id` is 0 until storage assigns it).
    pub fn check_out(&mut self, now: DateTime<Utc>) -> DomainResult<ParkingSession> {
        if self.status != SpotStatus::Occupied {
            return Err(DomainError::InvalidTransition(format!(
                "spot {} is {}, not occupied",
                self.spot_number, self.status
            )));
        }
        // The occupancy invariant guarantees both fields while occupied
        let entry_time = self.entry_time.ok_or_else(|| {
            DomainError::Storage(format!(
                "occupied spot {} has no entry_time",
                self.spot_number
            ))
        })?;
        let vehicle_license = self.vehicle_license.clone().ok_or_else(|| {
            DomainError::Storage(format!(
                "occupied spot {} has no vehicle_license",
                self.spot_number
            ))
        })?;

        let fee = billing::parking_fee(entry_time, now, self.hourly_rate_cents);
        let session = ParkingSession {
            id: 0,
            spot_id: self.id,
            spot_number: self.spot_number.clone(),
            vehicle_license,
            driver_name: self.driver_name.clone(),
            entry_time,
            exit_time: now,
            fee_cents: fee.fee_cents,
        };

        self.status = SpotStatus::Available;
        self.clear_occupancy();
        self.exit_time = Some(now);
        self.last_fee_cents = Some(fee.fee_cents);
        self.updated_at = now;
        Ok(session)
    }

    /// Direct status edit. Any status may be set except `Occupied`
    /// (check-in is the only path in). Editing away from `Occupied`
    /// discards the open session without billing.
    pub fn change_status(&mut self, status: SpotStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if status == self.status {
            return Ok(());
        }
        if status == SpotStatus::Occupied {
            return Err(DomainError::InvalidTransition(
                "status cannot be set to occupied directly; use check-in".to_string(),
            ));
        }
        if self.status == SpotStatus::Occupied {
            self.clear_occupancy();
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }

    /// Rename the spot. Uniqueness against other spots is checked by the
    /// service, not here.
    pub fn rename(&mut self, spot_number: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        let spot_number = spot_number.into();
        validate_spot_number(&spot_number)?;
        self.spot_number = spot_number;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_hourly_rate(&mut self, rate_cents: i64, now: DateTime<Utc>) -> DomainResult<()> {
        validate_hourly_rate(rate_cents)?;
        self.hourly_rate_cents = rate_cents;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_spot_type(&mut self, spot_type: SpotType, now: DateTime<Utc>) {
        self.spot_type = spot_type;
        self.updated_at = now;
    }

    fn clear_occupancy(&mut self) {
        self.vehicle_license = None;
        self.driver_name = None;
        self.driver_phone = None;
        self.entry_time = None;
    }
}

fn validate_spot_number(spot_number: &str) -> DomainResult<()> {
    if spot_number.trim().is_empty() {
        return Err(DomainError::Validation(
            "spot_number must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_hourly_rate(rate_cents: i64) -> DomainResult<()> {
    if rate_cents < 0 {
        return Err(DomainError::Validation(
            "hourly_rate must not be negative".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_spot() -> ParkingSpot {
        ParkingSpot::new("A1", SpotType::Regular, 500, None).unwrap()
    }

    #[test]
    fn new_spot_is_available_and_vacant() {
        let spot = sample_spot();
        assert_eq!(spot.status, SpotStatus::Available);
        assert!(!spot.is_occupied());
        assert!(spot.vehicle_license.is_none());
        assert!(spot.entry_time.is_none());
    }

    #[test]
    fn new_spot_rejects_empty_number() {
        assert!(matches!(
            ParkingSpot::new("  ", SpotType::Regular, 500, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn new_spot_rejects_negative_rate() {
        assert!(matches!(
            ParkingSpot::new("A1", SpotType::Regular, -1, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn new_spot_rejects_occupied_status() {
        assert!(matches!(
            ParkingSpot::new("A1", SpotType::Regular, 500, Some(SpotStatus::Occupied)),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn check_in_populates_occupancy() {
        let mut spot = sample_spot();
        let now = Utc::now();
        spot.check_in("ABC-123", Some("Alice".into()), None, now).unwrap();
        assert_eq!(spot.status, SpotStatus::Occupied);
        assert!(spot.is_occupied());
        assert_eq!(spot.vehicle_license.as_deref(), Some("ABC-123"));
        assert_eq!(spot.driver_name.as_deref(), Some("Alice"));
        assert_eq!(spot.entry_time, Some(now));
        assert!(spot.exit_time.is_none());
    }

    #[test]
    fn check_in_rejects_blank_license() {
        let mut spot = sample_spot();
        let before = spot.clone();
        let err = spot.check_in("   ", None, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // record unchanged on failure
        assert_eq!(spot.status, before.status);
        assert!(spot.vehicle_license.is_none());
    }

    #[test]
    fn check_in_requires_available() {
        for status in [SpotStatus::Reserved, SpotStatus::Maintenance] {
            let mut spot = ParkingSpot::new("B2", SpotType::Vip, 500, Some(status)).unwrap();
            let err = spot.check_in("ABC-123", None, None, Utc::now()).unwrap_err();
            assert!(matches!(err, DomainError::InvalidTransition(_)));
            assert_eq!(spot.status, status);
        }
    }

    #[test]
    fn double_check_in_is_rejected() {
        let mut spot = sample_spot();
        spot.check_in("ABC-123", None, None, Utc::now()).unwrap();
        let err = spot.check_in("XYZ-999", None, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(spot.vehicle_license.as_deref(), Some("ABC-123"));
    }

    #[test]
    fn checkout_requires_occupied() {
        let mut spot = sample_spot();
        let err = spot.check_out(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(spot.status, SpotStatus::Available);
    }

    #[test]
    fn round_trip_zero_duration_is_free() {
        let mut spot = sample_spot();
        let now = Utc::now();
        spot.check_in("ABC-123", None, None, now).unwrap();
        let session = spot.check_out(now).unwrap();
        assert_eq!(session.fee_cents, 0);
        assert_eq!(spot.status, SpotStatus::Available);
        assert!(spot.vehicle_license.is_none());
        assert!(spot.entry_time.is_none());
        assert_eq!(spot.exit_time, Some(now));
        assert_eq!(spot.last_fee_cents, Some(0));
    }

    #[test]
    fn checkout_bills_ninety_minutes() {
        let mut spot = sample_spot();
        let entry = Utc::now();
        let exit = entry + Duration::minutes(90);
        spot.check_in("ABC-123", None, None, entry).unwrap();
        let session = spot.check_out(exit).unwrap();
        assert_eq!(session.fee_cents, 750);
        assert_eq!(session.vehicle_license, "ABC-123");
        assert_eq!(session.entry_time, entry);
        assert_eq!(session.exit_time, exit);
        assert_eq!(spot.last_fee_cents, Some(750));
    }

    #[test]
    fn occupancy_invariant_holds_after_every_transition() {
        let mut spot = sample_spot();
        let check = |s: &ParkingSpot| {
            assert_eq!(s.is_occupied(), s.status == SpotStatus::Occupied);
            assert_eq!(s.is_occupied(), s.vehicle_license.is_some());
            assert_eq!(s.is_occupied(), s.entry_time.is_some());
        };
        check(&spot);
        spot.check_in("ABC-123", None, None, Utc::now()).unwrap();
        check(&spot);
        spot.check_out(Utc::now()).unwrap();
        check(&spot);
        spot.change_status(SpotStatus::Maintenance, Utc::now()).unwrap();
        check(&spot);
    }

    #[test]
    fn edit_away_from_occupied_clears_occupancy() {
        let mut spot = sample_spot();
        spot.check_in("ABC-123", None, None, Utc::now()).unwrap();
        spot.change_status(SpotStatus::Maintenance, Utc::now()).unwrap();
        assert_eq!(spot.status, SpotStatus::Maintenance);
        assert!(spot.vehicle_license.is_none());
        assert!(spot.entry_time.is_none());
        // discarded session is not billed
        assert!(spot.last_fee_cents.is_none());
    }

    #[test]
    fn edit_cannot_set_occupied() {
        let mut spot = sample_spot();
        let err = spot
            .change_status(SpotStatus::Occupied, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn edit_to_same_status_is_noop() {
        let mut spot = sample_spot();
        spot.change_status(SpotStatus::Available, Utc::now()).unwrap();
        assert_eq!(spot.status, SpotStatus::Available);
    }

    #[test]
    fn status_and_type_round_trip() {
        for s in ["available", "occupied", "reserved", "maintenance"] {
            assert_eq!(SpotStatus::from_str(s).unwrap().as_str(), s);
        }
        for t in ["regular", "handicap", "vip", "electric"] {
            assert_eq!(SpotType::from_str(t).unwrap().as_str(), t);
        }
        assert!(SpotStatus::from_str("unknown").is_none());
        assert!(SpotType::from_str("compact").is_none());
    }
}
