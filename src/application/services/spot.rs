//! Spot lifecycle service
//!
//! Owns every state transition on a parking spot. Mutating operations on
//! the same spot id are serialized through a per-id async mutex so two
//! concurrent check-ins cannot assign two vehicles to one spot;
//! operations on different ids run in parallel. Reads take no locks.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    billing, DomainError, DomainResult, ParkingSession, ParkingSpot, SpotFilter, SpotStatus,
    SpotType, Storage,
};

/// Fields for creating a spot
#[derive(Debug, Clone)]
pub struct NewSpot {
    pub spot_number: String,
    pub spot_type: SpotType,
    pub hourly_rate_cents: i64,
    pub status: Option<SpotStatus>,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct SpotUpdate {
    pub spot_number: Option<String>,
    pub spot_type: Option<SpotType>,
    pub hourly_rate_cents: Option<i64>,
    pub status: Option<SpotStatus>,
}

/// Check-in details for one vehicle
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub vehicle_license: String,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
}

/// Service enforcing the spot status state machine
pub struct SpotService {
    storage: Arc<dyn Storage>,
    spot_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl SpotService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            spot_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.spot_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Remove the lock entry when nothing else holds it. Without this,
    /// requests against unknown ids would grow the lock table forever.
    fn discard_unused_lock(&self, id: Uuid) {
        self.spot_locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn get_existing(&self, id: Uuid) -> DomainResult<ParkingSpot> {
        self.storage
            .get_spot(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Spot", id))
    }

    /// Acquire the spot's lock and load it. An unknown id drops the
    /// just-created lock entry again before returning `NotFound`.
    async fn lock_and_get(&self, id: Uuid) -> DomainResult<(OwnedMutexGuard<()>, ParkingSpot)> {
        let guard = self.lock_for(id).lock_owned().await;
        match self.get_existing(id).await {
            Ok(spot) => Ok((guard, spot)),
            Err(e) => {
                drop(guard);
                self.discard_unused_lock(id);
                Err(e)
            }
        }
    }

    pub async fn create_spot(&self, new: NewSpot) -> DomainResult<ParkingSpot> {
        let spot = ParkingSpot::new(
            new.spot_number,
            new.spot_type,
            new.hourly_rate_cents,
            new.status,
        )?;

        if let Some(existing) = self.storage.find_spot_by_number(&spot.spot_number).await? {
            return Err(DomainError::Conflict(format!(
                "spot number '{}' already exists (id {})",
                spot.spot_number, existing.id
            )));
        }

        self.storage.save_spot(spot.clone()).await?;
        info!("Spot {} created ({})", spot.spot_number, spot.id);
        Ok(spot)
    }

    pub async fn get_spot(&self, id: Uuid) -> DomainResult<ParkingSpot> {
        self.get_existing(id).await
    }

    pub async fn list_spots(&self, filter: &SpotFilter) -> DomainResult<Vec<ParkingSpot>> {
        let spots = self.storage.list_spots().await?;
        if filter.is_empty() {
            return Ok(spots);
        }
        Ok(spots.into_iter().filter(|s| filter.matches(s)).collect())
    }

    /// Apply a partial edit. All validation and transition checks run on
    /// a copy; storage is only written once everything passed, so a
    /// failed edit leaves the record exactly as it was.
    pub async fn update_spot(&self, id: Uuid, update: SpotUpdate) -> DomainResult<ParkingSpot> {
        let (_guard, mut spot) = self.lock_and_get(id).await?;
        let was_occupied = spot.is_occupied();
        let now = Utc::now();

        if let Some(spot_number) = update.spot_number {
            if spot_number != spot.spot_number {
                if let Some(other) = self.storage.find_spot_by_number(&spot_number).await? {
                    if other.id != id {
                        return Err(DomainError::Conflict(format!(
                            "spot number '{}' already exists (id {})",
                            spot_number, other.id
                        )));
                    }
                }
            }
            spot.rename(spot_number, now)?;
        }
        if let Some(spot_type) = update.spot_type {
            spot.set_spot_type(spot_type, now);
        }
        if let Some(rate) = update.hourly_rate_cents {
            spot.set_hourly_rate(rate, now)?;
        }
        if let Some(status) = update.status {
            spot.change_status(status, now)?;
            if was_occupied && !spot.is_occupied() {
                warn!(
                    "Spot {} edited out of occupied status; open session discarded without billing",
                    spot.spot_number
                );
            }
        }

        self.storage.update_spot(spot.clone()).await?;
        Ok(spot)
    }

    pub async fn delete_spot(&self, id: Uuid) -> DomainResult<()> {
        let (guard, spot) = self.lock_and_get(id).await?;
        if spot.is_occupied() {
            warn!(
                "Deleting occupied spot {}; open session for vehicle {} discarded",
                spot.spot_number,
                spot.vehicle_license.as_deref().unwrap_or("?")
            );
        }
        self.storage.delete_spot(id).await?;
        drop(guard);
        self.discard_unused_lock(id);

        info!("Spot {} deleted ({})", spot.spot_number, id);
        Ok(())
    }

    pub async fn check_in(&self, id: Uuid, check_in: CheckIn) -> DomainResult<ParkingSpot> {
        let (_guard, mut spot) = self.lock_and_get(id).await?;
        spot.check_in(
            &check_in.vehicle_license,
            check_in.driver_name,
            check_in.driver_phone,
            Utc::now(),
        )?;
        self.storage.update_spot(spot.clone()).await?;

        info!(
            "Vehicle {} checked in at spot {}",
            check_in.vehicle_license, spot.spot_number
        );
        Ok(spot)
    }

    pub async fn check_out(&self, id: Uuid) -> DomainResult<ParkingSpot> {
        let (_guard, mut spot) = self.lock_and_get(id).await?;
        let session = spot.check_out(Utc::now())?;
        if session.exit_time < session.entry_time {
            warn!(
                "Spot {}: exit_time precedes entry_time; fee clamped to zero",
                spot.spot_number
            );
        }

        // Single storage step; a failed ledger write leaves the spot occupied
        let session = self
            .storage
            .complete_checkout(spot.clone(), session)
            .await?;

        info!(
            "Vehicle {} checked out of spot {} after {}s, fee {}",
            session.vehicle_license,
            spot.spot_number,
            (session.exit_time - session.entry_time).num_seconds().max(0),
            billing::format_cents(session.fee_cents)
        );
        Ok(spot)
    }

    /// Completed sessions for one spot, oldest first
    pub async fn sessions_for_spot(&self, id: Uuid) -> DomainResult<Vec<ParkingSession>> {
        // History may outlive the spot, so no existence check here
        self.storage.list_sessions_for_spot(id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStorage;

    fn service() -> SpotService {
        SpotService::new(Arc::new(InMemoryStorage::new()))
    }

    fn new_spot(number: &str) -> NewSpot {
        NewSpot {
            spot_number: number.to_string(),
            spot_type: SpotType::Regular,
            hourly_rate_cents: 500,
            status: None,
        }
    }

    fn check_in_req(plate: &str) -> CheckIn {
        CheckIn {
            vehicle_license: plate.to_string(),
            driver_name: None,
            driver_phone: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_available() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        assert_eq!(spot.status, SpotStatus::Available);
        assert_eq!(spot.hourly_rate_cents, 500);
    }

    #[tokio::test]
    async fn duplicate_spot_number_is_conflict() {
        let svc = service();
        svc.create_spot(new_spot("A1")).await.unwrap();
        let err = svc.create_spot(new_spot("A1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn check_in_then_out_round_trip() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();

        let occupied = svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();
        assert_eq!(occupied.status, SpotStatus::Occupied);
        assert_eq!(occupied.vehicle_license.as_deref(), Some("ABC-123"));

        let vacated = svc.check_out(spot.id).await.unwrap();
        assert_eq!(vacated.status, SpotStatus::Available);
        assert!(vacated.vehicle_license.is_none());
        assert_eq!(vacated.last_fee_cents, Some(0));

        let sessions = svc.sessions_for_spot(spot.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].vehicle_license, "ABC-123");
    }

    #[tokio::test]
    async fn check_in_on_occupied_spot_fails_unchanged() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();

        let err = svc
            .check_in(spot.id, check_in_req("XYZ-999"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        let unchanged = svc.get_spot(spot.id).await.unwrap();
        assert_eq!(unchanged.vehicle_license.as_deref(), Some("ABC-123"));
    }

    #[tokio::test]
    async fn check_out_on_vacant_spot_fails() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        let err = svc.check_out(spot.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert!(svc.sessions_for_spot(spot.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            svc.get_spot(id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            svc.check_in(id, check_in_req("ABC-123")).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            svc.check_out(id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            svc.delete_spot(id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn update_rejects_duplicate_number() {
        let svc = service();
        svc.create_spot(new_spot("A1")).await.unwrap();
        let b2 = svc.create_spot(new_spot("B2")).await.unwrap();

        let err = svc
            .update_spot(
                b2.id,
                SpotUpdate {
                    spot_number: Some("A1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(svc.get_spot(b2.id).await.unwrap().spot_number, "B2");
    }

    #[tokio::test]
    async fn update_keeping_own_number_is_allowed() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        let updated = svc
            .update_spot(
                spot.id,
                SpotUpdate {
                    spot_number: Some("A1".to_string()),
                    hourly_rate_cents: Some(900),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.hourly_rate_cents, 900);
    }

    #[tokio::test]
    async fn update_cannot_force_occupied() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        let err = svc
            .update_spot(
                spot.id,
                SpotUpdate {
                    status: Some(SpotStatus::Occupied),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn failed_update_leaves_record_untouched() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        // rate change is valid but the status change fails; nothing persists
        let err = svc
            .update_spot(
                spot.id,
                SpotUpdate {
                    hourly_rate_cents: Some(900),
                    status: Some(SpotStatus::Occupied),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(svc.get_spot(spot.id).await.unwrap().hourly_rate_cents, 500);
    }

    #[tokio::test]
    async fn editing_occupied_spot_to_maintenance_discards_session() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();

        let updated = svc
            .update_spot(
                spot.id,
                SpotUpdate {
                    status: Some(SpotStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, SpotStatus::Maintenance);
        assert!(updated.vehicle_license.is_none());
        // nothing was billed
        assert!(svc.sessions_for_spot(spot.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_from_listing() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.delete_spot(spot.id).await.unwrap();
        assert!(svc
            .list_spots(&SpotFilter::default())
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            svc.get_spot(spot.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_occupied_spot_keeps_ledger() {
        let svc = service();
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();
        svc.check_out(spot.id).await.unwrap();
        svc.check_in(spot.id, check_in_req("XYZ-999")).await.unwrap();

        svc.delete_spot(spot.id).await.unwrap();
        // the completed session survives; the open one is discarded
        let sessions = svc.sessions_for_spot(spot.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].vehicle_license, "ABC-123");
    }

    #[tokio::test]
    async fn occupied_listing_always_has_license() {
        let svc = service();
        for (i, plate) in ["ABC-111", "ABC-222"].iter().enumerate() {
            let spot = svc.create_spot(new_spot(&format!("A{}", i))).await.unwrap();
            svc.check_in(spot.id, check_in_req(plate)).await.unwrap();
        }
        svc.create_spot(new_spot("B9")).await.unwrap();

        let filter = SpotFilter {
            status: Some(SpotStatus::Occupied),
            ..Default::default()
        };
        let occupied = svc.list_spots(&filter).await.unwrap();
        assert_eq!(occupied.len(), 2);
        assert!(occupied
            .iter()
            .all(|s| s.vehicle_license.as_deref().is_some_and(|p| !p.is_empty())));
    }

    #[tokio::test]
    async fn concurrent_check_ins_cannot_double_book() {
        let svc = Arc::new(service());
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();

        let mut handles = Vec::new();
        for plate in ["CAR-1", "CAR-2", "CAR-3", "CAR-4"] {
            let svc = Arc::clone(&svc);
            let id = spot.id;
            handles.push(tokio::spawn(async move {
                svc.check_in(id, check_in_req(plate)).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);

        let spot = svc.get_spot(spot.id).await.unwrap();
        assert!(spot.is_occupied());
        assert!(spot.vehicle_license.is_some());
    }

    #[tokio::test]
    async fn unknown_ids_leave_no_lock_entries() {
        let svc = service();
        for _ in 0..100 {
            let id = Uuid::new_v4();
            let _ = svc.check_out(id).await;
            let _ = svc.check_in(id, check_in_req("ABC-123")).await;
            let _ = svc
                .update_spot(
                    id,
                    SpotUpdate {
                        hourly_rate_cents: Some(900),
                        ..Default::default()
                    },
                )
                .await;
            let _ = svc.delete_spot(id).await;
        }
        assert!(svc.spot_locks.is_empty());

        // deleting a real spot clears its entry too
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();
        svc.delete_spot(spot.id).await.unwrap();
        assert!(svc.spot_locks.is_empty());
    }

    /// Storage double whose next checkout write fails, to exercise the
    /// all-or-nothing checkout path.
    struct FailingLedgerStorage {
        inner: InMemoryStorage,
        fail_next_checkout: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl Storage for FailingLedgerStorage {
        async fn save_spot(&self, spot: ParkingSpot) -> DomainResult<()> {
            self.inner.save_spot(spot).await
        }

        async fn get_spot(&self, id: Uuid) -> DomainResult<Option<ParkingSpot>> {
            self.inner.get_spot(id).await
        }

        async fn find_spot_by_number(
            &self,
            spot_number: &str,
        ) -> DomainResult<Option<ParkingSpot>> {
            self.inner.find_spot_by_number(spot_number).await
        }

        async fn update_spot(&self, spot: ParkingSpot) -> DomainResult<()> {
            self.inner.update_spot(spot).await
        }

        async fn delete_spot(&self, id: Uuid) -> DomainResult<()> {
            self.inner.delete_spot(id).await
        }

        async fn list_spots(&self) -> DomainResult<Vec<ParkingSpot>> {
            self.inner.list_spots().await
        }

        async fn complete_checkout(
            &self,
            spot: ParkingSpot,
            session: ParkingSession,
        ) -> DomainResult<ParkingSession> {
            if self
                .fail_next_checkout
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                return Err(DomainError::Storage("ledger write failed".to_string()));
            }
            self.inner.complete_checkout(spot, session).await
        }

        async fn list_sessions_for_spot(
            &self,
            spot_id: Uuid,
        ) -> DomainResult<Vec<ParkingSession>> {
            self.inner.list_sessions_for_spot(spot_id).await
        }

        async fn total_revenue_cents(&self) -> DomainResult<i64> {
            self.inner.total_revenue_cents().await
        }
    }

    #[tokio::test]
    async fn failed_ledger_write_leaves_spot_occupied() {
        let storage = Arc::new(FailingLedgerStorage {
            inner: InMemoryStorage::new(),
            fail_next_checkout: std::sync::atomic::AtomicBool::new(false),
        });
        let svc = SpotService::new(storage.clone());
        let spot = svc.create_spot(new_spot("A1")).await.unwrap();
        svc.check_in(spot.id, check_in_req("ABC-123")).await.unwrap();

        storage
            .fail_next_checkout
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let err = svc.check_out(spot.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));

        // nothing partial: the spot is still occupied, nothing was billed
        let unchanged = svc.get_spot(spot.id).await.unwrap();
        assert!(unchanged.is_occupied());
        assert_eq!(unchanged.vehicle_license.as_deref(), Some("ABC-123"));
        assert!(svc.sessions_for_spot(spot.id).await.unwrap().is_empty());

        // the retry succeeds once the store recovers
        let vacated = svc.check_out(spot.id).await.unwrap();
        assert_eq!(vacated.status, SpotStatus::Available);
        assert_eq!(vacated.last_fee_cents, Some(0));
        assert_eq!(svc.sessions_for_spot(spot.id).await.unwrap().len(), 1);
    }
}
