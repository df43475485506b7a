//! In-memory storage implementation

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, ParkingSession, ParkingSpot, Storage};

/// In-memory storage for development and testing
pub struct InMemoryStorage {
    spots: DashMap<Uuid, ParkingSpot>,
    sessions: DashMap<i64, ParkingSession>,
    session_counter: AtomicI64,
    /// Serializes the spot-number uniqueness check with the insert
    save_guard: std::sync::Mutex<()>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            spots: DashMap::new(),
            sessions: DashMap::new(),
            session_counter: AtomicI64::new(1),
            save_guard: std::sync::Mutex::new(()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_spot(&self, spot: ParkingSpot) -> DomainResult<()> {
        let _guard = self
            .save_guard
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.spots.contains_key(&spot.id) {
            return Err(DomainError::Conflict(format!(
                "spot id {} already exists",
                spot.id
            )));
        }
        if self
            .spots
            .iter()
            .any(|s| s.spot_number == spot.spot_number)
        {
            return Err(DomainError::Conflict(format!(
                "spot number '{}' already exists",
                spot.spot_number
            )));
        }
        self.spots.insert(spot.id, spot);
        Ok(())
    }

    async fn get_spot(&self, id: Uuid) -> DomainResult<Option<ParkingSpot>> {
        Ok(self.spots.get(&id).map(|s| s.clone()))
    }

    async fn find_spot_by_number(&self, spot_number: &str) -> DomainResult<Option<ParkingSpot>> {
        Ok(self
            .spots
            .iter()
            .find(|s| s.spot_number == spot_number)
            .map(|s| s.clone()))
    }

    async fn update_spot(&self, spot: ParkingSpot) -> DomainResult<()> {
        if !self.spots.contains_key(&spot.id) {
            return Err(DomainError::not_found("Spot", spot.id));
        }
        self.spots.insert(spot.id, spot);
        Ok(())
    }

    async fn delete_spot(&self, id: Uuid) -> DomainResult<()> {
        self.spots
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Spot", id))?;
        Ok(())
    }

    async fn list_spots(&self) -> DomainResult<Vec<ParkingSpot>> {
        let mut spots: Vec<ParkingSpot> = self.spots.iter().map(|s| s.clone()).collect();
        spots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(spots)
    }

    async fn complete_checkout(
        &self,
        spot: ParkingSpot,
        mut session: ParkingSession,
    ) -> DomainResult<ParkingSession> {
        if !self.spots.contains_key(&spot.id) {
            return Err(DomainError::not_found("Spot", spot.id));
        }
        session.id = self.session_counter.fetch_add(1, Ordering::SeqCst);
        self.sessions.insert(session.id, session.clone());
        self.spots.insert(spot.id, spot);
        Ok(session)
    }

    async fn list_sessions_for_spot(&self, spot_id: Uuid) -> DomainResult<Vec<ParkingSession>> {
        let mut sessions: Vec<ParkingSession> = self
            .sessions
            .iter()
            .filter(|s| s.spot_id == spot_id)
            .map(|s| s.clone())
            .collect();
        sessions.sort_by_key(|s| s.id);
        Ok(sessions)
    }

    async fn total_revenue_cents(&self) -> DomainResult<i64> {
        Ok(self.sessions.iter().map(|s| s.fee_cents).sum())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpotType;
    use chrono::Utc;

    fn spot(number: &str) -> ParkingSpot {
        ParkingSpot::new(number, SpotType::Regular, 500, None).unwrap()
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let storage = InMemoryStorage::new();
        let s = spot("A1");
        let id = s.id;
        storage.save_spot(s).await.unwrap();
        let loaded = storage.get_spot(id).await.unwrap().unwrap();
        assert_eq!(loaded.spot_number, "A1");
    }

    #[tokio::test]
    async fn duplicate_spot_number_conflicts() {
        let storage = InMemoryStorage::new();
        storage.save_spot(spot("A1")).await.unwrap();
        let err = storage.save_spot(spot("A1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_saves_with_same_number_have_one_winner() {
        let storage = std::sync::Arc::new(InMemoryStorage::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let storage = std::sync::Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage.save_spot(spot("A1")).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(storage.list_spots().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_missing_spot_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage.update_spot(spot("A1")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_missing_spot_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage.delete_spot(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_is_in_creation_order() {
        let storage = InMemoryStorage::new();
        // created_at has nanosecond resolution; ids break remaining ties
        for number in ["C3", "A1", "B2"] {
            storage.save_spot(spot(number)).await.unwrap();
        }
        let listed = storage.list_spots().await.unwrap();
        let numbers: Vec<_> = listed.iter().map(|s| s.spot_number.as_str()).collect();
        assert_eq!(numbers, vec!["C3", "A1", "B2"]);
    }

    #[tokio::test]
    async fn ledger_accumulates_revenue() {
        let storage = InMemoryStorage::new();
        let mut s = spot("A1");
        let saved_id = s.id;
        storage.save_spot(s.clone()).await.unwrap();

        for fee in [250i64, 750] {
            s.check_in("ABC-123", None, None, Utc::now()).unwrap();
            let mut session = s.check_out(Utc::now()).unwrap();
            session.fee_cents = fee;
            let appended = storage
                .complete_checkout(s.clone(), session)
                .await
                .unwrap();
            assert!(appended.id > 0);
        }

        assert_eq!(storage.total_revenue_cents().await.unwrap(), 1000);
        let sessions = storage.list_sessions_for_spot(saved_id).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].id < sessions[1].id);
    }

    #[tokio::test]
    async fn sessions_survive_spot_deletion() {
        let storage = InMemoryStorage::new();
        let mut s = spot("A1");
        let id = s.id;
        storage.save_spot(s.clone()).await.unwrap();
        s.check_in("ABC-123", None, None, Utc::now()).unwrap();
        let session = s.check_out(Utc::now()).unwrap();
        storage.complete_checkout(s.clone(), session).await.unwrap();

        storage.delete_spot(id).await.unwrap();
        assert!(storage.get_spot(id).await.unwrap().is_none());
        assert_eq!(storage.list_sessions_for_spot(id).await.unwrap().len(), 1);
    }
}
