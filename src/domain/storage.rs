//! Storage trait definition

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::session::ParkingSession;
use crate::domain::spot::ParkingSpot;
use crate::domain::DomainResult;

/// Persistence operations for spots and the session ledger.
///
/// Pure data access; business rules live in the services. Listing
/// returns spots in creation order (`created_at`, then id) so results
/// are deterministic for identical inputs.
#[async_trait]
pub trait Storage: Send + Sync {
    // Spot operations
    async fn save_spot(&self, spot: ParkingSpot) -> DomainResult<()>;
    async fn get_spot(&self, id: Uuid) -> DomainResult<Option<ParkingSpot>>;
    async fn find_spot_by_number(&self, spot_number: &str) -> DomainResult<Option<ParkingSpot>>;
    async fn update_spot(&self, spot: ParkingSpot) -> DomainResult<()>;
    async fn delete_spot(&self, id: Uuid) -> DomainResult<()>;
    async fn list_spots(&self) -> DomainResult<Vec<ParkingSpot>>;

    // Session ledger (append-only)

    /// Persist a checkout atomically: write the vacated spot and append
    /// the session in one step. A failed ledger write leaves the spot
    /// record untouched, so the caller can retry the checkout.
    async fn complete_checkout(
        &self,
        spot: ParkingSpot,
        session: ParkingSession,
    ) -> DomainResult<ParkingSession>;
    async fn list_sessions_for_spot(&self, spot_id: Uuid) -> DomainResult<Vec<ParkingSession>>;
    async fn total_revenue_cents(&self) -> DomainResult<i64>;
}
