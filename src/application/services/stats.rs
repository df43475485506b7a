//! Dashboard statistics aggregation

use std::sync::Arc;

use crate::domain::{DomainResult, SpotStatus, Storage};

/// Snapshot of lot occupancy and lifetime revenue.
///
/// Counts come from one read-only pass over the current spot records;
/// revenue is the running sum over the session ledger. The snapshot may
/// trail in-flight writes (no lock against mutations is taken).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_spots: u32,
    pub available_spots: u32,
    pub occupied_spots: u32,
    pub reserved_spots: u32,
    pub maintenance_spots: u32,
    pub total_revenue_cents: i64,
}

/// Read-only aggregator over the storage snapshot
pub struct StatsService {
    storage: Arc<dyn Storage>,
}

impl StatsService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn dashboard_stats(&self) -> DomainResult<DashboardStats> {
        let spots = self.storage.list_spots().await?;

        let mut stats = DashboardStats {
            total_spots: spots.len() as u32,
            available_spots: 0,
            occupied_spots: 0,
            reserved_spots: 0,
            maintenance_spots: 0,
            total_revenue_cents: 0,
        };

        for spot in &spots {
            match spot.status {
                SpotStatus::Available => stats.available_spots += 1,
                SpotStatus::Occupied => stats.occupied_spots += 1,
                SpotStatus::Reserved => stats.reserved_spots += 1,
                SpotStatus::Maintenance => stats.maintenance_spots += 1,
            }
        }

        stats.total_revenue_cents = self.storage.total_revenue_cents().await?;
        Ok(stats)
    }
}

// ── Tests ──────────────────────────────────────────────────────
