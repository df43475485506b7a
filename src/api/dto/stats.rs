//! Dashboard statistics DTO

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::DashboardStats;
use crate::domain::billing;

/// Lot-wide occupancy counts and lifetime revenue
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_spots: u32,
    pub available_spots: u32,
    pub occupied_spots: u32,
    pub reserved_spots: u32,
    pub maintenance_spots: u32,
    /// Sum of all completed session fees, two-place decimal
    pub total_revenue: f64,
}

impl DashboardStatsDto {
    pub fn from_domain(stats: DashboardStats) -> Self {
        Self {
            total_spots: stats.total_spots,
            available_spots: stats.available_spots,
            occupied_spots: stats.occupied_spots,
            reserved_spots: stats.reserved_spots,
            maintenance_spots: stats.maintenance_spots,
            total_revenue: billing::cents_to_amount(stats.total_revenue_cents),
        }
    }
}
