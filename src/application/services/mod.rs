//! Application services

pub mod spot;
pub mod stats;

pub use spot::{CheckIn, NewSpot, SpotService, SpotUpdate};
pub use stats::{DashboardStats, StatsService};
