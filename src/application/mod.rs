//! Business logic and use cases

pub mod services;

pub use services::{CheckIn, DashboardStats, NewSpot, SpotService, SpotUpdate, StatsService};
