//! API handlers

pub mod dashboard;
pub mod health;
pub mod spots;

pub use dashboard::DashboardHandlerState;
pub use health::*;
pub use spots::SpotHandlerState;
