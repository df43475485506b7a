//! Parking spot aggregate
//!
//! Contains the spot entity, the status state machine and listing filters.

pub mod filter;
pub mod model;

pub use filter::SpotFilter;
pub use model::{ParkingSpot, SpotStatus, SpotType};
