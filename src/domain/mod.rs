//! Core business entities, types and traits

pub mod billing;
pub mod error;
pub mod session;
pub mod spot;
pub mod storage;

// Re-export commonly used types
pub use billing::FeeBreakdown;
pub use error::{DomainError, DomainResult};
pub use session::ParkingSession;
pub use spot::{ParkingSpot, SpotFilter, SpotStatus, SpotType};
pub use storage::Storage;
