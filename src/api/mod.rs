//! REST API module
//!
//! HTTP endpoints for managing parking spots, the occupancy lifecycle
//! and dashboard statistics.

pub mod dto;
pub mod handlers;
pub mod router;

pub use router::{create_api_router, ApiState};
