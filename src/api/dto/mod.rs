//! API data transfer objects

pub mod common;
pub mod spot;
pub mod stats;

pub use common::{error_response, ErrorResponse, MessageResponse};
pub use spot::{
    CheckInRequest, CreateSpotRequest, SessionDto, SpotDto, SpotListQuery, UpdateSpotRequest,
};
pub use stats::DashboardStatsDto;
