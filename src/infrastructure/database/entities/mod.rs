//! Database entities

pub mod parking_session;
pub mod spot;
