//! Parking spot entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spot lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SpotStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

/// Physical spot category
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SpotType {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "handicap")]
    Handicap,
    #[sea_orm(string_value = "vip")]
    Vip,
    #[sea_orm(string_value = "electric")]
    Electric,
}

/// Parking spot model - one row per physical space
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_spots")]
pub struct Model {
    /// Unique spot ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Short label, unique within the lot
    #[sea_orm(unique)]
    pub spot_number: String,

    pub spot_type: SpotType,

    pub status: SpotStatus,

    /// Hourly rate in smallest currency unit (cents)
    pub hourly_rate_cents: i64,

    /// License plate of the parked vehicle (occupied spots only)
    pub vehicle_license: Option<String>,

    pub driver_name: Option<String>,

    pub driver_phone: Option<String>,

    /// When the current vehicle checked in
    pub entry_time: Option<DateTime<Utc>>,

    /// When the most recent vehicle checked out
    pub exit_time: Option<DateTime<Utc>>,

    /// Fee of the most recent completed session, in cents
    pub last_fee_cents: Option<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
