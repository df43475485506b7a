//! Parking session ledger entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Completed check-in/checkout cycle - append-only revenue ledger.
/// Rows are kept when the spot is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_sessions")]
pub struct Model {
    /// Ledger sequence number
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Spot the vehicle was parked at (no FK; history outlives spots)
    pub spot_id: Uuid,

    /// Spot label at checkout time
    pub spot_number: String,

    pub vehicle_license: String,

    pub driver_name: Option<String>,

    pub entry_time: DateTime<Utc>,

    pub exit_time: DateTime<Utc>,

    /// Finalized fee in cents
    pub fee_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
