//! Database storage implementation using SeaORM

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{parking_session, spot};
use crate::domain::{
    DomainError, DomainResult, ParkingSession, ParkingSpot, SpotStatus, SpotType, Storage,
};

/// Database storage implementation
pub struct DatabaseStorage {
    db: DatabaseConnection,
}

impl DatabaseStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get database connection reference
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// Helper functions for domain <-> entity conversion

fn entity_status_to_domain(s: spot::SpotStatus) -> SpotStatus {
    match s {
        spot::SpotStatus::Available => SpotStatus::Available,
        spot::SpotStatus::Occupied => SpotStatus::Occupied,
        spot::SpotStatus::Reserved => SpotStatus::Reserved,
        spot::SpotStatus::Maintenance => SpotStatus::Maintenance,
    }
}

fn domain_status_to_entity(s: SpotStatus) -> spot::SpotStatus {
    match s {
        SpotStatus::Available => spot::SpotStatus::Available,
        SpotStatus::Occupied => spot::SpotStatus::Occupied,
        SpotStatus::Reserved => spot::SpotStatus::Reserved,
        SpotStatus::Maintenance => spot::SpotStatus::Maintenance,
    }
}

fn entity_type_to_domain(t: spot::SpotType) -> SpotType {
    match t {
        spot::SpotType::Regular => SpotType::Regular,
        spot::SpotType::Handicap => SpotType::Handicap,
        spot::SpotType::Vip => SpotType::Vip,
        spot::SpotType::Electric => SpotType::Electric,
    }
}

fn domain_type_to_entity(t: SpotType) -> spot::SpotType {
    match t {
        SpotType::Regular => spot::SpotType::Regular,
        SpotType::Handicap => spot::SpotType::Handicap,
        SpotType::Vip => spot::SpotType::Vip,
        SpotType::Electric => spot::SpotType::Electric,
    }
}

fn spot_entity_to_domain(m: spot::Model) -> ParkingSpot {
    ParkingSpot {
        id: m.id,
        spot_number: m.spot_number,
        spot_type: entity_type_to_domain(m.spot_type),
        status: entity_status_to_domain(m.status),
        hourly_rate_cents: m.hourly_rate_cents,
        vehicle_license: m.vehicle_license,
        driver_name: m.driver_name,
        driver_phone: m.driver_phone,
        entry_time: m.entry_time,
        exit_time: m.exit_time,
        last_fee_cents: m.last_fee_cents,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn spot_domain_to_active(s: ParkingSpot) -> spot::ActiveModel {
    spot::ActiveModel {
        id: Set(s.id),
        spot_number: Set(s.spot_number),
        spot_type: Set(domain_type_to_entity(s.spot_type)),
        status: Set(domain_status_to_entity(s.status)),
        hourly_rate_cents: Set(s.hourly_rate_cents),
        vehicle_license: Set(s.vehicle_license),
        driver_name: Set(s.driver_name),
        driver_phone: Set(s.driver_phone),
        entry_time: Set(s.entry_time),
        exit_time: Set(s.exit_time),
        last_fee_cents: Set(s.last_fee_cents),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn session_entity_to_domain(m: parking_session::Model) -> ParkingSession {
    ParkingSession {
        id: m.id,
        spot_id: m.spot_id,
        spot_number: m.spot_number,
        vehicle_license: m.vehicle_license,
        driver_name: m.driver_name,
        entry_time: m.entry_time,
        exit_time: m.exit_time,
        fee_cents: m.fee_cents,
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn save_spot(&self, s: ParkingSpot) -> DomainResult<()> {
        let duplicate = spot::Entity::find()
            .filter(spot::Column::SpotNumber.eq(s.spot_number.clone()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(DomainError::Conflict(format!(
                "spot number '{}' already exists",
                s.spot_number
            )));
        }

        // A concurrent create can slip past the pre-check; the unique
        // index on spot_number decides, and its violation is a conflict,
        // not a storage failure.
        let spot_number = s.spot_number.clone();
        match spot_domain_to_active(s).insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(DomainError::Conflict(format!(
                    "spot number '{}' already exists",
                    spot_number
                ))),
                _ => Err(db_err(e)),
            },
        }
    }

    async fn get_spot(&self, id: Uuid) -> DomainResult<Option<ParkingSpot>> {
        let found = spot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(spot_entity_to_domain))
    }

    async fn find_spot_by_number(&self, spot_number: &str) -> DomainResult<Option<ParkingSpot>> {
        let found = spot::Entity::find()
            .filter(spot::Column::SpotNumber.eq(spot_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(spot_entity_to_domain))
    }

    async fn update_spot(&self, s: ParkingSpot) -> DomainResult<()> {
        let existing = spot::Entity::find_by_id(s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Spot", s.id));
        }

        spot_domain_to_active(s)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_spot(&self, id: Uuid) -> DomainResult<()> {
        let result = spot::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Spot", id));
        }
        Ok(())
    }

    async fn list_spots(&self) -> DomainResult<Vec<ParkingSpot>> {
        let rows = spot::Entity::find()
            .order_by_asc(spot::Column::CreatedAt)
            .order_by_asc(spot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(spot_entity_to_domain).collect())
    }

    async fn complete_checkout(
        &self,
        s: ParkingSpot,
        session: ParkingSession,
    ) -> DomainResult<ParkingSession> {
        // Spot write and ledger append commit together; a dropped
        // transaction rolls both back.
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = spot::Entity::find_by_id(s.id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Spot", s.id));
        }

        spot_domain_to_active(s)
            .update(&txn)
            .await
            .map_err(db_err)?;

        let active = parking_session::ActiveModel {
            id: NotSet,
            spot_id: Set(session.spot_id),
            spot_number: Set(session.spot_number),
            vehicle_license: Set(session.vehicle_license),
            driver_name: Set(session.driver_name),
            entry_time: Set(session.entry_time),
            exit_time: Set(session.exit_time),
            fee_cents: Set(session.fee_cents),
        };
        let inserted = active.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(session_entity_to_domain(inserted))
    }

    async fn list_sessions_for_spot(&self, spot_id: Uuid) -> DomainResult<Vec<ParkingSession>> {
        let rows = parking_session::Entity::find()
            .filter(parking_session::Column::SpotId.eq(spot_id))
            .order_by_asc(parking_session::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(session_entity_to_domain).collect())
    }

    async fn total_revenue_cents(&self) -> DomainResult<i64> {
        // Ledger stays small enough for a full scan; switch to a SUM
        // query if that ever stops being true.
        let rows = parking_session::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(|r| r.fee_cents).sum())
    }
}
