//! Create parking_spots table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSpots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::SpotNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::SpotType)
                            .string()
                            .not_null()
                            .default("regular"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::HourlyRateCents)
                            .big_integer()
                            .not_null()
                            .default(500),
                    )
                    .col(ColumnDef::new(ParkingSpots::VehicleLicense).string())
                    .col(ColumnDef::new(ParkingSpots::DriverName).string())
                    .col(ColumnDef::new(ParkingSpots::DriverPhone).string())
                    .col(ColumnDef::new(ParkingSpots::EntryTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ParkingSpots::ExitTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(ParkingSpots::LastFeeCents).big_integer())
                    .col(
                        ColumnDef::new(ParkingSpots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Spot numbers are unique within the lot
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spots_spot_number")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::SpotNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpots {
    Table,
    Id,
    SpotNumber,
    SpotType,
    Status,
    HourlyRateCents,
    VehicleLicense,
    DriverName,
    DriverPhone,
    EntryTime,
    ExitTime,
    LastFeeCents,
    CreatedAt,
    UpdatedAt,
}
