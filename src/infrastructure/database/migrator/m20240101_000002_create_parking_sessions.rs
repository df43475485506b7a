//! Create parking_sessions ledger table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSessions::SpotId).uuid().not_null())
                    .col(
                        ColumnDef::new(ParkingSessions::SpotNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::VehicleLicense)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSessions::DriverName).string())
                    .col(
                        ColumnDef::new(ParkingSessions::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::ExitTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::FeeCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_sessions_spot_id")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::SpotId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSessions {
    Table,
    Id,
    SpotId,
    SpotNumber,
    VehicleLicense,
    DriverName,
    EntryTime,
    ExitTime,
    FeeCents,
}
