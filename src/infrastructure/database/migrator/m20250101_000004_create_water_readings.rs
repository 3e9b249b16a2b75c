//! Create water_readings table

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_water_meters::WaterMeters;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaterReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WaterReadings::WaterMeterId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaterReadings::Month)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaterReadings::Year)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaterReadings::Value)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_water_readings_meter")
                            .from(WaterReadings::Table, WaterReadings::WaterMeterId)
                            .to(WaterMeters::Table, WaterMeters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Deliberately non-unique: duplicate readings per (meter, period)
        // are tolerated, the first one in (year, month) order wins.
        manager
            .create_index(
                Index::create()
                    .name("idx_water_readings_meter_period")
                    .table(WaterReadings::Table)
                    .col(WaterReadings::WaterMeterId)
                    .col(WaterReadings::Year)
                    .col(WaterReadings::Month)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaterReadings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WaterReadings {
    Table,
    Id,
    WaterMeterId,
    Month,
    Year,
    Value,
}
