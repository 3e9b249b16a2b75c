//! Create water_meters table

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_apartments::Apartments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaterMeters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaterMeters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WaterMeters::ApartmentId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_water_meters_apartment")
                            .from(WaterMeters::Table, WaterMeters::ApartmentId)
                            .to(Apartments::Table, Apartments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_water_meters_apartment")
                    .table(WaterMeters::Table)
                    .col(WaterMeters::ApartmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaterMeters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WaterMeters {
    Table,
    Id,
    ApartmentId,
}
