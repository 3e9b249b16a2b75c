//! Create apartments table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_houses::Houses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Apartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Apartments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Apartments::HouseId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Apartments::Area)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_apartments_house")
                            .from(Apartments::Table, Apartments::HouseId)
                            .to(Houses::Table, Houses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_apartments_house")
                    .table(Apartments::Table)
                    .col(Apartments::HouseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Apartments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Apartments {
    Table,
    Id,
    HouseId,
    Area,
}
