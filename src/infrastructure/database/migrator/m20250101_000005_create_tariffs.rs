//! Create tariffs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tariffs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tariffs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tariffs::Kind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tariffs::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Tariffs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tariffs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Non-unique: duplicate kinds are tolerated, lookup takes the
        // first by id.
        manager
            .create_index(
                Index::create()
                    .name("idx_tariffs_kind")
                    .table(Tariffs::Table)
                    .col(Tariffs::Kind)
                    .to_owned(),
            )
            .await?;

        // Seed the two kinds the billing engine requires
        let insert = Query::insert()
            .into_table(Tariffs::Table)
            .columns([
                Tariffs::Kind,
                Tariffs::Price,
                Tariffs::CreatedAt,
                Tariffs::UpdatedAt,
            ])
            .values_panic([
                "water".into(),
                35.50.into(), // per m³
                chrono::Utc::now().to_rfc3339().into(),
                chrono::Utc::now().to_rfc3339().into(),
            ])
            .values_panic([
                "maintenance".into(),
                28.75.into(), // per m²
                chrono::Utc::now().to_rfc3339().into(),
                chrono::Utc::now().to_rfc3339().into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tariffs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tariffs {
    Table,
    Id,
    Kind,
    Price,
    CreatedAt,
    UpdatedAt,
}
