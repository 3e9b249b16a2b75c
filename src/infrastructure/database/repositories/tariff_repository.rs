//! SeaORM implementation of TariffRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::domain::tariff::{Tariff, TariffKind, TariffRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::tariff;

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

fn entity_to_domain(t: tariff::Model) -> Tariff {
    Tariff {
        id: t.id,
        kind: match t.kind {
            tariff::TariffKind::Water => TariffKind::Water,
            tariff::TariffKind::Maintenance => TariffKind::Maintenance,
        },
        price: t.price,
        created_at: t.created_at,
        updated_at: t.updated_at,
    }
}

fn kind_to_entity(kind: &TariffKind) -> tariff::TariffKind {
    match kind {
        TariffKind::Water => tariff::TariffKind::Water,
        TariffKind::Maintenance => tariff::TariffKind::Maintenance,
    }
}

// ── SeaOrmTariffRepository ──────────────────────────────────────

pub struct SeaOrmTariffRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TariffRepository for SeaOrmTariffRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>> {
        let model = tariff::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_kind(&self, kind: &TariffKind) -> DomainResult<Option<Tariff>> {
        // First by id: the arbitrary-but-stable pick among duplicates
        let model = tariff::Entity::find()
            .filter(tariff::Column::Kind.eq(kind_to_entity(kind)))
            .order_by_asc(tariff::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Tariff>> {
        let models = tariff::Entity::find()
            .order_by_asc(tariff::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn save(&self, t: Tariff) -> DomainResult<Tariff> {
        let now = Utc::now();
        let model = tariff::ActiveModel {
            id: NotSet,
            kind: Set(kind_to_entity(&t.kind)),
            price: Set(t.price),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        let saved = entity_to_domain(result);
        info!("Tariff saved: {} ({})", saved.kind, saved.id);
        Ok(saved)
    }

    async fn update(&self, t: Tariff) -> DomainResult<()> {
        let existing = tariff::Entity::find_by_id(t.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Tariff",
                field: "id",
                value: t.id.to_string(),
            });
        };

        let model = tariff::ActiveModel {
            id: Set(t.id),
            kind: Set(kind_to_entity(&t.kind)),
            price: Set(t.price),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = tariff::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Tariff",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
