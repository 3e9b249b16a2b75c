//! SeaORM implementation of HouseRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::house::{Apartment, House, HouseRepository, WaterMeter, WaterReading};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{apartment, house, water_meter, water_reading};

pub struct SeaOrmHouseRepository {
    db: DatabaseConnection,
}

impl SeaOrmHouseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

fn reading_to_domain(model: water_reading::Model) -> WaterReading {
    WaterReading {
        id: model.id,
        water_meter_id: model.water_meter_id,
        month: model.month,
        year: model.year,
        value: model.value,
    }
}

async fn load_meters(db: &DatabaseConnection, apartment_id: i32) -> DomainResult<Vec<WaterMeter>> {
    let models = water_meter::Entity::find()
        .filter(water_meter::Column::ApartmentId.eq(apartment_id))
        .order_by_asc(water_meter::Column::Id)
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(models.into_iter().map(|m| WaterMeter { id: m.id }).collect())
}

async fn load_apartments(db: &DatabaseConnection, house_id: i32) -> DomainResult<Vec<Apartment>> {
    let models = apartment::Entity::find()
        .filter(apartment::Column::HouseId.eq(house_id))
        .order_by_asc(apartment::Column::Id)
        .all(db)
        .await
        .map_err(db_err)?;

    let mut apartments = Vec::with_capacity(models.len());
    for model in models {
        let water_meters = load_meters(db, model.id).await?;
        apartments.push(Apartment {
            id: model.id,
            area: model.area,
            water_meters,
        });
    }
    Ok(apartments)
}

// ── HouseRepository impl ────────────────────────────────────────

#[async_trait]
impl HouseRepository for SeaOrmHouseRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<House>> {
        let model = house::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let apartments = load_apartments(&self.db, model.id).await?;
        Ok(Some(House {
            id: model.id,
            address: model.address,
            apartments,
        }))
    }

    async fn readings_for_meter(&self, water_meter_id: i32) -> DomainResult<Vec<WaterReading>> {
        let models = water_reading::Entity::find()
            .filter(water_reading::Column::WaterMeterId.eq(water_meter_id))
            .order_by_asc(water_reading::Column::Year)
            .order_by_asc(water_reading::Column::Month)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(reading_to_domain).collect())
    }
}
