//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::house::HouseRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::TariffRepository;

use super::house_repository::SeaOrmHouseRepository;
use super::tariff_repository::SeaOrmTariffRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let house = repos.houses().find_by_id(1).await?;
/// let tariff = repos.tariffs().find_by_kind(&TariffKind::Water).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    houses: SeaOrmHouseRepository,
    tariffs: SeaOrmTariffRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            houses: SeaOrmHouseRepository::new(db.clone()),
            tariffs: SeaOrmTariffRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn houses(&self) -> &dyn HouseRepository {
        &self.houses
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }
}
