//! In-memory repository implementations

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::house::{House, HouseRepository, WaterReading};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::{Tariff, TariffKind, TariffRepository};
use crate::domain::{DomainError, DomainResult};

/// In-memory house repository for development and testing
///
/// Houses are stored as whole aggregates; readings are kept per meter id
/// in insertion order and sorted on read.
#[derive(Default)]
pub struct InMemoryHouseRepository {
    houses: DashMap<i32, House>,
    readings: DashMap<i32, Vec<WaterReading>>,
}

impl InMemoryHouseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_house(&self, house: House) {
        self.houses.insert(house.id, house);
    }

    pub fn put_reading(&self, reading: WaterReading) {
        self.readings
            .entry(reading.water_meter_id)
            .or_default()
            .push(reading);
    }
}

#[async_trait]
impl HouseRepository for InMemoryHouseRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<House>> {
        Ok(self.houses.get(&id).map(|h| h.clone()))
    }

    async fn readings_for_meter(&self, water_meter_id: i32) -> DomainResult<Vec<WaterReading>> {
        let mut readings = self
            .readings
            .get(&water_meter_id)
            .map(|r| r.clone())
            .unwrap_or_default();
        // Stable sort: duplicates within one period keep insertion order,
        // so the first inserted wins on lookup.
        readings.sort_by_key(|r| (r.year, r.month));
        Ok(readings)
    }
}

/// In-memory tariff repository for development and testing
pub struct InMemoryTariffRepository {
    tariffs: DashMap<i32, Tariff>,
    id_counter: AtomicI32,
}

impl InMemoryTariffRepository {
    /// Seeded with the same water/maintenance defaults the database
    /// migration inserts.
    pub fn new() -> Self {
        let repo = Self::empty();
        let now = Utc::now();
        repo.tariffs.insert(
            1,
            Tariff {
                id: 1,
                kind: TariffKind::Water,
                price: 35.50,
                created_at: now,
                updated_at: now,
            },
        );
        repo.tariffs.insert(
            2,
            Tariff {
                id: 2,
                kind: TariffKind::Maintenance,
                price: 28.75,
                created_at: now,
                updated_at: now,
            },
        );
        repo.id_counter.store(3, Ordering::SeqCst);
        repo
    }

    /// No seeded tariffs; for tests exercising missing-tariff paths.
    pub fn empty() -> Self {
        Self {
            tariffs: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryTariffRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TariffRepository for InMemoryTariffRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>> {
        Ok(self.tariffs.get(&id).map(|t| t.clone()))
    }

    async fn find_by_kind(&self, kind: &TariffKind) -> DomainResult<Option<Tariff>> {
        // First by id, matching the database repository's pick among
        // duplicate kinds
        let mut matches: Vec<Tariff> = self
            .tariffs
            .iter()
            .filter(|t| t.kind == *kind)
            .map(|t| t.clone())
            .collect();
        matches.sort_by_key(|t| t.id);
        Ok(matches.into_iter().next())
    }

    async fn find_all(&self) -> DomainResult<Vec<Tariff>> {
        let mut tariffs: Vec<Tariff> = self.tariffs.iter().map(|t| t.clone()).collect();
        tariffs.sort_by_key(|t| t.id);
        Ok(tariffs)
    }

    async fn save(&self, mut tariff: Tariff) -> DomainResult<Tariff> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        tariff.id = id;
        tariff.created_at = now;
        tariff.updated_at = now;
        self.tariffs.insert(id, tariff.clone());
        Ok(tariff)
    }

    async fn update(&self, mut tariff: Tariff) -> DomainResult<()> {
        let Some(existing) = self.tariffs.get(&tariff.id).map(|t| t.clone()) else {
            return Err(DomainError::NotFound {
                entity: "Tariff",
                field: "id",
                value: tariff.id.to_string(),
            });
        };
        tariff.created_at = existing.created_at;
        tariff.updated_at = Utc::now();
        self.tariffs.insert(tariff.id, tariff);
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        if self.tariffs.remove(&id).is_none() {
            return Err(DomainError::NotFound {
                entity: "Tariff",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Bundles the in-memory repositories behind `RepositoryProvider`.
///
/// Fields are public so tests and dev setups can seed data directly.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    pub houses: InMemoryHouseRepository,
    pub tariffs: InMemoryTariffRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with no seeded tariffs.
    pub fn without_tariffs() -> Self {
        Self {
            houses: InMemoryHouseRepository::new(),
            tariffs: InMemoryTariffRepository::empty(),
        }
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn houses(&self) -> &dyn HouseRepository {
        &self.houses
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::house::{Apartment, WaterMeter};

    fn sample_house(id: i32) -> House {
        House {
            id,
            address: "ул. Ленина, 1".to_string(),
            apartments: vec![Apartment {
                id: 10,
                area: 45.0,
                water_meters: vec![WaterMeter { id: 100 }],
            }],
        }
    }

    fn reading(id: i32, meter: i32, year: i32, month: i32, value: f64) -> WaterReading {
        WaterReading {
            id,
            water_meter_id: meter,
            month,
            year,
            value,
        }
    }

    #[tokio::test]
    async fn house_round_trip() {
        let repo = InMemoryHouseRepository::new();
        repo.put_house(sample_house(1));

        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.address, "ул. Ленина, 1");
        assert_eq!(found.apartment_count(), 1);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn readings_come_back_ordered_by_period() {
        let repo = InMemoryHouseRepository::new();
        repo.put_reading(reading(1, 100, 2024, 2, 150.0));
        repo.put_reading(reading(2, 100, 2023, 12, 100.0));
        repo.put_reading(reading(3, 100, 2024, 1, 120.0));

        let readings = repo.readings_for_meter(100).await.unwrap();
        let periods: Vec<(i32, i32)> = readings.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(periods, vec![(2023, 12), (2024, 1), (2024, 2)]);
    }

    #[tokio::test]
    async fn duplicate_period_keeps_insertion_order() {
        let repo = InMemoryHouseRepository::new();
        repo.put_reading(reading(1, 100, 2024, 1, 120.0));
        repo.put_reading(reading(2, 100, 2024, 1, 999.0));

        let readings = repo.readings_for_meter(100).await.unwrap();
        assert_eq!(readings[0].value, 120.0);
        assert_eq!(readings[1].value, 999.0);
    }

    #[tokio::test]
    async fn seeded_tariffs_cover_both_kinds() {
        let repo = InMemoryTariffRepository::new();
        let water = repo.find_by_kind(&TariffKind::Water).await.unwrap().unwrap();
        let maintenance = repo
            .find_by_kind(&TariffKind::Maintenance)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(water.price, 35.50);
        assert_eq!(maintenance.price, 28.75);
    }

    #[tokio::test]
    async fn find_by_kind_picks_lowest_id_among_duplicates() {
        let repo = InMemoryTariffRepository::new();
        let now = Utc::now();
        // Second water tariff with a higher id
        repo.save(Tariff {
            id: 0,
            kind: TariffKind::Water,
            price: 99.0,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

        let picked = repo.find_by_kind(&TariffKind::Water).await.unwrap().unwrap();
        assert_eq!(picked.id, 1);
        assert_eq!(picked.price, 35.50);
    }

    #[tokio::test]
    async fn update_missing_tariff_is_not_found() {
        let repo = InMemoryTariffRepository::empty();
        let now = Utc::now();
        let err = repo
            .update(Tariff {
                id: 7,
                kind: TariffKind::Water,
                price: 1.0,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = InMemoryTariffRepository::empty();
        let now = Utc::now();
        let t = Tariff {
            id: 0,
            kind: TariffKind::Water,
            price: 10.0,
            created_at: now,
            updated_at: now,
        };
        let first = repo.save(t.clone()).await.unwrap();
        let second = repo.save(t).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }
}
