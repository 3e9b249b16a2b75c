//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_houses;
mod m20250101_000002_create_apartments;
mod m20250101_000003_create_water_meters;
mod m20250101_000004_create_water_readings;
mod m20250101_000005_create_tariffs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_houses::Migration),
            Box::new(m20250101_000002_create_apartments::Migration),
            Box::new(m20250101_000003_create_water_meters::Migration),
            Box::new(m20250101_000004_create_water_readings::Migration),
            Box::new(m20250101_000005_create_tariffs::Migration),
        ]
    }
}
