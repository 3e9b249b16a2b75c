//! House repository interface

use async_trait::async_trait;

use super::model::{House, WaterReading};
use crate::domain::DomainResult;

#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Load a house together with its apartments and their meters.
    /// Apartments come back in ascending id order.
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<House>>;

    /// All readings of one meter, ordered by (year, month) ascending.
    async fn readings_for_meter(&self, water_meter_id: i32) -> DomainResult<Vec<WaterReading>>;
}
