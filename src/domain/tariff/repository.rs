//! Tariff repository interface

use async_trait::async_trait;

use super::model::{Tariff, TariffKind};
use crate::domain::DomainResult;

#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>>;

    /// First tariff of the given kind in ascending id order.
    /// Duplicate kinds are tolerated; the pick among them is arbitrary.
    async fn find_by_kind(&self, kind: &TariffKind) -> DomainResult<Option<Tariff>>;

    async fn find_all(&self) -> DomainResult<Vec<Tariff>>;
    async fn save(&self, tariff: Tariff) -> DomainResult<Tariff>;
    async fn update(&self, tariff: Tariff) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
