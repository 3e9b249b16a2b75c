//! Repository provider for the domain layer

use super::house::HouseRepository;
use super::tariff::TariffRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let house = repos.houses().find_by_id(1).await?;
///     let tariff = repos.tariffs().find_by_kind(&TariffKind::Water).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn houses(&self) -> &dyn HouseRepository;
    fn tariffs(&self) -> &dyn TariffRepository;
}
