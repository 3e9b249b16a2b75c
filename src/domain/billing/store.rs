//! Job store interface — the progress record polled by clients

use async_trait::async_trait;
use uuid::Uuid;

use super::job::{ApartmentCharge, BillingJob};
use crate::domain::DomainResult;

/// Key-value store of billing job records, keyed by job handle.
///
/// Contract:
/// - Single writer per job (the engine execution that owns it); any
///   number of concurrent readers.
/// - Progress writes are monotonic: an update below the stored value is
///   ignored, so a retried run never regresses what pollers saw.
/// - Terminal states stick: once a job is `done` or `failed`, further
///   mutations are ignored.
/// - Records are never deleted here; retention is a deployment concern.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: BillingJob) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<BillingJob>>;

    async fn mark_running(&self, id: Uuid) -> DomainResult<()>;

    /// Write a progress percentage in [0, 100]. Values below the stored
    /// one are ignored.
    async fn update_progress(&self, id: Uuid, progress: f64) -> DomainResult<()>;

    /// Terminate as `done`: progress forced to 100, charges attached.
    async fn complete(&self, id: Uuid, charges: Vec<ApartmentCharge>) -> DomainResult<()>;

    /// Terminate as `failed` with a human-readable description.
    async fn fail(&self, id: Uuid, error: String) -> DomainResult<()>;
}
