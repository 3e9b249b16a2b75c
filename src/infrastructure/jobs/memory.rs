//! In-memory job store implementation

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::billing::{ApartmentCharge, BillingJob, JobState, JobStore};
use crate::domain::{DomainError, DomainResult};

/// In-memory job store backed by a concurrent map.
///
/// Records are never evicted here; retention is a deployment concern.
/// A restart therefore loses job history, which is acceptable for a
/// store whose contents are only meaningful while pollers are watching.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, BillingJob>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: Uuid) -> DomainError {
        DomainError::NotFound {
            entity: "BillingJob",
            field: "id",
            value: id.to_string(),
        }
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: BillingJob) -> DomainResult<()> {
        self.jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<BillingJob>> {
        Ok(self.jobs.get(&id).map(|j| j.clone()))
    }

    async fn mark_running(&self, id: Uuid) -> DomainResult<()> {
        let mut entry = self.jobs.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if entry.state.is_terminal() {
            return Ok(());
        }
        entry.state = JobState::Running;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn update_progress(&self, id: Uuid, progress: f64) -> DomainResult<()> {
        let mut entry = self.jobs.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if entry.state.is_terminal() {
            return Ok(());
        }
        // Monotonic: a retried run restarting from zero must not regress
        // what pollers have already observed.
        if progress > entry.progress {
            entry.progress = progress.min(100.0);
            entry.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn complete(&self, id: Uuid, charges: Vec<ApartmentCharge>) -> DomainResult<()> {
        let mut entry = self.jobs.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if entry.state.is_terminal() {
            return Ok(());
        }
        entry.state = JobState::Done;
        entry.progress = 100.0;
        entry.charges = Some(charges);
        entry.error = None;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn fail(&self, id: Uuid, error: String) -> DomainResult<()> {
        let mut entry = self.jobs.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        if entry.state.is_terminal() {
            return Ok(());
        }
        entry.state = JobState::Failed;
        // Progress keeps its last written value so pollers see where the
        // run stopped.
        entry.error = Some(error);
        entry.updated_at = Utc::now();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
