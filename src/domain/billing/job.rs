//! Billing job record
//!
//! One `BillingJob` tracks one asynchronous billing computation run:
//! state, progress percentage and — once terminal — either the result
//! list or an error description. The record is created at enqueue time
//! and mutated only by the engine execution that owns it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lifecycle state of a billing job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not picked up by the engine yet
    Pending,
    /// Engine is computing; `progress` advances per apartment
    Running,
    /// Finished successfully, charges attached, progress is 100
    Done,
    /// Terminated with an error description (includes cancellation)
    Failed,
}

impl JobState {
    /// A job becomes terminal exactly once; terminal records are never
    /// mutated again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Cost breakdown for one apartment
#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentCharge {
    pub apartment_id: i32,
    pub water_cost: f64,
    pub maintenance_cost: f64,
    pub total_cost: f64,
}

/// One asynchronous billing computation run
#[derive(Debug, Clone)]
pub struct BillingJob {
    pub id: Uuid,
    pub house_id: i32,
    pub year: i32,
    pub month: i32,
    pub state: JobState,
    /// Percentage in [0, 100], written after each apartment
    pub progress: f64,
    /// Result list, attached only when the job completes
    pub charges: Option<Vec<ApartmentCharge>>,
    /// Human-readable failure description
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingJob {
    /// Fresh pending job with a random handle.
    pub fn new(house_id: i32, year: i32, month: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            house_id,
            year,
            month,
            state: JobState::Pending,
            progress: 0.0,
            charges: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_starts_pending_at_zero() {
        let job = BillingJob::new(1, 2024, 2);
        assert_eq!(job.state, JobState::Pending);
        assert_eq!(job.progress, 0.0);
        assert!(job.charges.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Done.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn states_render_lowercase() {
        assert_eq!(JobState::Pending.to_string(), "pending");
        assert_eq!(JobState::Running.to_string(), "running");
        assert_eq!(JobState::Done.to_string(), "done");
        assert_eq!(JobState::Failed.to_string(), "failed");
    }
}
