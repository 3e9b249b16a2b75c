//! Billing job dispatcher
//!
//! Single entry point for the HTTP layer: validates billing requests,
//! creates the job record, spawns the engine run on the runtime and
//! owns the cancellation tokens of in-flight jobs.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::engine::{BillingEngine, BillingRequest};
use crate::domain::billing::BillingJob;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult, JobStore};
use crate::shared::cancel::CancelToken;
use crate::shared::utills::retry::{retry_with_backoff, RetryConfig};

/// Record billing job duration to Prometheus.
fn record_job_duration(outcome: &'static str, started: Instant) {
    let duration = started.elapsed().as_secs_f64();
    metrics::histogram!("billing_job_duration_seconds", "outcome" => outcome).record(duration);
}

/// Orchestrates billing jobs.
///
/// `enqueue` returns as soon as the job record exists; the computation
/// itself runs on a spawned task. Progress and the final outcome are
/// observable only through the job store. Transient repository errors
/// restart the whole run; the store's monotonic progress keeps retries
/// invisible to pollers.
pub struct BillingDispatcher {
    repos: Arc<dyn RepositoryProvider>,
    jobs: Arc<dyn JobStore>,
    retry: RetryConfig,
    /// Cancel tokens of jobs that are still in flight
    running: DashMap<Uuid, CancelToken>,
}

impl BillingDispatcher {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jobs: Arc<dyn JobStore>) -> Self {
        Self {
            repos,
            jobs,
            retry: RetryConfig::default(),
            running: DashMap::new(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Request validation happens before any job record exists, so a
    /// rejected request leaves no trace.
    fn validate(request: &BillingRequest) -> DomainResult<()> {
        if !(1..=12).contains(&request.month) {
            return Err(DomainError::Validation(format!(
                "month must be between 1 and 12, got {}",
                request.month
            )));
        }
        if !(1900..=2100).contains(&request.year) {
            return Err(DomainError::Validation(format!(
                "year must be between 1900 and 2100, got {}",
                request.year
            )));
        }
        Ok(())
    }

    /// Validate and enqueue a billing job.
    ///
    /// The returned id is immediately pollable: the record is inserted
    /// as `pending` before the engine task is spawned.
    pub async fn enqueue(self: &Arc<Self>, request: BillingRequest) -> DomainResult<Uuid> {
        Self::validate(&request)?;

        let job = BillingJob::new(request.house_id, request.year, request.month);
        let job_id = job.id;
        self.jobs.insert(job).await?;

        let cancel = CancelToken::new();
        self.running.insert(job_id, cancel.clone());

        metrics::counter!("billing_jobs_started_total").increment(1);
        info!(
            job_id = %job_id,
            house_id = request.house_id,
            year = request.year,
            month = request.month,
            "Billing job enqueued"
        );

        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            dispatcher.execute(job_id, request, cancel).await;
        });

        Ok(job_id)
    }

    /// Current job record for polling.
    pub async fn status(&self, job_id: Uuid) -> DomainResult<Option<BillingJob>> {
        self.jobs.get(job_id).await
    }

    /// Request cancellation of an in-flight job.
    ///
    /// Flips the token the engine checks between apartments; the job
    /// transitions to `failed` once the engine observes it. Returns
    /// `false` when the job is unknown or already finished.
    pub fn cancel(&self, job_id: Uuid) -> bool {
        match self.running.get(&job_id) {
            Some(token) => {
                token.cancel();
                metrics::counter!("billing_jobs_cancelled_total").increment(1);
                info!(job_id = %job_id, "Billing job cancellation requested");
                true
            }
            None => false,
        }
    }

    async fn execute(&self, job_id: Uuid, request: BillingRequest, cancel: CancelToken) {
        let started = Instant::now();

        if let Err(e) = self.jobs.mark_running(job_id).await {
            error!(job_id = %job_id, error = %e, "Failed to mark billing job running");
            self.running.remove(&job_id);
            return;
        }

        let engine = BillingEngine::new(self.repos.clone(), self.jobs.clone());
        let result = retry_with_backoff(
            self.retry.clone(),
            || engine.run(job_id, &request, &cancel),
            |error| error.is_transient(),
            "billing_run",
        )
        .await;

        // The token goes away before the terminal write: once a poller
        // sees a terminal state, cancel() already returns false.
        self.running.remove(&job_id);

        match result {
            Ok(charges) => {
                if let Err(e) = self.jobs.complete(job_id, charges).await {
                    error!(job_id = %job_id, error = %e, "Failed to store billing result");
                }
                metrics::counter!("billing_jobs_completed_total").increment(1);
                record_job_duration("done", started);
                info!(job_id = %job_id, "Billing job completed");
            }
            Err(err) => {
                let outcome = if matches!(err, DomainError::Cancelled) {
                    "cancelled"
                } else {
                    metrics::counter!("billing_jobs_failed_total").increment(1);
                    "failed"
                };
                if let Err(e) = self.jobs.fail(job_id, err.to_string()).await {
                    error!(job_id = %job_id, error = %e, "Failed to store billing error");
                }
                record_job_duration(outcome, started);
                warn!(job_id = %job_id, error = %err, "Billing job failed");
            }
        }
    }
}

pub type SharedBillingDispatcher = Arc<BillingDispatcher>;

pub fn create_billing_dispatcher(
    repos: Arc<dyn RepositoryProvider>,
    jobs: Arc<dyn JobStore>,
    retry: RetryConfig,
) -> SharedBillingDispatcher {
    Arc::new(BillingDispatcher::new(repos, jobs).with_retry_config(retry))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{watch, Notify};
    use tokio::time::{sleep, timeout};

    use crate::domain::house::{Apartment, House, HouseRepository, WaterMeter, WaterReading};
    use crate::domain::tariff::TariffRepository;
    use crate::domain::JobState;
    use crate::infrastructure::jobs::InMemoryJobStore;
    use crate::infrastructure::storage::{InMemoryHouseRepository, InMemoryRepositoryProvider};

    fn request(house_id: i32, year: i32, month: i32) -> BillingRequest {
        BillingRequest {
            house_id,
            year,
            month,
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(10),
        }
    }

    fn sample_house(apartments: usize) -> House {
        House {
            id: 1,
            address: "ул. Ленина, 1".to_string(),
            apartments: (0..apartments as i32)
                .map(|i| Apartment {
                    id: 10 + i,
                    area: 45.0,
                    water_meters: vec![WaterMeter { id: 100 + i }],
                })
                .collect(),
        }
    }

    fn seed_readings(houses: &InMemoryHouseRepository, meter: i32) {
        houses.put_reading(WaterReading {
            id: 0,
            water_meter_id: meter,
            month: 1,
            year: 2024,
            value: 100.0,
        });
        houses.put_reading(WaterReading {
            id: 0,
            water_meter_id: meter,
            month: 2,
            year: 2024,
            value: 112.0,
        });
    }

    async fn poll_until_terminal(
        dispatcher: &SharedBillingDispatcher,
        job_id: Uuid,
    ) -> BillingJob {
        timeout(Duration::from_secs(5), async {
            loop {
                let job = dispatcher.status(job_id).await.unwrap().unwrap();
                if job.state.is_terminal() {
                    return job;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn enqueued_job_runs_to_done_with_charges() {
        let provider = InMemoryRepositoryProvider::new();
        provider.houses.put_house(sample_house(2));
        seed_readings(&provider.houses, 100);
        seed_readings(&provider.houses, 101);

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Done);
        assert_eq!(job.progress, 100.0);
        assert!(job.error.is_none());
        let charges = job.charges.unwrap();
        assert_eq!(charges.len(), 2);
        assert_eq!(charges[0].water_cost, 35.50 * 12.0);
        assert_eq!(charges[0].maintenance_cost, 28.75 * 45.0);
    }

    #[tokio::test]
    async fn invalid_month_is_rejected_before_enqueue() {
        let dispatcher = create_billing_dispatcher(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let err = dispatcher.enqueue(request(1, 2024, 13)).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("month"));
    }

    #[tokio::test]
    async fn out_of_range_year_is_rejected_before_enqueue() {
        let dispatcher = create_billing_dispatcher(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let err = dispatcher.enqueue(request(1, 1899, 6)).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_house_ends_failed_with_message() {
        let dispatcher = create_billing_dispatcher(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(99, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Failed);
        assert!(job.charges.is_none());
        assert!(job.error.unwrap().contains("House"));
    }

    #[tokio::test]
    async fn missing_tariff_ends_failed_without_partial_result() {
        let provider = InMemoryRepositoryProvider::without_tariffs();
        provider.houses.put_house(sample_house(2));

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Failed);
        assert!(job.charges.is_none());
        assert!(job.error.unwrap().contains("Tariff"));
    }

    #[tokio::test]
    async fn cancel_of_unknown_job_reports_false() {
        let dispatcher = create_billing_dispatcher(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        assert!(!dispatcher.cancel(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn finished_job_can_no_longer_be_cancelled() {
        let provider = InMemoryRepositoryProvider::new();
        provider.houses.put_house(sample_house(1));
        seed_readings(&provider.houses, 100);

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();
        poll_until_terminal(&dispatcher, job_id).await;

        assert!(!dispatcher.cancel(job_id));
    }

    // ── Retry behavior ─────────────────────────────────────────

    /// House repository that fails `find_by_id` a configured number of
    /// times before delegating, counting every call.
    struct FlakyHouseRepository {
        inner: InMemoryHouseRepository,
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyHouseRepository {
        fn new(failures: u32) -> Self {
            Self {
                inner: InMemoryHouseRepository::new(),
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HouseRepository for FlakyHouseRepository {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<House>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(DomainError::Database("connection lost".to_string()));
            }
            self.inner.find_by_id(id).await
        }

        async fn readings_for_meter(&self, meter_id: i32) -> DomainResult<Vec<WaterReading>> {
            self.inner.readings_for_meter(meter_id).await
        }
    }

    struct FlakyProvider {
        houses: Arc<FlakyHouseRepository>,
        tariffs: crate::infrastructure::storage::InMemoryTariffRepository,
    }

    impl RepositoryProvider for FlakyProvider {
        fn houses(&self) -> &dyn HouseRepository {
            self.houses.as_ref()
        }

        fn tariffs(&self) -> &dyn TariffRepository {
            &self.tariffs
        }
    }

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let houses = Arc::new(FlakyHouseRepository::new(2));
        houses.inner.put_house(sample_house(1));
        seed_readings(&houses.inner, 100);

        let provider = FlakyProvider {
            houses: houses.clone(),
            tariffs: crate::infrastructure::storage::InMemoryTariffRepository::new(),
        };

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Done);
        assert_eq!(houses.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_leave_the_job_failed() {
        let houses = Arc::new(FlakyHouseRepository::new(10));
        houses.inner.put_house(sample_house(1));

        let provider = FlakyProvider {
            houses: houses.clone(),
            tariffs: crate::infrastructure::storage::InMemoryTariffRepository::new(),
        };

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(houses.calls.load(Ordering::SeqCst), 3);
        assert!(job.error.unwrap().contains("connection lost"));
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let houses = Arc::new(FlakyHouseRepository::new(0));

        let provider = FlakyProvider {
            houses: houses.clone(),
            tariffs: crate::infrastructure::storage::InMemoryTariffRepository::new(),
        };

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(42, 2024, 2)).await.unwrap();
        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(houses.calls.load(Ordering::SeqCst), 1);
    }

    // ── Cancellation mid-run ───────────────────────────────────

    /// House repository whose reading lookups block until the gate
    /// opens, signalling each entry. Lets a test cancel a job while the
    /// engine is deterministically inside an apartment.
    struct GatedHouseRepository {
        inner: InMemoryHouseRepository,
        entered: Arc<Notify>,
        gate: watch::Receiver<bool>,
    }

    #[async_trait]
    impl HouseRepository for GatedHouseRepository {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<House>> {
            self.inner.find_by_id(id).await
        }

        async fn readings_for_meter(&self, meter_id: i32) -> DomainResult<Vec<WaterReading>> {
            self.entered.notify_one();
            let mut gate = self.gate.clone();
            gate.wait_for(|open| *open).await.ok();
            self.inner.readings_for_meter(meter_id).await
        }
    }

    struct GatedProvider {
        houses: GatedHouseRepository,
        tariffs: crate::infrastructure::storage::InMemoryTariffRepository,
    }

    impl RepositoryProvider for GatedProvider {
        fn houses(&self) -> &dyn HouseRepository {
            &self.houses
        }

        fn tariffs(&self) -> &dyn TariffRepository {
            &self.tariffs
        }
    }

    #[tokio::test]
    async fn cancelling_mid_run_stops_at_the_next_apartment_boundary() {
        let entered = Arc::new(Notify::new());
        let (open_gate, gate) = watch::channel(false);

        let inner = InMemoryHouseRepository::new();
        inner.put_house(sample_house(3));
        let provider = GatedProvider {
            houses: GatedHouseRepository {
                inner,
                entered: entered.clone(),
                gate,
            },
            tariffs: crate::infrastructure::storage::InMemoryTariffRepository::new(),
        };

        let dispatcher = create_billing_dispatcher(
            Arc::new(provider),
            Arc::new(InMemoryJobStore::new()),
            fast_retry(),
        );

        let job_id = dispatcher.enqueue(request(1, 2024, 2)).await.unwrap();

        // Engine is now inside the first apartment's reading lookup.
        timeout(Duration::from_secs(5), entered.notified())
            .await
            .unwrap();
        assert!(dispatcher.cancel(job_id));
        open_gate.send(true).unwrap();

        let job = poll_until_terminal(&dispatcher, job_id).await;

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.error.unwrap(), "Job cancelled");
        // First apartment finished, the remaining two never ran.
        assert!(job.progress < 100.0);
    }
}
