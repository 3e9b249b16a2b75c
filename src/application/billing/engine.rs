//! Billing computation engine
//!
//! The core asynchronous task: for one house and one billing period,
//! read metering history, apply tariff rates, compute every apartment's
//! cost breakdown and publish per-apartment progress to the job store.
//! Runs decoupled from the request that enqueued it.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::billing::ApartmentCharge;
use crate::domain::house::{Apartment, WaterReading};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::{Tariff, TariffKind};
use crate::domain::{DomainError, DomainResult, JobStore};
use crate::shared::cancel::CancelToken;

/// One billing request: which house, which period
#[derive(Debug, Clone, Copy)]
pub struct BillingRequest {
    pub house_id: i32,
    pub year: i32,
    pub month: i32,
}

/// Water consumption of one meter for the requested period.
///
/// The reading matching `(year, month)` is the current one, the reading
/// matching `(year, month - 1)` the previous one; their delta is the
/// consumption. Month arithmetic deliberately does not roll over a year
/// boundary: month=1 asks for month 0, which never matches, so January
/// contributes zero regardless of December readings. A meter with fewer
/// than two readings contributes zero as well. Values are expected to be
/// non-decreasing, but a decrease is not rejected — it simply yields a
/// negative contribution.
fn period_consumption(readings: &[WaterReading], year: i32, month: i32) -> f64 {
    if readings.len() < 2 {
        return 0.0;
    }

    let current = readings.iter().find(|r| r.is_for(year, month));
    let previous = readings.iter().find(|r| r.is_for(year, month - 1));

    match (current, previous) {
        (Some(current), Some(previous)) => current.value - previous.value,
        _ => 0.0,
    }
}

/// Billing computation engine.
///
/// Stateless between runs; all collaborators are injected.
pub struct BillingEngine {
    repos: Arc<dyn RepositoryProvider>,
    jobs: Arc<dyn JobStore>,
}

impl BillingEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jobs: Arc<dyn JobStore>) -> Self {
        Self { repos, jobs }
    }

    /// Run one billing computation to completion.
    ///
    /// Loads the house and both tariffs, walks apartments in repository
    /// order, writes progress after each one and returns the accumulated
    /// charge list. The cancel token is only checked between apartments:
    /// charges are appended at apartment granularity, so stopping at a
    /// boundary needs no rollback.
    pub async fn run(
        &self,
        job_id: Uuid,
        request: &BillingRequest,
        cancel: &CancelToken,
    ) -> DomainResult<Vec<ApartmentCharge>> {
        let house = self
            .repos
            .houses()
            .find_by_id(request.house_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "House",
                field: "id",
                value: request.house_id.to_string(),
            })?;

        let water = self.tariff(TariffKind::Water).await?;
        let maintenance = self.tariff(TariffKind::Maintenance).await?;

        let total = house.apartment_count();
        info!(
            job_id = %job_id,
            house_id = house.id,
            apartments = total,
            year = request.year,
            month = request.month,
            "Billing run started"
        );

        let mut charges = Vec::with_capacity(total);
        for (index, apartment) in house.apartments.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(job_id = %job_id, apartment_id = apartment.id, "Billing run cancelled");
                return Err(DomainError::Cancelled);
            }

            let charge = self
                .charge_for_apartment(apartment, &water, &maintenance, request)
                .await?;
            debug!(
                job_id = %job_id,
                apartment_id = apartment.id,
                water_cost = charge.water_cost,
                maintenance_cost = charge.maintenance_cost,
                "Apartment billed"
            );
            charges.push(charge);

            let progress = ((index + 1) as f64 / total as f64) * 100.0;
            self.jobs.update_progress(job_id, progress).await?;
        }

        info!(job_id = %job_id, charges = charges.len(), "Billing run finished");
        Ok(charges)
    }

    async fn tariff(&self, kind: TariffKind) -> DomainResult<Tariff> {
        self.repos
            .tariffs()
            .find_by_kind(&kind)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Tariff",
                field: "kind",
                value: kind.to_string(),
            })
    }

    async fn charge_for_apartment(
        &self,
        apartment: &Apartment,
        water: &Tariff,
        maintenance: &Tariff,
        request: &BillingRequest,
    ) -> DomainResult<ApartmentCharge> {
        let mut consumption = 0.0;
        for meter in &apartment.water_meters {
            let readings = self.repos.houses().readings_for_meter(meter.id).await?;
            consumption += period_consumption(&readings, request.year, request.month);
        }

        let water_cost = water.cost(consumption);
        let maintenance_cost = maintenance.cost(apartment.area);
        Ok(ApartmentCharge {
            apartment_id: apartment.id,
            water_cost,
            maintenance_cost,
            total_cost: water_cost + maintenance_cost,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
