//! Billing REST API handlers
//!
//! Enqueue endpoint returns 202 with a job id; computation progress and
//! the final result are polled via the job endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::ApiState;
use crate::api::validated_json::ValidatedJson;
use crate::application::BillingRequest;
use crate::domain::{ApartmentCharge, BillingJob, DomainError};

/// Запрос на запуск расчёта квартплаты
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartBillingRequest {
    /// Год расчётного периода (1900–2100)
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    /// Месяц расчётного периода (1–12)
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
}

/// Подтверждение постановки задачи в очередь
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobEnqueuedResponse {
    /// ID задачи для опроса статуса
    pub job_id: String,
}

/// Начисление по одной квартире
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApartmentChargeResponse {
    /// ID квартиры
    pub apartment_id: i32,
    /// Стоимость воды: потребление × тариф
    pub water_cost: f64,
    /// Стоимость обслуживания: площадь × тариф
    pub maintenance_cost: f64,
    /// Итого по квартире
    pub total_cost: f64,
}

impl From<ApartmentCharge> for ApartmentChargeResponse {
    fn from(c: ApartmentCharge) -> Self {
        Self {
            apartment_id: c.apartment_id,
            water_cost: c.water_cost,
            maintenance_cost: c.maintenance_cost,
            total_cost: c.total_cost,
        }
    }
}

/// Задача расчёта квартплаты
///
/// `state`: `pending` → `running` → `done` | `failed`.
/// `progress` монотонно растёт от 0 до 100 и обновляется после каждой
/// обработанной квартиры. `charges` заполняется только при `done`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingJobResponse {
    /// ID задачи
    pub id: String,
    /// ID дома
    pub house_id: i32,
    /// Год расчётного периода
    pub year: i32,
    /// Месяц расчётного периода
    pub month: i32,
    /// Состояние: `pending`, `running`, `done`, `failed`
    pub state: String,
    /// Прогресс выполнения (0–100)
    pub progress: f64,
    /// Начисления по квартирам. `null` пока задача не завершена
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<ApartmentChargeResponse>>,
    /// Описание ошибки. `null` если задача не упала
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Время создания задачи
    pub created_at: DateTime<Utc>,
    /// Время последнего обновления
    pub updated_at: DateTime<Utc>,
}

impl From<BillingJob> for BillingJobResponse {
    fn from(job: BillingJob) -> Self {
        Self {
            id: job.id.to_string(),
            house_id: job.house_id,
            year: job.year,
            month: job.month,
            state: job.state.to_string(),
            progress: job.progress,
            charges: job
                .charges
                .map(|charges| charges.into_iter().map(Into::into).collect()),
            error: job.error,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

fn parse_job_id(raw: &str) -> Result<Uuid, (StatusCode, Json<ApiResponse<()>>)> {
    Uuid::parse_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid job id: {}", raw))),
        )
    })
}

/// Запуск расчёта квартплаты для дома
///
/// Ставит задачу в очередь и сразу возвращает её ID (202). Сам расчёт
/// выполняется в фоне; статус и результат опрашиваются через
/// `GET /api/v1/billing/jobs/{job_id}`. Существование дома проверяется
/// уже внутри задачи: для неизвестного дома задача завершится со
/// статусом `failed`.
#[utoipa::path(
    post,
    path = "/api/v1/houses/{id}/billing",
    tag = "Billing",
    params(
        ("id" = i32, Path, description = "ID дома")
    ),
    request_body = StartBillingRequest,
    responses(
        (status = 202, description = "Задача поставлена в очередь", body = ApiResponse<JobEnqueuedResponse>),
        (status = 422, description = "Некорректный период (месяц или год вне диапазона)")
    )
)]
pub async fn start_billing(
    State(state): State<ApiState>,
    Path(house_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<StartBillingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobEnqueuedResponse>>), (StatusCode, Json<ApiResponse<()>>)>
{
    let request = BillingRequest {
        house_id,
        year: req.year,
        month: req.month,
    };

    match state.dispatcher.enqueue(request).await {
        Ok(job_id) => Ok((
            StatusCode::ACCEPTED,
            Json(ApiResponse::success(JobEnqueuedResponse {
                job_id: job_id.to_string(),
            })),
        )),
        Err(DomainError::Validation(message)) => {
            Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to enqueue billing: {}", e))),
        )),
    }
}

/// Статус задачи расчёта
///
/// Безопасно опрашивать многократно и конкурентно: чтение не влияет
/// на выполнение задачи. Прогресс никогда не уменьшается.
#[utoipa::path(
    get,
    path = "/api/v1/billing/jobs/{job_id}",
    tag = "Billing",
    params(
        ("job_id" = String, Path, description = "ID задачи (UUID)")
    ),
    responses(
        (status = 200, description = "Текущее состояние задачи", body = ApiResponse<BillingJobResponse>),
        (status = 404, description = "Задача не найдена")
    )
)]
pub async fn get_billing_job(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<BillingJobResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let job_id = parse_job_id(&job_id)?;

    match state.dispatcher.status(job_id).await {
        Ok(Some(job)) => Ok(Json(ApiResponse::success(job.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Job {} not found", job_id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to get job: {}", e))),
        )),
    }
}

/// Отмена задачи расчёта
///
/// Отмена кооперативная: движок проверяет флаг между квартирами,
/// поэтому задача останавливается на границе квартиры и переходит в
/// `failed`. Уже завершённую задачу отменить нельзя.
#[utoipa::path(
    post,
    path = "/api/v1/billing/jobs/{job_id}/cancel",
    tag = "Billing",
    params(
        ("job_id" = String, Path, description = "ID задачи (UUID)")
    ),
    responses(
        (status = 200, description = "Отмена запрошена", body = ApiResponse<String>),
        (status = 404, description = "Задача не найдена"),
        (status = 409, description = "Задача уже завершена")
    )
)]
pub async fn cancel_billing_job(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    let job_id = parse_job_id(&job_id)?;

    if state.dispatcher.cancel(job_id) {
        return Ok(Json(ApiResponse::success(
            "Cancellation requested".to_string(),
        )));
    }

    // No in-flight token: either the job finished or it never existed.
    match state.dispatcher.status(job_id).await {
        Ok(Some(_)) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error(format!("Job {} already finished", job_id))),
        )),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Job {} not found", job_id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to get job: {}", e))),
        )),
    }
}
