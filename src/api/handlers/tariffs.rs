//! Tariff REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::ApiState;
use crate::api::validated_json::ValidatedJson;
use crate::domain::{DomainError, Tariff, TariffKind};

/// Тариф коммунальной услуги
///
/// Расчёт использует по одному тарифу каждого вида:
/// `water` — цена за м³ воды, `maintenance` — цена за м² площади.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TariffResponse {
    /// Уникальный ID тарифа
    pub id: i32,
    /// Вид тарифа: `water` или `maintenance`
    pub kind: String,
    /// Цена за единицу (м³ для воды, м² для обслуживания)
    pub price: f64,
    /// Дата создания
    pub created_at: DateTime<Utc>,
    /// Дата последнего обновления
    pub updated_at: DateTime<Utc>,
}

impl From<Tariff> for TariffResponse {
    fn from(t: Tariff) -> Self {
        Self {
            id: t.id,
            kind: t.kind.to_string(),
            price: t.price,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Запрос на создание тарифа
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTariffRequest {
    /// Вид тарифа: `water` или `maintenance`
    #[validate(length(min = 1))]
    pub kind: String,
    /// Цена за единицу (не может быть отрицательной)
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Запрос на обновление тарифа (partial update)
///
/// Передайте только изменяемые поля.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTariffRequest {
    /// Новый вид тарифа
    pub kind: Option<String>,
    /// Новая цена за единицу
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

fn parse_kind(raw: &str) -> Result<TariffKind, (StatusCode, Json<ApiResponse<()>>)> {
    TariffKind::parse(raw).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "Unknown tariff kind: {} (expected water or maintenance)",
                raw
            ))),
        )
    })
}

/// Список всех тарифов
#[utoipa::path(
    get,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    responses(
        (status = 200, description = "Список тарифов", body = ApiResponse<Vec<TariffResponse>>)
    )
)]
pub async fn list_tariffs(
    State(state): State<ApiState>,
) -> Result<Json<ApiResponse<Vec<TariffResponse>>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.repos.tariffs().find_all().await {
        Ok(tariffs) => {
            let responses: Vec<TariffResponse> = tariffs.into_iter().map(Into::into).collect();
            Ok(Json(ApiResponse::success(responses)))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to list tariffs: {}", e))),
        )),
    }
}

/// Получение тарифа по ID
#[utoipa::path(
    get,
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(
        ("id" = i32, Path, description = "ID тарифа")
    ),
    responses(
        (status = 200, description = "Полная информация о тарифе", body = ApiResponse<TariffResponse>),
        (status = 404, description = "Тариф не найден")
    )
)]
pub async fn get_tariff(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TariffResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.repos.tariffs().find_by_id(id).await {
        Ok(Some(tariff)) => Ok(Json(ApiResponse::success(tariff.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Tariff {} not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to get tariff: {}", e))),
        )),
    }
}

/// Создание нового тарифа
#[utoipa::path(
    post,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    request_body = CreateTariffRequest,
    responses(
        (status = 201, description = "Тариф успешно создан", body = ApiResponse<TariffResponse>),
        (status = 400, description = "Неизвестный вид тарифа"),
        (status = 422, description = "Некорректные данные")
    )
)]
pub async fn create_tariff(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<CreateTariffRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TariffResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    let kind = parse_kind(&req.kind)?;
    let now = Utc::now();

    let tariff = Tariff {
        id: 0, // Will be set by the repository
        kind,
        price: req.price,
        created_at: now,
        updated_at: now,
    };

    match state.repos.tariffs().save(tariff).await {
        Ok(saved) => Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into())))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create tariff: {}", e))),
        )),
    }
}

/// Обновление тарифа
///
/// Partial update — передайте только изменяемые поля.
#[utoipa::path(
    put,
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(
        ("id" = i32, Path, description = "ID тарифа")
    ),
    request_body = UpdateTariffRequest,
    responses(
        (status = 200, description = "Тариф успешно обновлён", body = ApiResponse<TariffResponse>),
        (status = 404, description = "Тариф не найден")
    )
)]
pub async fn update_tariff(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateTariffRequest>,
) -> Result<Json<ApiResponse<TariffResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let existing = match state.repos.tariffs().find_by_id(id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Tariff {} not found", id))),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to get tariff: {}", e))),
            ));
        }
    };

    let kind = match req.kind {
        Some(raw) => parse_kind(&raw)?,
        None => existing.kind,
    };

    let updated = Tariff {
        id: existing.id,
        kind,
        price: req.price.unwrap_or(existing.price),
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    match state.repos.tariffs().update(updated.clone()).await {
        Ok(()) => Ok(Json(ApiResponse::success(updated.into()))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to update tariff: {}", e))),
        )),
    }
}

/// Удаление тарифа
#[utoipa::path(
    delete,
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(
        ("id" = i32, Path, description = "ID тарифа")
    ),
    responses(
        (status = 200, description = "Тариф успешно удалён"),
        (status = 404, description = "Тариф не найден")
    )
)]
pub async fn delete_tariff(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.repos.tariffs().delete(id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Tariff deleted".to_string()))),
        Err(DomainError::NotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Tariff {} not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to delete tariff: {}", e))),
        )),
    }
}
