//! Health check endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub started_at: Arc<Instant>,
}

/// Состояние сервиса
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Статус: `ok` — сервис работает нормально
    pub status: String,
    /// Версия сервиса (из Cargo.toml)
    pub version: String,
    /// Время работы сервиса в секундах с момента запуска
    pub uptime_seconds: u64,
}

/// Проверка состояния сервиса
///
/// Возвращает текущий статус, версию и время работы.
/// Не требует авторизации. Используйте для мониторинга доступности.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Сервис работает нормально", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
