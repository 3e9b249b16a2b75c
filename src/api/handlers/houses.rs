//! House REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::application::SharedBillingDispatcher;
use crate::domain::house::{House, WaterReading};
use crate::domain::RepositoryProvider;

/// Shared state for house, billing and tariff routes
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub dispatcher: SharedBillingDispatcher,
}

/// Показание счётчика воды
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WaterReadingResponse {
    /// Уникальный ID показания
    pub id: i32,
    /// Месяц показания (1–12)
    pub month: i32,
    /// Год показания
    pub year: i32,
    /// Накопительное показание счётчика (м³)
    pub value: f64,
}

impl From<WaterReading> for WaterReadingResponse {
    fn from(r: WaterReading) -> Self {
        Self {
            id: r.id,
            month: r.month,
            year: r.year,
            value: r.value,
        }
    }
}

/// Счётчик воды с историей показаний
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WaterMeterResponse {
    /// Уникальный ID счётчика
    pub id: i32,
    /// Показания, отсортированные по периоду (год, месяц)
    pub readings: Vec<WaterReadingResponse>,
}

/// Квартира
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApartmentResponse {
    /// Уникальный ID квартиры
    pub id: i32,
    /// Площадь в м²
    pub area: f64,
    /// Счётчики воды квартиры
    pub water_meters: Vec<WaterMeterResponse>,
}

/// Дом со всеми квартирами, счётчиками и показаниями
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HouseResponse {
    /// Уникальный ID дома
    pub id: i32,
    /// Адрес дома
    pub address: String,
    /// Квартиры дома
    pub apartments: Vec<ApartmentResponse>,
}

/// Полная информация о доме
///
/// Возвращает дом со вложенной структурой: квартиры → счётчики →
/// показания. Показания отсортированы по периоду (год, месяц).
#[utoipa::path(
    get,
    path = "/api/v1/houses/{id}",
    tag = "Houses",
    params(
        ("id" = i32, Path, description = "ID дома")
    ),
    responses(
        (status = 200, description = "Полная информация о доме", body = ApiResponse<HouseResponse>),
        (status = 404, description = "Дом не найден")
    )
)]
pub async fn get_house(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<HouseResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let house = match state.repos.houses().find_by_id(id).await {
        Ok(Some(house)) => house,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("House {} not found", id))),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to get house: {}", e))),
            ));
        }
    };

    let response = build_snapshot(&state, house).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to load readings: {}", e))),
        )
    })?;

    Ok(Json(ApiResponse::success(response)))
}

async fn build_snapshot(
    state: &ApiState,
    house: House,
) -> Result<HouseResponse, crate::domain::DomainError> {
    let mut apartments = Vec::with_capacity(house.apartments.len());
    for apartment in house.apartments {
        let mut water_meters = Vec::with_capacity(apartment.water_meters.len());
        for meter in apartment.water_meters {
            let readings = state.repos.houses().readings_for_meter(meter.id).await?;
            water_meters.push(WaterMeterResponse {
                id: meter.id,
                readings: readings.into_iter().map(Into::into).collect(),
            });
        }
        apartments.push(ApartmentResponse {
            id: apartment.id,
            area: apartment.area,
            water_meters,
        });
    }

    Ok(HouseResponse {
        id: house.id,
        address: house.address,
        apartments,
    })
}
