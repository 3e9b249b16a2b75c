//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::ApiResponse;
use crate::api::handlers::{billing, health, houses, metrics, tariffs, ApiState};
use crate::api::middleware::http_metrics_middleware;
use crate::application::SharedBillingDispatcher;
use crate::domain::RepositoryProvider;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Houses
        houses::get_house,
        // Billing
        billing::start_billing,
        billing::get_billing_job,
        billing::cancel_billing_job,
        // Tariffs
        tariffs::list_tariffs,
        tariffs::get_tariff,
        tariffs::create_tariff,
        tariffs::update_tariff,
        tariffs::delete_tariff,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthResponse,
            // Houses
            houses::HouseResponse,
            houses::ApartmentResponse,
            houses::WaterMeterResponse,
            houses::WaterReadingResponse,
            // Billing
            billing::StartBillingRequest,
            billing::JobEnqueuedResponse,
            billing::BillingJobResponse,
            billing::ApartmentChargeResponse,
            // Tariffs
            tariffs::TariffResponse,
            tariffs::CreateTariffRequest,
            tariffs::UpdateTariffRequest,
        )
    ),
    tags(
        (name = "Health", description = "Проверка состояния сервера. Используйте для health-check мониторинга (uptime, ping, readiness)."),
        (name = "Houses", description = "Просмотр домов со вложенной структурой: дом → квартиры → счётчики воды → показания. Показания отсортированы по периоду (год, месяц). Данные только для чтения — наполняются администратором напрямую в базе."),
        (name = "Billing", description = "Асинхронный расчёт квартплаты. `POST /houses/{id}/billing` ставит задачу в очередь и сразу возвращает `job_id` (202). Статус и результат опрашиваются по `job_id`: `pending` → `running` → `done` | `failed`. Прогресс (0–100) обновляется после каждой обработанной квартиры и никогда не уменьшается. Формула: вода = потребление × тариф `water`, обслуживание = площадь × тариф `maintenance`."),
        (name = "Tariffs", description = "Управление тарифами для расчёта. Виды: `water` (цена за м³ воды), `maintenance` (цена за м² площади). Расчёт берёт по одному тарифу каждого вида; без обоих тарифов задача завершается ошибкой."),
    ),
    info(
        title = "Kommunalka Billing Service API",
        version = "1.0.0",
        description = "REST API для расчёта коммунальных платежей многоквартирных домов.

## Как устроен расчёт

Расчёт запускается асинхронно: `POST /api/v1/houses/{id}/billing` возвращает
`job_id` немедленно (HTTP 202), не дожидаясь вычислений. Дальше статус
опрашивается через `GET /api/v1/billing/jobs/{job_id}`.

Для каждой квартиры дома:
- **вода** — дельта показаний счётчиков за (год, месяц) и (год, месяц−1),
  умноженная на тариф `water`. Переход через границу года не выполняется:
  за январь потребление всегда 0;
- **обслуживание** — площадь квартиры, умноженная на тариф `maintenance`.

## Формат ответов

Все REST-ответы обёрнуты в стандартную оболочку:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

При ошибке:
```json
{\"success\": false, \"data\": null, \"error\": \"описание ошибки\"}
```",
        license(
            name = "MIT"
        ),
        contact(
            name = "Kommunalka",
            email = "support@kommunalka.uz"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    dispatcher: SharedBillingDispatcher,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let api_state = ApiState { repos, dispatcher };

    let health_state = health::HealthState {
        started_at: Arc::new(Instant::now()),
    };

    let metrics_state = metrics::MetricsState {
        handle: prometheus_handle,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // House routes: snapshot + billing enqueue under the house path
    let house_routes = Router::new()
        .route("/{id}", get(houses::get_house))
        .route("/{id}/billing", post(billing::start_billing))
        .with_state(api_state.clone());

    // Billing job routes (poll + cancel)
    let billing_routes = Router::new()
        .route("/jobs/{job_id}", get(billing::get_billing_job))
        .route("/jobs/{job_id}/cancel", post(billing::cancel_billing_job))
        .with_state(api_state.clone());

    // Tariff routes
    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_tariffs).post(tariffs::create_tariff))
        .route(
            "/{id}",
            get(tariffs::get_tariff)
                .put(tariffs::update_tariff)
                .delete(tariffs::delete_tariff),
        )
        .with_state(api_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    // Prometheus scrape endpoint (no wrapper, plain text format)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .merge(health_routes)
        // Prometheus
        .merge(metrics_routes)
        // Houses (+ billing enqueue)
        .nest("/api/v1/houses", house_routes)
        // Billing jobs
        .nest("/api/v1/billing", billing_routes)
        // Tariffs
        .nest("/api/v1/tariffs", tariff_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────
