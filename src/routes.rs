use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::{
    config::Config,
    error::{ApiError, ErrorBody},
    weather::{
        types::{SubmitResponse, UserData, WeatherRecord, WeatherRequest},
        WeatherService,
    },
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Weather Data System"),
    paths(health, submit_weather, get_weather),
    components(schemas(
        WeatherRequest,
        SubmitResponse,
        WeatherRecord,
        UserData,
        ErrorBody,
        HealthResponse
    ))
)]
pub struct ApiDoc;

// Route handlers
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Record stored", body = SubmitResponse),
        (status = 400, description = "Provider rejected the location", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody),
        (status = 500, description = "Unexpected failure", body = ErrorBody),
        (status = 503, description = "Provider unreachable", body = ErrorBody)
    )
)]
pub async fn submit_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = payload?;
    let id = state.weather.submit(request).await?;
    Ok(Json(SubmitResponse { id }))
}

#[utoipa::path(
    get,
    path = "/weather/{id}",
    params(("id" = String, Path, description = "Record identifier returned by POST /weather")),
    responses(
        (status = 200, description = "Stored record", body = WeatherRecord),
        (status = 404, description = "Unknown identifier", body = ErrorBody)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WeatherRecord>, ApiError> {
    let record = state.weather.fetch(&id).await?;
    Ok(Json(record))
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Single allowed origin with credentials. Methods and headers are mirrored
/// from the preflight, since wildcards cannot be combined with credentials.
pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = config.cors_allowed_origin.parse().map_err(|_| {
        anyhow::anyhow!("Invalid CORS_ALLOWED_ORIGIN: {}", config.cors_allowed_origin)
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi))
        .route("/weather", post(submit_weather))
        .route("/weather/:id", get(get_weather))
        .with_state(state)
}
