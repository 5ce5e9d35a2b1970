use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::{
    error::AppError,
    fertilizer::optimize_fertilizer,
    forecast::predict_yield,
    search::recommend_crop,
    state::SharedState,
    types::{
        CropRecommendation, FeatureVector, FertilizerRecommendation, FertilizerRequest,
        HealthResponse, RecommendRequest, WeatherReport, WeatherRequest, YieldEstimate,
    },
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/recommend", post(recommend_handler))
        .route("/predict_yield", post(predict_yield_handler))
        .route("/optimize_fertilizer", post(optimize_fertilizer_handler))
        .route("/weather", post(weather_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// Model calls are CPU bound, keep them off the async workers.
async fn run_blocking<T, F>(state: SharedState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&SharedState) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| AppError::Inference(format!("worker task failed: {e}")))?
}

async fn home() -> &'static str {
    "Crop advisor is running"
}

async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        run_id: state.bundle.run_id,
        classes: state.bundle.label_encoder.len(),
        fertilizer_entries: state.bundle.fertilizer_data.len(),
    })
}

pub async fn recommend_handler(
    State(state): State<SharedState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<CropRecommendation>, AppError> {
    let Json(req) = body?;
    debug!("Received data for recommendation: {req:?}");

    let rec = run_blocking(state, move |state| {
        recommend_crop(&state.bundle, &req.features, req.season())
    })
    .await?;

    debug!("Recommended crops:\n{rec}");
    Ok(Json(rec))
}

pub async fn predict_yield_handler(
    State(state): State<SharedState>,
    body: Result<Json<FeatureVector>, JsonRejection>,
) -> Result<Json<YieldEstimate>, AppError> {
    let Json(features) = body?;
    debug!("Received data for yield prediction: {features:?}");

    let estimate = run_blocking(state, move |state| predict_yield(&state.bundle, &features)).await?;

    debug!("Predicted yield: {}", estimate.value);
    Ok(Json(estimate))
}

pub async fn optimize_fertilizer_handler(
    body: Result<Json<FertilizerRequest>, JsonRejection>,
) -> Result<Json<FertilizerRecommendation>, AppError> {
    let Json(req) = body?;
    debug!("Received data for fertilizer optimization: {req:?}");

    let rec = optimize_fertilizer(&req);
    debug!("Fertilizer recommendations: {rec:?}");
    Ok(Json(rec))
}

pub async fn weather_handler(
    State(state): State<SharedState>,
    body: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherReport>, AppError> {
    let Json(req) = body?;
    debug!("Received weather lookup for ({}, {})", req.lat, req.lon);

    state.weather.current(req.lat, req.lon).await.map(Json)
}
