use axum::{
    Json, Router,
    routing::{any, post},
};
use serde_json::json;

use crate::{
    dto::{
        engine::{BatchPredictRequest, BatchPredictResponse, EngineHealth, PredictRequest, PredictResponse},
        extract::JsonBody,
    },
    error::{AppError, ServiceError},
    services::risk_engine,
    state::SharedState,
};

/// Rule-based risk engine; unknown sub-paths list the available endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/safeplay-ai-risk-engine/health", any(health))
        .route("/safeplay-ai-risk-engine/predict", post(predict))
        .route("/safeplay-ai-risk-engine/batch-predict", post(batch_predict))
        .route("/safeplay-ai-risk-engine", any(unknown_endpoint))
        .route("/safeplay-ai-risk-engine/{*rest}", any(unknown_endpoint))
}

/// Engine metadata; answered for any method.
#[utoipa::path(
    get,
    path = "/safeplay-ai-risk-engine/health",
    tag = "risk",
    responses((status = 200, description = "Engine metadata", body = EngineHealth))
)]
pub async fn health() -> Json<EngineHealth> {
    Json(risk_engine::health())
}

/// Score one player from aggregated play features.
#[utoipa::path(
    post,
    path = "/safeplay-ai-risk-engine/predict",
    tag = "risk",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction", body = PredictResponse),
        (status = 400, description = "Missing features; the error carries an example payload")
    )
)]
pub async fn predict(
    JsonBody(payload): JsonBody<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    Ok(Json(risk_engine::predict_one(payload.features)?))
}

/// Score several players in one call.
#[utoipa::path(
    post,
    path = "/safeplay-ai-risk-engine/batch-predict",
    tag = "risk",
    request_body = BatchPredictRequest,
    responses(
        (status = 200, description = "One prediction per player", body = BatchPredictResponse),
        (status = 400, description = "players missing or not an array")
    )
)]
pub async fn batch_predict(
    JsonBody(payload): JsonBody<BatchPredictRequest>,
) -> Result<Json<BatchPredictResponse>, AppError> {
    Ok(Json(risk_engine::predict_batch(payload.players)?))
}

async fn unknown_endpoint() -> AppError {
    ServiceError::not_found("Not Found")
        .with_details(json!({ "available_endpoints": risk_engine::ENDPOINTS }))
        .into()
}
