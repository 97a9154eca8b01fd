use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        extract::ValidatedJson,
        king_iv::{EsgCalculationRequest, EsgCalculationResponse},
    },
    error::AppError,
    services::king_iv_service,
    state::SharedState,
};

/// King IV ESG calculator.
pub fn router() -> Router<SharedState> {
    Router::new().route("/king-iv-esg-calculator", post(calculate))
}

/// Compute and store the King IV ESG score of a casino for a period.
#[utoipa::path(
    post,
    path = "/king-iv-esg-calculator",
    tag = "esg",
    request_body = EsgCalculationRequest,
    responses(
        (status = 200, description = "Stored score with pillar breakdown, outcomes and trend", body = EsgCalculationResponse),
        (status = 400, description = "Missing casino or period bounds")
    )
)]
pub async fn calculate(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<EsgCalculationRequest>,
) -> Result<Json<EsgCalculationResponse>, AppError> {
    Ok(Json(king_iv_service::calculate(&state, payload).await?))
}
