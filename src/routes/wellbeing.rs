use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        extract::ValidatedJson,
        wellbeing::{RiskCalculationRequest, RiskCalculationResponse},
    },
    error::AppError,
    services::wellbeing_service,
    state::SharedState,
};

/// Wellbeing session scoring.
pub fn router() -> Router<SharedState> {
    Router::new().route("/wellbeing-risk-calculator", post(calculate_risk))
}

/// Score a finished wellbeing game session from its telemetry.
#[utoipa::path(
    post,
    path = "/wellbeing-risk-calculator",
    tag = "wellbeing",
    request_body = RiskCalculationRequest,
    responses(
        (status = 200, description = "Stored behaviour risk score", body = RiskCalculationResponse),
        (status = 400, description = "session_id is required"),
        (status = 404, description = "Unknown session or no telemetry"),
        (status = 500, description = "Score could not be stored")
    )
)]
pub async fn calculate_risk(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<RiskCalculationRequest>,
) -> Result<Json<RiskCalculationResponse>, AppError> {
    let session_id = payload.session_id.unwrap_or_default();
    Ok(Json(
        wellbeing_service::score_session(&state, &session_id).await?,
    ))
}
