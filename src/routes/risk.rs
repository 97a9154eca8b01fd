use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        extract::ValidatedJson,
        risk::{NewRiskProfile, PlayerRiskHistory, RiskProfileCreated},
    },
    error::AppError,
    services::risk_service,
    state::SharedState,
};

/// Behavioural risk profile ingestion and lookup.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/bri-risk-score", post(create_profile))
        .route("/bri-risk-score/{player_id}", get(player_history))
}

/// Store a behavioural risk profile.
#[utoipa::path(
    post,
    path = "/bri-risk-score",
    tag = "risk",
    request_body = NewRiskProfile,
    responses(
        (status = 200, description = "Profile stored", body = RiskProfileCreated),
        (status = 400, description = "Missing player_id or out-of-range score")
    )
)]
pub async fn create_profile(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<NewRiskProfile>,
) -> Result<Json<RiskProfileCreated>, AppError> {
    Ok(Json(risk_service::record_profile(&state, payload).await?))
}

/// Latest risk profiles of a player.
#[utoipa::path(
    get,
    path = "/bri-risk-score/{player_id}",
    tag = "risk",
    params(("player_id" = String, Path, description = "Player whose profiles are listed")),
    responses((status = 200, description = "Up to ten profiles, newest first", body = PlayerRiskHistory))
)]
pub async fn player_history(
    State(state): State<SharedState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerRiskHistory>, AppError> {
    Ok(Json(risk_service::player_history(&state, &player_id).await?))
}
