use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        esg::{CasinoEsgSummary, EsgScoreCreated, NewEsgScore},
        extract::ValidatedJson,
    },
    error::AppError,
    services::esg_service,
    state::SharedState,
};

/// ESG compliance report storage and per-casino summaries.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/esg-report", post(create_score))
        .route("/esg-report/{casino_id}", get(casino_summary))
}

/// Store an ESG compliance score.
#[utoipa::path(
    post,
    path = "/esg-report",
    tag = "esg",
    request_body = NewEsgScore,
    responses(
        (status = 200, description = "Score stored", body = EsgScoreCreated),
        (status = 400, description = "Missing casino_id or out-of-range score")
    )
)]
pub async fn create_score(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<NewEsgScore>,
) -> Result<Json<EsgScoreCreated>, AppError> {
    Ok(Json(esg_service::record_score(&state, payload).await?))
}

/// Latest ESG compliance score of a casino.
#[utoipa::path(
    get,
    path = "/esg-report/{casino_id}",
    tag = "esg",
    params(("casino_id" = String, Path, description = "Casino to summarise")),
    responses(
        (status = 200, description = "Latest score with grade and total", body = CasinoEsgSummary),
        (status = 404, description = "Casino not found")
    )
)]
pub async fn casino_summary(
    State(state): State<SharedState>,
    Path(casino_id): Path<String>,
) -> Result<Json<CasinoEsgSummary>, AppError> {
    Ok(Json(esg_service::casino_summary(&state, &casino_id).await?))
}
