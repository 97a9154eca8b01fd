use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{any, post},
};

use crate::{
    dto::{
        extract::{ValidatedJson, has_bearer_scheme},
        ingest::{ContributionRequest, IngestResponse, MetricsRequest, TrainingPayload},
    },
    error::AppError,
    services::ingest_service::{self, Ingested},
    state::SharedState,
};

type IngestResult = Result<(StatusCode, Json<IngestResponse>), AppError>;

/// ESG data ingest; every sub-path requires a bearer token.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/esg-data-ingest/contributions", post(contributions))
        .route("/esg-data-ingest/training", post(training))
        .route("/esg-data-ingest/metrics", post(metrics))
        .route("/esg-data-ingest/{endpoint}", any(unknown_endpoint))
        .route_layer(middleware::from_fn(require_bearer))
}

fn respond(ingested: Ingested) -> (StatusCode, Json<IngestResponse>) {
    let status = if ingested.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(ingested.response))
}

/// Record a responsible gambling contribution.
#[utoipa::path(
    post,
    path = "/esg-data-ingest/contributions",
    tag = "esg",
    params(("Authorization" = String, Header, description = "Bearer token")),
    request_body = ContributionRequest,
    responses(
        (status = 201, description = "Contribution stored", body = IngestResponse),
        (status = 400, description = "Invalid contribution_type or rejected row"),
        (status = 401, description = "Missing or invalid Authorization header")
    )
)]
pub async fn contributions(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<ContributionRequest>,
) -> IngestResult {
    Ok(respond(
        ingest_service::record_contribution(&state, payload).await?,
    ))
}

/// Record one or more staff training records.
#[utoipa::path(
    post,
    path = "/esg-data-ingest/training",
    tag = "esg",
    params(("Authorization" = String, Header, description = "Bearer token")),
    request_body = TrainingPayload,
    responses(
        (status = 201, description = "Records stored", body = IngestResponse),
        (status = 400, description = "Rejected rows"),
        (status = 401, description = "Missing or invalid Authorization header")
    )
)]
pub async fn training(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<TrainingPayload>,
) -> IngestResult {
    Ok(respond(
        ingest_service::record_training(&state, payload).await?,
    ))
}

/// Insert or update the operational metrics of a reporting period.
#[utoipa::path(
    post,
    path = "/esg-data-ingest/metrics",
    tag = "esg",
    params(("Authorization" = String, Header, description = "Bearer token")),
    request_body = MetricsRequest,
    responses(
        (status = 200, description = "Existing period updated", body = IngestResponse),
        (status = 201, description = "Period recorded", body = IngestResponse),
        (status = 400, description = "Invalid period_type or rejected row"),
        (status = 401, description = "Missing or invalid Authorization header")
    )
)]
pub async fn metrics(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<MetricsRequest>,
) -> IngestResult {
    Ok(respond(
        ingest_service::record_metrics(&state, payload).await?,
    ))
}

async fn unknown_endpoint() -> AppError {
    ingest_service::unknown_endpoint().into()
}

/// Only the bearer scheme is checked; the token itself is not verified.
async fn require_bearer(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if has_bearer_scheme(req.headers()) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized(
            "Missing or invalid Authorization header".into(),
        ))
    }
}
