use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
};

use crate::{
    dto::{
        access::{
            CasinoModulesResponse, ModuleAccessResponse, ModuleTableResponse, PageGuardResponse,
        },
        extract::bearer_token,
    },
    error::AppError,
    services::{access, licensing},
    state::SharedState,
};

/// Role guard decisions for dashboard modules and the casino admin area.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/access/modules", get(module_table))
        .route("/access/modules/{module}", get(module_access))
        .route("/access/casino-admin", get(casino_admin_guard))
        .route("/access/casino-modules", get(casino_modules))
}

/// Module to allowed functional roles table.
#[utoipa::path(
    get,
    path = "/access/modules",
    tag = "access",
    responses((status = 200, description = "Permission table", body = ModuleTableResponse))
)]
pub async fn module_table() -> Json<ModuleTableResponse> {
    Json(access::module_table())
}

/// Whether the caller may open a module, with the fallback text when not.
#[utoipa::path(
    get,
    path = "/access/modules/{module}",
    tag = "access",
    params(
        ("module" = String, Path, description = "Dashboard module key"),
        ("Authorization" = Option<String>, Header, description = "Bearer access token")
    ),
    responses((status = 200, description = "Guard decision", body = ModuleAccessResponse))
)]
pub async fn module_access(
    State(state): State<SharedState>,
    Path(module): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ModuleAccessResponse>, AppError> {
    Ok(Json(
        access::module_access(&state, bearer_token(&headers), &module).await?,
    ))
}

/// Guard of the casino administration pages, by platform role.
#[utoipa::path(
    get,
    path = "/access/casino-admin",
    tag = "access",
    params(("Authorization" = Option<String>, Header, description = "Bearer access token")),
    responses((status = 200, description = "Granted or the page to redirect to", body = PageGuardResponse))
)]
pub async fn casino_admin_guard(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<PageGuardResponse>, AppError> {
    Ok(Json(
        access::casino_admin_guard(&state, bearer_token(&headers)).await?,
    ))
}

/// Software modules licensed to the caller's casino.
#[utoipa::path(
    get,
    path = "/access/casino-modules",
    tag = "access",
    params(("Authorization" = Option<String>, Header, description = "Bearer access token")),
    responses(
        (status = 200, description = "Licensed modules, empty for anonymous callers", body = CasinoModulesResponse),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn casino_modules(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CasinoModulesResponse>, AppError> {
    Ok(Json(
        licensing::casino_modules(&state, bearer_token(&headers)).await?,
    ))
}
