use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        extract::ValidatedJson,
        invitation::{InvitationResponse, SendInvitationRequest},
    },
    error::AppError,
    services::invitation_service,
    state::SharedState,
};

/// Wellbeing game invitations.
pub fn router() -> Router<SharedState> {
    Router::new().route("/send-wellbeing-invitation", post(send_invitation))
}

/// Invite a player to a wellbeing game by email or WhatsApp.
///
/// Delivery failures do not fail the request; the invitation is stored and
/// `delivery_status` reports what happened.
#[utoipa::path(
    post,
    path = "/send-wellbeing-invitation",
    tag = "wellbeing",
    request_body = SendInvitationRequest,
    responses(
        (status = 200, description = "Invitation created", body = InvitationResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Unknown player or game concept"),
        (status = 500, description = "Invitation could not be stored")
    )
)]
pub async fn send_invitation(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<SendInvitationRequest>,
) -> Result<Json<InvitationResponse>, AppError> {
    Ok(Json(
        invitation_service::send_invitation(&state, payload).await?,
    ))
}
