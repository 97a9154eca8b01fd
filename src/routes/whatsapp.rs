use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::{
        extract::ValidatedJson,
        whatsapp::{SendWhatsAppRequest, WhatsAppSendResponse},
    },
    error::AppError,
    services::whatsapp_service,
    state::SharedState,
};

/// Casino WhatsApp relay.
pub fn router() -> Router<SharedState> {
    Router::new().route("/integration-whatsapp-send", post(send_message))
}

/// Relay a WhatsApp message through the casino's Twilio integration.
#[utoipa::path(
    post,
    path = "/integration-whatsapp-send",
    tag = "integrations",
    request_body = SendWhatsAppRequest,
    responses(
        (status = 200, description = "Message accepted by Twilio", body = WhatsAppSendResponse),
        (status = 400, description = "Missing field, invalid credentials or refused by Twilio", body = WhatsAppSendResponse),
        (status = 404, description = "No enabled integration for the casino")
    )
)]
pub async fn send_message(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<SendWhatsAppRequest>,
) -> Result<(StatusCode, Json<WhatsAppSendResponse>), AppError> {
    let response = whatsapp_service::send_message(&state, payload).await?;
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(response)))
}
