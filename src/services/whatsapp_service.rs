//! Relay of a single WhatsApp message through a casino's own Twilio account.

use std::time::Instant;

use serde_json::json;
use tracing::{info, warn};

use crate::{
    dao::models::NewApiLog,
    dto::whatsapp::{SendWhatsAppRequest, WhatsAppSendResponse},
    error::ServiceError,
    messaging::{SendOutcome, TwilioCredentials},
    state::SharedState,
};

/// Send `message` to `to_phone` with the casino's enabled integration and log the call.
///
/// A provider refusal is not an error: the response carries `success: false`
/// and the caller decides the status code.
pub async fn send_message(
    state: &SharedState,
    request: SendWhatsAppRequest,
) -> Result<WhatsAppSendResponse, ServiceError> {
    let casino_id = request.casino_id.unwrap_or_default();
    let to_phone = request.to_phone.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    let repo = state.integrations();
    let config = match repo.enabled_config(&casino_id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            return Err(ServiceError::not_found(
                "WhatsApp integration not configured for this casino",
            ));
        }
        Err(err) => {
            return Err(
                ServiceError::not_found("WhatsApp integration not configured for this casino")
                    .with_details(json!(err.to_string())),
            );
        }
    };

    let credentials = TwilioCredentials::from_json(&config.credentials).ok_or_else(|| {
        ServiceError::invalid_input("Invalid Twilio credentials in configuration")
    })?;

    let started = Instant::now();
    let outcome = match state
        .whatsapp()
        .send(&credentials, &to_phone, &message)
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, casino_id = %casino_id, "WhatsApp send failed");
            SendOutcome::failed(err.to_string())
        }
    };
    let elapsed = started.elapsed();

    let entry = NewApiLog {
        config_id: config.id.clone(),
        request_type: "POST".to_string(),
        endpoint: "/Messages".to_string(),
        request_payload: json!({
            "to": to_phone,
            "message": message,
            "metadata": request.metadata,
        }),
        response_status: if outcome.success { 200 } else { 400 },
        response_payload: json!(outcome),
        response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        error_message: outcome.error.clone(),
    };
    if let Err(err) = repo.log_call(&entry).await {
        warn!(error = %err, config_id = %config.id, "failed to record integration call");
    }

    info!(
        casino_id = %casino_id,
        success = outcome.success,
        elapsed_ms = entry.response_time_ms,
        "WhatsApp message relayed"
    );

    Ok(WhatsAppSendResponse {
        success: outcome.success,
        status: if outcome.success { "sent" } else { "failed" }.to_string(),
        message_sid: outcome.sid,
        error: outcome.error,
    })
}
