use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_present;

/// Message to relay through a casino's WhatsApp integration.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendWhatsAppRequest {
    #[validate(required, custom(function = "validate_present"))]
    pub casino_id: Option<String>,
    /// Recipient number, with or without the `whatsapp:` prefix.
    #[validate(required, custom(function = "validate_present"))]
    pub to_phone: Option<String>,
    #[validate(required, custom(function = "validate_present"))]
    pub message: Option<String>,
    /// Free-form data copied into the integration log.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<Value>,
}

/// Outcome of a relayed WhatsApp message.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhatsAppSendResponse {
    pub success: bool,
    pub message_sid: Option<String>,
    /// `sent` or `failed`.
    pub status: String,
    pub error: Option<String>,
}
