use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_present;

/// Default lifetime of an invitation link.
pub const DEFAULT_EXPIRY_HOURS: u32 = 72;
/// Longest accepted invitation lifetime, one year.
pub const MAX_EXPIRY_HOURS: u32 = 24 * 365;

/// How an invitation reaches the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvitationChannel {
    Email,
    Whatsapp,
}

impl InvitationChannel {
    /// Channel name as stored on the invitation row.
    pub fn as_str(self) -> &'static str {
        match self {
            InvitationChannel::Email => "email",
            InvitationChannel::Whatsapp => "whatsapp",
        }
    }
}

/// Body of `POST /send-wellbeing-invitation`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendInvitationRequest {
    #[validate(
        required(message = "Missing required fields: player_id, game_concept_id, channel"),
        custom(function = "validate_present")
    )]
    pub player_id: Option<String>,
    #[validate(
        required(message = "Missing required fields: player_id, game_concept_id, channel"),
        custom(function = "validate_present")
    )]
    pub game_concept_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[validate(required(message = "Missing required fields: player_id, game_concept_id, channel"))]
    pub channel: Option<InvitationChannel>,
    /// Defaults to 72 hours; at most one year.
    #[serde(default)]
    #[validate(range(
        min = 1,
        max = MAX_EXPIRY_HOURS,
        message = "expires_in_hours must be between 1 and 8760"
    ))]
    pub expires_in_hours: Option<u32>,
}

/// What happened when the invitation was handed to its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Error,
    Simulated,
}

impl DeliveryStatus {
    /// Lowercase name used in the stored row and the response message.
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Error => "error",
            DeliveryStatus::Simulated => "simulated",
        }
    }
}

/// Created invitation and the outcome of its delivery.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvitationResponse {
    pub success: bool,
    pub invitation_id: String,
    pub secure_token: String,
    pub game_url: String,
    pub expires_at: String,
    pub message: String,
    pub delivery_status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twilio_sid: Option<String>,
}
