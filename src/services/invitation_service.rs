//! Wellbeing game invitations: a single-use play link delivered by email or WhatsApp.

use rand::Rng;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    dao::models::{GameConcept, NewInvitation},
    dto::{
        format_timestamp,
        invitation::{
            DEFAULT_EXPIRY_HOURS, DeliveryStatus, InvitationChannel, InvitationResponse,
            SendInvitationRequest,
        },
    },
    error::ServiceError,
    state::SharedState,
};

const TOKEN_BYTES: usize = 32;
const DEFAULT_GAME_MINUTES: u32 = 5;

/// 64 lowercase hex characters drawn from the thread-local CSPRNG.
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Public play link for an invitation token.
pub fn game_url(public_app_url: &str, token: &str) -> String {
    format!("{public_app_url}/wellbeing-game/play/{token}")
}

/// Text sent to the player, naming the game length and linking to it.
pub fn invitation_message(first_name: &str, concept: &GameConcept, url: &str) -> String {
    format!(
        "Hi {first_name},\n\n\
         Take a quick {minutes}-minute game to reflect on how you're playing.\n\n\
         {description}\n\n\
         Play now: {url}\n\n\
         This is a voluntary wellbeing check-in to support responsible play.\n\n\
         SafeBet IQ",
        minutes = concept.duration_minutes.unwrap_or(DEFAULT_GAME_MINUTES),
        description = concept.description.as_deref().unwrap_or_default(),
    )
}

/// Create a pending invitation, attempt delivery and record the outcome on the row.
pub async fn send_invitation(
    state: &SharedState,
    request: SendInvitationRequest,
) -> Result<InvitationResponse, ServiceError> {
    let (Some(player_id), Some(game_concept_id), Some(channel)) = (
        request.player_id,
        request.game_concept_id,
        request.channel,
    ) else {
        return Err(ServiceError::invalid_input(
            "Missing required fields: player_id, game_concept_id, channel",
        ));
    };

    let player = state
        .people()
        .player(&player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Player not found"))?;
    let repo = state.wellbeing();
    let concept = repo
        .game_concept(&game_concept_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Game concept not found"))?;

    let token = generate_secure_token();
    let now = OffsetDateTime::now_utc();
    let hours = request.expires_in_hours.unwrap_or(DEFAULT_EXPIRY_HOURS);
    let expires_at = now
        .checked_add(Duration::hours(i64::from(hours)))
        .map(format_timestamp)
        .ok_or_else(|| ServiceError::invalid_input("expires_in_hours is out of range"))?;

    let invitation = repo
        .insert_invitation(&NewInvitation {
            campaign_id: request.campaign_id.filter(|id| !id.is_empty()),
            player_id: player.id.clone(),
            game_concept_id: concept.id.clone(),
            secure_token: token.clone(),
            channel: channel.as_str().to_string(),
            sent_at: format_timestamp(now),
            expires_at: expires_at.clone(),
            status: "pending".to_string(),
        })
        .await
        .map_err(|err| ServiceError::upstream("Failed to create invitation", err))?;

    let url = game_url(&state.config().public_app_url, &token);
    let message = invitation_message(
        player.first_name.as_deref().unwrap_or("there"),
        &concept,
        &url,
    );

    let mut twilio_sid = None;
    let delivery = match channel {
        InvitationChannel::Email => {
            info!(
                to = player.email.as_deref().unwrap_or("no email"),
                subject = %format!("Quick wellbeing check-in - {}", concept.name),
                %url,
                "email delivery simulated"
            );
            DeliveryStatus::Simulated
        }
        InvitationChannel::Whatsapp => {
            match (&state.config().twilio, player.phone.as_deref()) {
                (Some(credentials), Some(phone)) if !phone.is_empty() => {
                    match state.whatsapp().send(credentials, phone, &message).await {
                        Ok(outcome) if outcome.success => {
                            twilio_sid = outcome.sid;
                            DeliveryStatus::Sent
                        }
                        Ok(outcome) => {
                            warn!(
                                player_id = %player.id,
                                error = outcome.error.as_deref().unwrap_or_default(),
                                "WhatsApp invitation refused"
                            );
                            DeliveryStatus::Failed
                        }
                        Err(err) => {
                            warn!(error = %err, player_id = %player.id, "WhatsApp invitation failed");
                            DeliveryStatus::Error
                        }
                    }
                }
                (_, phone) => {
                    info!(
                        to = phone.unwrap_or("no phone"),
                        "WhatsApp delivery simulated"
                    );
                    DeliveryStatus::Simulated
                }
            }
        }
    };

    let status = if delivery == DeliveryStatus::Sent {
        "sent"
    } else {
        "pending"
    };
    if let Err(err) = repo
        .record_delivery(&invitation.id, status, delivery.as_str())
        .await
    {
        warn!(error = %err, invitation_id = %invitation.id, "failed to record invitation delivery");
    }

    Ok(InvitationResponse {
        success: true,
        invitation_id: invitation.id,
        secure_token: invitation.secure_token,
        game_url: url,
        expires_at,
        message: format!("Invitation {} via {}", delivery.as_str(), channel.as_str()),
        delivery_status: delivery,
        twilio_sid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_secure_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, generate_secure_token());
    }

    #[test]
    fn message_names_player_and_link() {
        let concept = GameConcept {
            id: "g1".into(),
            name: "Treasure Run".into(),
            slug: None,
            description: Some("Collect gems, dodge traps.".into()),
            duration_minutes: Some(3),
        };
        let url = game_url("https://app.example", "abc");
        let message = invitation_message("Thandi", &concept, &url);

        assert_eq!(url, "https://app.example/wellbeing-game/play/abc");
        assert!(message.starts_with("Hi Thandi,\n\nTake a quick 3-minute game"));
        assert!(message.contains("Collect gems, dodge traps."));
        assert!(message.contains("Play now: https://app.example/wellbeing-game/play/abc"));
        assert!(message.ends_with("SafeBet IQ"));
    }
}
