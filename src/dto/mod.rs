use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Module guard payloads.
pub mod access;
/// Login and session payloads.
pub mod auth;
/// Risk engine payloads.
pub mod engine;
/// ESG compliance score payloads.
pub mod esg;
/// Request extractors.
pub mod extract;
/// Health check payloads.
pub mod health;
/// ESG ingest payloads.
pub mod ingest;
/// Wellbeing invitation payloads.
pub mod invitation;
/// King IV calculator payloads.
pub mod king_iv;
/// Password reset payloads.
pub mod password;
/// Behavioural risk profile payloads.
pub mod risk;
/// Validation helpers and error messages.
pub mod validation;
/// Wellbeing risk calculator payloads.
pub mod wellbeing;
/// WhatsApp relay payloads.
pub mod whatsapp;

/// Current UTC time in RFC 3339, the format every timestamp column uses.
pub fn now_rfc3339() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// RFC 3339 text of a UTC instant.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Round to two decimals, the precision scores are reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
