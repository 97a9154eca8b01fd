//! Outbound WhatsApp messaging.

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Twilio Messages API client.
pub mod twilio;

pub use twilio::TwilioClient;

/// Account used to send WhatsApp messages through Twilio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub whatsapp_number: String,
}

impl TwilioCredentials {
    /// Read `account_sid`, `auth_token` and `whatsapp_number` from an
    /// integration's credentials object; `None` unless all three are non-empty.
    pub fn from_json(credentials: &Value) -> Option<Self> {
        let field = |key: &str| {
            credentials
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            account_sid: field("account_sid")?,
            auth_token: field("auth_token")?,
            whatsapp_number: field("whatsapp_number")?,
        })
    }
}

/// Result of one send attempt as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    /// Accepted by the provider.
    pub fn sent(sid: Option<String>) -> Self {
        Self {
            success: true,
            sid,
            error: None,
        }
    }

    /// Refused by the provider.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sid: None,
            error: Some(error.into()),
        }
    }
}

/// Transport-level failures; provider refusals are a [`SendOutcome`] instead.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("failed to build messaging client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to reach messaging provider")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode messaging provider response")]
    DecodeResponse {
        #[source]
        source: reqwest::Error,
    },
}

/// Sends WhatsApp text messages on behalf of an account.
pub trait WhatsAppGateway: Send + Sync {
    /// Send `body` to `to`; provider refusals come back as a failed outcome.
    fn send(
        &self,
        credentials: &TwilioCredentials,
        to: &str,
        body: &str,
    ) -> BoxFuture<'static, Result<SendOutcome, MessagingError>>;
}

/// Prefix a phone number with `whatsapp:` unless it already carries it.
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_require_all_three_fields() {
        let full = json!({"account_sid": "AC1", "auth_token": "tok", "whatsapp_number": "+1555"});
        assert_eq!(
            TwilioCredentials::from_json(&full),
            Some(TwilioCredentials {
                account_sid: "AC1".into(),
                auth_token: "tok".into(),
                whatsapp_number: "+1555".into(),
            })
        );

        let missing = json!({"account_sid": "AC1", "auth_token": ""});
        assert_eq!(TwilioCredentials::from_json(&missing), None);
        assert_eq!(TwilioCredentials::from_json(&Value::Null), None);
    }

    #[test]
    fn whatsapp_prefix_is_added_once() {
        assert_eq!(whatsapp_address("+27821234567"), "whatsapp:+27821234567");
        assert_eq!(whatsapp_address("whatsapp:+27821234567"), "whatsapp:+27821234567");
    }
}
