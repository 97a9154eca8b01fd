use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{MessagingError, SendOutcome, TwilioCredentials, WhatsAppGateway, whatsapp_address};

/// Public Twilio REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Deserialize)]
struct MessageResource {
    #[serde(default)]
    sid: Option<String>,
}

/// [`WhatsAppGateway`] speaking the Twilio Messages API.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: Arc<str>,
}

impl TwilioClient {
    /// Client posting to `base_url`, the Twilio API root.
    pub fn new(base_url: &str) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .build()
            .map_err(|source| MessagingError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }
}

impl WhatsAppGateway for TwilioClient {
    fn send(
        &self,
        credentials: &TwilioCredentials,
        to: &str,
        body: &str,
    ) -> BoxFuture<'static, Result<SendOutcome, MessagingError>> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, credentials.account_sid
        );
        let request = self
            .client
            .post(url)
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&[
                ("To", whatsapp_address(to)),
                ("From", whatsapp_address(&credentials.whatsapp_number)),
                ("Body", body.to_string()),
            ]);

        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|source| MessagingError::RequestSend { source })?;

            if !response.status().is_success() {
                let status = response.status();
                let error = response.text().await.unwrap_or_default();
                warn!(%status, error = %error, "twilio refused message");
                return Ok(SendOutcome::failed(error));
            }

            let resource: MessageResource = response
                .json()
                .await
                .map_err(|source| MessagingError::DecodeResponse { source })?;
            Ok(SendOutcome::sent(resource.sid))
        })
    }
}
