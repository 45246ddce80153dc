//! Slack incoming webhook client.

use super::DeliveryError;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

/// Body Slack returns for an accepted message.
const ACCEPTED_BODY: &str = "ok";

/// Posts messages to a Slack incoming webhook.
#[derive(Clone)]
pub struct SlackWebhook {
    client: reqwest::Client,
    url: Url,
}

// The webhook URL is a credential.
impl std::fmt::Debug for SlackWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackWebhook")
            .field("host", &self.url.host_str())
            .finish_non_exhaustive()
    }
}

impl SlackWebhook {
    /// Creates a client for the given webhook URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a client reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Sends a message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Rejected`] unless Slack answers `200` with
    /// body `ok`, or [`DeliveryError::Transport`] if the request fails.
    pub async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        debug!(bytes = text.len(), "Posting message to Slack");
        let response = self
            .client
            .post(self.url.clone())
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK || body.trim() != ACCEPTED_BODY {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Slack message delivered");
        Ok(())
    }
}
