//! Slack delivery error types.

/// Errors that can occur while posting to a Slack webhook.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Slack answered with something other than `200 ok`.
    #[error("Slack rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request could not be sent or the response not read.
    #[error("Failed to reach Slack: {0}")]
    Transport(#[from] reqwest::Error),
}
