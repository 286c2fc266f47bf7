//! SmsGateway trait definition and shared error types.

/// Errors that can occur while sending a reminder.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Phone number is empty")]
    EmptyPhone,

    #[error("Malformed phone number: {0}")]
    InvalidPhone(String),

    #[error("Provider rejected message (status {status}): {detail}")]
    Provider { status: String, detail: String },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Provider acknowledgement for one accepted message.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Provider-assigned message id, when reported.
    pub message_id: Option<String>,
}

/// Trait for SMS provider implementations.
#[async_trait::async_trait]
pub trait SmsGateway: Send + Sync {
    /// Submit one message to the given phone number.
    ///
    /// Fails with [`SmsError::EmptyPhone`] / [`SmsError::InvalidPhone`] for
    /// unusable numbers and [`SmsError::Provider`] when the provider reports
    /// a non-zero status.
    async fn send(&self, phone: &str, text: &str) -> Result<DeliveryReceipt, SmsError>;

    /// Human-readable name for this gateway (e.g., "http-sms").
    fn gateway_name(&self) -> &str;
}
