//! HTTP SMS provider adapter.
//!
//! Submits one message per request to the provider's JSON endpoint and
//! interprets its per-message status array: status `"0"` means accepted,
//! anything else is a rejection carrying an error text.

use coachfee_core::config::SmsConfig;
use serde::Deserialize;

use crate::phone::normalize_phone;
use crate::traits::{DeliveryReceipt, SmsError, SmsGateway};

/// Provider response envelope: one entry per message part.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderResponse {
    #[serde(default)]
    messages: Vec<ProviderMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderMessage {
    status: String,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

/// Sends reminders through an HTTP SMS provider.
#[derive(Debug)]
pub struct HttpSmsGateway {
    api_url: String,
    api_key: String,
    api_secret: String,
    sender_id: String,
    country_code: String,
    client: reqwest::Client,
}

impl HttpSmsGateway {
    /// Build a gateway from configuration.
    ///
    /// Returns [`SmsError::Config`] when credentials are absent — without
    /// them no message can be sent, so the whole batch is off.
    pub fn from_config(config: &SmsConfig) -> Result<Self, SmsError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SmsError::Config("SMS_API_KEY is not set".to_string()))?;
        let api_secret = config
            .api_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SmsError::Config("SMS_API_SECRET is not set".to_string()))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key,
            api_secret,
            sender_id: config.sender_id.clone(),
            country_code: config.country_code.clone(),
            client: reqwest::Client::new(),
        })
    }
}

/// Interpret the provider's response envelope for a single submission.
pub(crate) fn receipt_from_response(
    response: ProviderResponse,
) -> Result<DeliveryReceipt, SmsError> {
    let message = response.messages.into_iter().next().ok_or_else(|| {
        SmsError::Provider {
            status: "none".to_string(),
            detail: "provider returned no message entries".to_string(),
        }
    })?;

    if message.status == "0" {
        Ok(DeliveryReceipt {
            message_id: message.message_id,
        })
    } else {
        Err(SmsError::Provider {
            status: message.status,
            detail: message
                .error_text
                .unwrap_or_else(|| "unknown provider error".to_string()),
        })
    }
}

#[async_trait::async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, phone: &str, text: &str) -> Result<DeliveryReceipt, SmsError> {
        let to = normalize_phone(phone, &self.country_code)?;

        let body = serde_json::json!({
            "api_key": self.api_key,
            "api_secret": self.api_secret,
            "from": self.sender_id,
            "to": to,
            "text": text,
        });

        tracing::debug!(to = %to, "Submitting SMS to provider");

        let response = self.client.post(&self.api_url).json(&body).send().await?;
        let parsed: ProviderResponse = response.json().await?;

        let receipt = receipt_from_response(parsed)?;
        tracing::info!(
            to = %to,
            message_id = receipt.message_id.as_deref().unwrap_or("-"),
            "SMS accepted by provider"
        );
        Ok(receipt)
    }

    fn gateway_name(&self) -> &str {
        "http-sms"
    }
}
