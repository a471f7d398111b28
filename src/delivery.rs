//! Outbound delivery of phone verification codes.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Sms;

const DEFAULT_TIMEOUT_SECS: u64 = 3;
const GATEWAY_USERNAME: &str = "api";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gateway refused message, error {0}")]
    Rejected(i64),

    #[error("no sms gateway configured")]
    Disabled,
}

/// Capability to push a verification code over an out-of-band channel.
///
/// The production channel is an HTTP SMS gateway; tests inject fakes.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn send(&self, phone: &str, code: &str)
    -> Result<(), DeliveryError>;
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    error: i64,
}

/// SMS gateway client.
///
/// The whole exchange is bounded by the configured timeout so a stuck
/// gateway surfaces as a delivery failure, not a hung request.
pub struct SmsGateway {
    http: reqwest::Client,
    url: String,
    key: String,
    signature: String,
}

impl SmsGateway {
    /// Create a new [`SmsGateway`].
    pub fn new(config: &Sms) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(
            config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
            key: config.key.clone(),
            signature: config.signature.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CodeDelivery for SmsGateway {
    async fn send(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), DeliveryError> {
        let message = format!(
            "Your verification code is {code}. Do not share it with anyone.{}",
            self.signature
        );

        let response = self
            .http
            .post(&self.url)
            .basic_auth(GATEWAY_USERNAME, Some(&self.key))
            .form(&[("mobile", phone), ("message", message.as_str())])
            .send()
            .await?;

        let body: GatewayResponse = response.json().await?;
        if body.error != 0 {
            return Err(DeliveryError::Rejected(body.error));
        }

        tracing::debug!(%phone, "phone code delivered");
        Ok(())
    }
}

/// Fallback when no gateway is configured.
///
/// Every send fails, so the caller reports the delivery-failure hint
/// instead of claiming success for a code that never left the host.
pub struct DisabledDelivery;

#[async_trait]
impl CodeDelivery for DisabledDelivery {
    async fn send(
        &self,
        _phone: &str,
        _code: &str,
    ) -> Result<(), DeliveryError> {
        tracing::warn!("phone code requested but no sms gateway configured");
        Err(DeliveryError::Disabled)
    }
}

/// Test double capturing every send.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingDelivery {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl CodeDelivery for RecordingDelivery {
    async fn send(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Rejected(-20));
        }

        self.sent
            .lock()
            .unwrap()
            .push((phone.to_owned(), code.to_owned()));
        Ok(())
    }
}
