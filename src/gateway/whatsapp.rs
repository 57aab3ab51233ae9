//! WhatsApp Cloud API gateway — posts to the Graph send-message endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::dialog::ButtonOption;
use crate::error::GatewayError;
use crate::gateway::{check_button_count, MessageGateway};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Graph API client for one WhatsApp Business phone number.
pub struct WhatsAppGateway {
    token: SecretString,
    phone_number_id: String,
    send_timeout: Duration,
    client: reqwest::Client,
}

impl WhatsAppGateway {
    /// Build a gateway with a bounded per-request timeout. A timed-out
    /// send surfaces as a failed action, never as a hang.
    pub fn new(
        token: SecretString,
        phone_number_id: impl Into<String>,
        send_timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(send_timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            token,
            phone_number_id: phone_number_id.into(),
            send_timeout,
            client,
        }
    }

    fn api_url(&self) -> String {
        format!("{GRAPH_API_BASE}/{}/messages", self.phone_number_id)
    }

    async fn post_message(
        &self,
        kind: &'static str,
        to: &str,
        body: serde_json::Value,
    ) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(self.api_url())
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        to: to.to_string(),
                        timeout: self.send_timeout,
                    }
                } else {
                    GatewayError::SendFailed {
                        kind,
                        to: to.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(GatewayError::SendFailed {
                kind,
                to: to.to_string(),
                reason: format!("{status}: {detail}"),
            });
        }

        tracing::debug!(to, kind, "Outbound message delivered");
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for WhatsAppGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": body },
        });
        self.post_message("text", to, payload).await
    }

    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        options: &[ButtonOption],
    ) -> Result<(), GatewayError> {
        check_button_count(options)?;

        let buttons: Vec<serde_json::Value> = options
            .iter()
            .map(|b| {
                serde_json::json!({
                    "type": "reply",
                    "reply": { "id": b.id, "title": b.title },
                })
            })
            .collect();

        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": body },
                "action": { "buttons": buttons },
            },
        });
        self.post_message("buttons", to, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> WhatsAppGateway {
        WhatsAppGateway::new(
            SecretString::from("fake-token"),
            "1234567890",
            Duration::from_millis(200),
        )
    }

    #[test]
    fn api_url_includes_phone_number_id() {
        let gw = gateway();
        assert_eq!(
            gw.api_url(),
            "https://graph.facebook.com/v22.0/1234567890/messages"
        );
    }

    #[tokio::test]
    async fn send_buttons_rejects_oversized_set_before_network() {
        let gw = gateway();
        let options: Vec<ButtonOption> = (0..4)
            .map(|i| ButtonOption::new(format!("ID_{i}"), "t"))
            .collect();

        let err = gw
            .send_buttons("15551234567", "pick one", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidButtons(_)));
    }

    #[tokio::test]
    async fn send_buttons_rejects_empty_set() {
        let gw = gateway();
        let err = gw
            .send_buttons("15551234567", "pick one", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidButtons(_)));
    }
}
