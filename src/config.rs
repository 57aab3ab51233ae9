//! Environment-driven configuration.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Graph API bearer token.
    pub whatsapp_token: SecretString,
    /// WhatsApp Business phone number id (the sending number).
    pub phone_number_id: String,
    /// Shared secret for the webhook verification handshake.
    pub verify_token: String,
    /// Path of the libSQL database file.
    pub db_path: String,
    /// Port for the webhook HTTP server.
    pub port: u16,
    /// Case-insensitive keyword that resets a conversation.
    pub reset_keyword: String,
    /// Whether a customer message at the Support stage closes the
    /// conversation (moves it to Done) instead of leaving it open.
    pub support_closes_conversation: bool,
    /// Timeout for each outbound send.
    pub send_timeout: Duration,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let whatsapp_token = require_env("WHATSAPP_TOKEN")?;
        let phone_number_id = require_env("PHONE_NUMBER_ID")?;
        let verify_token = require_env("VERIFY_TOKEN")?;

        let db_path = std::env::var("STOREBOT_DB_PATH")
            .unwrap_or_else(|_| "./data/storebot.db".to_string());

        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("not a valid port number: {v}"),
            })?,
            Err(_) => 3000,
        };

        let reset_keyword =
            std::env::var("STOREBOT_RESET_KEYWORD").unwrap_or_else(|_| "/reset".to_string());

        let support_closes_conversation = std::env::var("STOREBOT_SUPPORT_CLOSES")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let send_timeout_secs: u64 = match std::env::var("STOREBOT_SEND_TIMEOUT_SECS") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "STOREBOT_SEND_TIMEOUT_SECS".into(),
                message: format!("not a valid number of seconds: {v}"),
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            whatsapp_token: SecretString::from(whatsapp_token),
            phone_number_id,
            verify_token,
            db_path,
            port,
            reset_keyword,
            support_closes_conversation,
            send_timeout: Duration::from_secs(send_timeout_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}
