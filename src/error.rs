//! Error types for storebot.

use std::time::Duration;

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Conversation store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Schema init failed: {0}")]
    Schema(String),
}

/// Outbound messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to send {kind} to {to}: {reason}")]
    SendFailed {
        kind: &'static str,
        to: String,
        reason: String,
    },

    #[error("Send to {to} timed out after {timeout:?}")]
    Timeout { to: String, timeout: Duration },

    #[error("Invalid button set: {0}")]
    InvalidButtons(String),
}

/// Inbound webhook errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Verification failed")]
    VerificationFailed,
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
