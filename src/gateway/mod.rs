//! Outbound messaging abstraction.

pub mod whatsapp;

use async_trait::async_trait;

use crate::dialog::ButtonOption;
use crate::error::GatewayError;

pub use whatsapp::WhatsAppGateway;

/// Maximum reply buttons on one interactive message (provider limit).
pub const MAX_BUTTONS: usize = 3;

/// The provider's send-message surface. Each call is one best-effort
/// attempt with a bounded timeout; retries are the caller's concern
/// (and deliberately absent here).
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError>;

    /// Send a text body with 1–3 reply buttons.
    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        options: &[ButtonOption],
    ) -> Result<(), GatewayError>;
}

/// Reject button sets the provider would refuse, before the HTTP call.
pub(crate) fn check_button_count(options: &[ButtonOption]) -> Result<(), GatewayError> {
    if options.is_empty() {
        return Err(GatewayError::InvalidButtons("empty button list".into()));
    }
    if options.len() > MAX_BUTTONS {
        return Err(GatewayError::InvalidButtons(format!(
            "{} buttons, provider allows at most {MAX_BUTTONS}",
            options.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(n: usize) -> Vec<ButtonOption> {
        (0..n)
            .map(|i| ButtonOption::new(format!("ID_{i}"), format!("Title {i}")))
            .collect()
    }

    #[test]
    fn button_count_bounds() {
        assert!(check_button_count(&opts(0)).is_err());
        assert!(check_button_count(&opts(1)).is_ok());
        assert!(check_button_count(&opts(3)).is_ok());
        assert!(check_button_count(&opts(4)).is_err());
    }
}
