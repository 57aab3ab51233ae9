//! Serde model of the inbound Graph webhook body.
//!
//! Deliberately lenient: every level defaults to empty so delivery
//! receipts, status batches, and partial payloads deserialize cleanly
//! and simply carry no message.

use serde::Deserialize;

/// Top-level webhook body: `entry[].changes[].value.messages[]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

/// One inbound customer message.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Sender identifier (phone number).
    pub from: String,
    /// Provider message type: `text`, `interactive`, or anything else
    /// (audio, image, ...) which classifies as a text-like fallback.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextContent>,
    #[serde(default)]
    pub interactive: Option<InteractiveContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractiveContent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub button_reply: Option<ButtonReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonReply {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl WebhookPayload {
    /// The first inbound message, if the payload carries one at all.
    pub fn first_message(&self) -> Option<&InboundMessage> {
        self.entry
            .first()?
            .changes
            .first()?
            .value
            .messages
            .first()
    }
}

impl InboundMessage {
    /// The tapped button id, when this is an interactive button reply.
    pub fn button_reply_id(&self) -> Option<&str> {
        let interactive = self.interactive.as_ref()?;
        if interactive.kind != "button_reply" {
            return None;
        }
        interactive.button_reply.as_ref().map(|b| b.id.as_str())
    }

    /// The text body, when this is a text message.
    pub fn text_body(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        self.text.as_ref().map(|t| t.body.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> WebhookPayload {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn extracts_text_message() {
        let payload = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "15551234567", "type": "text", "text": {"body": "hello"}}
                ]}}]}
            ]}"#,
        );
        let msg = payload.first_message().unwrap();
        assert_eq!(msg.from, "15551234567");
        assert_eq!(msg.text_body(), Some("hello"));
        assert!(msg.button_reply_id().is_none());
    }

    #[test]
    fn extracts_button_reply() {
        let payload = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "15551234567", "type": "interactive",
                     "interactive": {"type": "button_reply",
                                     "button_reply": {"id": "PLAN_BUSINESS", "title": "Business"}}}
                ]}}]}
            ]}"#,
        );
        let msg = payload.first_message().unwrap();
        assert_eq!(msg.button_reply_id(), Some("PLAN_BUSINESS"));
        assert!(msg.text_body().is_none());
    }

    #[test]
    fn delivery_receipt_has_no_message() {
        let payload = parse(
            r#"{"entry": [{"changes": [{"value": {"statuses": [{"id": "wamid.X"}]}}]}]}"#,
        );
        assert!(payload.first_message().is_none());
    }

    #[test]
    fn empty_body_has_no_message() {
        assert!(parse("{}").first_message().is_none());
        assert!(parse(r#"{"entry": []}"#).first_message().is_none());
    }

    #[test]
    fn non_button_interactive_is_not_a_button_reply() {
        let payload = parse(
            r#"{
                "entry": [{"changes": [{"value": {"messages": [
                    {"from": "1", "type": "interactive",
                     "interactive": {"type": "list_reply",
                                     "button_reply": {"id": "X", "title": "t"}}}
                ]}}]}
            ]}"#,
        );
        assert!(payload.first_message().unwrap().button_reply_id().is_none());
    }
}
