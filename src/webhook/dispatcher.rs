//! The webhook dispatcher — classification, per-customer serialization,
//! one engine invocation per inbound message, best-effort sends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::dialog::{self, Action, ButtonId, DialogPolicy, Event, Plan};
use crate::dialog::catalog;
use crate::gateway::MessageGateway;
use crate::store::ConversationStore;
use crate::webhook::payload::{InboundMessage, WebhookPayload};

/// What happened to one inbound delivery. Every variant is acknowledged
/// with 200 to the transport; this is for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Payload carried no message (delivery receipt, empty batch).
    Ignored,
    /// A message was processed through the engine.
    Handled {
        customer_id: String,
        /// Actions the engine produced (possibly zero at Done).
        actions: usize,
        /// Actions whose send failed. Never rolls back the record.
        send_failures: usize,
        /// Whether the new record was durably saved.
        persisted: bool,
    },
}

/// Drives one dialog-engine invocation per inbound message.
pub struct Dispatcher {
    store: Arc<dyn ConversationStore>,
    gateway: Arc<dyn MessageGateway>,
    policy: DialogPolicy,
    reset_keyword: String,
    /// One async mutex per customer id, so concurrent deliveries for the
    /// same customer serialize their get-mutate-save instead of racing.
    /// Cross-customer deliveries stay fully independent.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        gateway: Arc<dyn MessageGateway>,
        policy: DialogPolicy,
        reset_keyword: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            policy,
            reset_keyword: reset_keyword.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one inbound webhook delivery.
    ///
    /// Never returns an error: every failure leg is logged and the
    /// delivery is acknowledged, so the provider does not retry an
    /// already-handled event.
    pub async fn handle(&self, payload: &WebhookPayload) -> Outcome {
        let Some(message) = payload.first_message() else {
            debug!("Payload carried no message; acknowledged as no-op");
            return Outcome::Ignored;
        };

        let customer_id = message.from.trim();
        if customer_id.is_empty() {
            warn!("Inbound message without a sender id; ignored");
            return Outcome::Ignored;
        }

        let event = self.classify(message);
        debug!(customer_id, ?event, "Classified inbound message");

        // Serialize get-mutate-save per customer.
        let lock = self.customer_lock(customer_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.process(customer_id, &event).await
        };
        drop(lock);
        self.release_customer_lock(customer_id);
        outcome
    }

    async fn process(&self, customer_id: &str, event: &Event) -> Outcome {
        let record = match self.store.get_or_create(customer_id).await {
            Ok(record) => record,
            Err(e) => {
                error!(customer_id, error = %e, "Store read failed; delivery acknowledged without processing");
                return Outcome::Ignored;
            }
        };

        let before_stage = record.stage;
        let transition = dialog::transition(&record, event, &self.policy, Utc::now());

        let changed = transition.record != record;
        let mut persisted = true;
        if changed {
            if let Err(e) = self.store.save(&transition.record).await {
                // Accepted limitation: the reply below may reach the
                // customer while the stage stays stale until their next
                // message.
                error!(customer_id, error = %e, "Store write failed; transition not committed");
                persisted = false;
            }
        }

        let mut send_failures = 0;
        for action in &transition.actions {
            if let Err(e) = self.execute(customer_id, action).await {
                warn!(customer_id, error = %e, "Outbound send failed; continuing");
                send_failures += 1;
            }
        }

        info!(
            customer_id,
            from_stage = %before_stage,
            to_stage = %transition.record.stage,
            actions = transition.actions.len(),
            send_failures,
            "Inbound message handled"
        );

        Outcome::Handled {
            customer_id: customer_id.to_string(),
            actions: transition.actions.len(),
            send_failures,
            persisted,
        }
    }

    /// Classify a raw message into one closed `Event`.
    ///
    /// Unknown button ids and unsupported message types fall back to an
    /// empty free-text event, which re-sends the stage-relevant menu.
    fn classify(&self, message: &InboundMessage) -> Event {
        if let Some(id) = message.button_reply_id() {
            return match id {
                catalog::BTN_SHOW_DETAILS | catalog::LEGACY_BTN_SHOW_DETAILS => {
                    Event::ButtonPressed(ButtonId::ShowDetails)
                }
                catalog::BTN_CONTACT_SUPPORT | catalog::LEGACY_BTN_CONTACT_SUPPORT => {
                    Event::ButtonPressed(ButtonId::ContactSupport)
                }
                catalog::BTN_PLAN_BUSINESS => {
                    Event::ButtonPressed(ButtonId::PlanChosen(Plan::Business))
                }
                catalog::BTN_PLAN_PLUS_EMAIL => {
                    Event::ButtonPressed(ButtonId::PlanChosen(Plan::PlusEmail))
                }
                catalog::BTN_PLAN_PLUS_READY => {
                    Event::ButtonPressed(ButtonId::PlanChosen(Plan::PlusReady))
                }
                other => {
                    // The raw id must not reach email capture, so it is
                    // dropped rather than forwarded as the text.
                    debug!(button_id = other, "Unknown button id; treating as empty free text");
                    Event::TextReceived(String::new())
                }
            };
        }

        if let Some(text) = message.text_body() {
            if text.trim().eq_ignore_ascii_case(&self.reset_keyword) {
                return Event::ResetCommand;
            }
            return Event::TextReceived(text.to_string());
        }

        // Unsupported message type (audio, image, sticker, ...).
        debug!(kind = %message.kind, "Unsupported message type; treating as free text");
        Event::TextReceived(String::new())
    }

    async fn execute(&self, to: &str, action: &Action) -> Result<(), crate::error::GatewayError> {
        match action {
            Action::SendText(body) => self.gateway.send_text(to, body).await,
            Action::SendButtons { body, options } => {
                self.gateway.send_buttons(to, body, options).await
            }
        }
    }

    fn customer_lock(&self, customer_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        Arc::clone(
            locks
                .entry(customer_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    /// Evict the customer's lock entry once no dispatch holds it, so the
    /// map does not keep one entry per historical customer.
    fn release_customer_lock(&self, customer_id: &str) {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        if locks
            .get(customer_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(customer_id);
        }
    }
}
