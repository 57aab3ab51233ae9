//! The dialog engine — a pure transition function over conversation state.
//!
//! `transition` maps (record, event) to (new record, outbound actions)
//! and performs no I/O. The dispatcher owns loading, saving, and sending.
//!
//! Two rules dominate everything else:
//! - `ResetCommand` wins from any stage, including `Done`.
//! - A `Done` record is otherwise inert: identical record, zero actions.

use chrono::{DateTime, Utc};

use super::catalog;
use super::email::is_valid_email;
use super::state::{ConversationRecord, Plan, Stage};

/// A structured button choice, classified from the raw button-reply id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    ShowDetails,
    ContactSupport,
    PlanChosen(Plan),
}

/// One classified inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Explicit administrative reset request.
    ResetCommand,
    ButtonPressed(ButtonId),
    /// Free-form text, including anything unclassifiable.
    TextReceived(String),
}

/// One `{id, title}` reply option on an interactive message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonOption {
    pub id: String,
    pub title: String,
}

impl ButtonOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One outbound send instruction. The recipient is the record's customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SendText(String),
    SendButtons {
        body: String,
        options: Vec<ButtonOption>,
    },
}

/// Behavior knobs decided per deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogPolicy {
    /// If set, the first customer message at `Support` closes the
    /// conversation (moves it to `Done`). Otherwise it stays open and
    /// each message gets a short acknowledgment.
    pub support_closes_conversation: bool,
}

/// Result of one engine invocation.
#[derive(Debug, Clone)]
pub struct Transition {
    pub record: ConversationRecord,
    pub actions: Vec<Action>,
}

impl Transition {
    fn unchanged(record: &ConversationRecord, actions: Vec<Action>) -> Self {
        Self {
            record: record.clone(),
            actions,
        }
    }
}

/// Compute the next record and outbound actions for one inbound event.
pub fn transition(
    record: &ConversationRecord,
    event: &Event,
    policy: &DialogPolicy,
    now: DateTime<Utc>,
) -> Transition {
    // Reset beats everything, including the terminal stage.
    if matches!(event, Event::ResetCommand) {
        return Transition {
            record: ConversationRecord::new(record.customer_id.clone(), now),
            actions: vec![
                Action::SendText(catalog::reset_confirmation()),
                main_menu(),
            ],
        };
    }

    // Terminal silence: the bot has handed off to a human.
    if record.stage.is_terminal() {
        return Transition::unchanged(record, Vec::new());
    }

    match event {
        Event::ResetCommand => unreachable!("handled above"),
        Event::ButtonPressed(button) => on_button(record, *button, now),
        Event::TextReceived(text) => on_text(record, text, policy, now),
    }
}

/// Buttons behave the same from every non-terminal stage.
fn on_button(record: &ConversationRecord, button: ButtonId, now: DateTime<Utc>) -> Transition {
    match button {
        ButtonId::ShowDetails => Transition {
            record: advance(record, Stage::ChoosingPlan, now),
            actions: vec![
                Action::SendText(catalog::CATALOG_TEXT.to_string()),
                plan_menu(),
            ],
        },
        ButtonId::ContactSupport => Transition {
            record: advance(record, Stage::Support, now),
            actions: vec![Action::SendText(catalog::support_handoff())],
        },
        ButtonId::PlanChosen(plan) => Transition {
            record: advance(record, Stage::AwaitingEmail(plan), now),
            actions: vec![Action::SendText(catalog::email_prompt(plan))],
        },
    }
}

fn on_text(
    record: &ConversationRecord,
    text: &str,
    policy: &DialogPolicy,
    now: DateTime<Utc>,
) -> Transition {
    match record.stage {
        Stage::Start => Transition {
            record: advance(record, Stage::Menu, now),
            actions: vec![main_menu()],
        },
        Stage::Menu => Transition::unchanged(
            record,
            vec![Action::SendText(catalog::use_buttons_nudge()), main_menu()],
        ),
        Stage::ChoosingPlan => Transition::unchanged(
            record,
            vec![Action::SendText(catalog::use_buttons_nudge()), plan_menu()],
        ),
        Stage::AwaitingEmail(plan) => {
            if is_valid_email(text) {
                let email = text.trim().to_string();
                let mut next = advance(record, Stage::Done, now);
                next.selected_plan = Some(plan);
                next.captured_email = Some(email.clone());
                Transition {
                    record: next,
                    actions: vec![Action::SendText(catalog::confirmation_summary(
                        plan, &email,
                    ))],
                }
            } else {
                Transition::unchanged(
                    record,
                    vec![Action::SendText(catalog::invalid_email_prompt())],
                )
            }
        }
        Stage::Support => {
            let actions = vec![Action::SendText(catalog::support_ack())];
            if policy.support_closes_conversation {
                Transition {
                    record: advance(record, Stage::Done, now),
                    actions,
                }
            } else {
                Transition::unchanged(record, actions)
            }
        }
        Stage::Done => unreachable!("terminal stage handled by caller"),
    }
}

fn advance(record: &ConversationRecord, stage: Stage, now: DateTime<Utc>) -> ConversationRecord {
    let mut next = record.clone();
    next.stage = stage;
    next.updated_at = now;
    next
}

fn main_menu() -> Action {
    Action::SendButtons {
        body: catalog::main_menu_body(),
        options: catalog::main_menu_buttons(),
    }
}

fn plan_menu() -> Action {
    Action::SendButtons {
        body: catalog::plan_menu_body(),
        options: catalog::plan_menu_buttons(),
    }
}
