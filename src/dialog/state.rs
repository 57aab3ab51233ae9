//! Conversation stages and the per-customer record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog plan the customer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Business,
    PlusEmail,
    PlusReady,
}

impl Plan {
    /// Customer-facing name, used in the confirmation summary.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Business => "ChatGPT Business",
            Self::PlusEmail => "ChatGPT Plus",
            Self::PlusReady => "Plus-ready account",
        }
    }

    /// Stable token used in the database and in button ids.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::PlusEmail => "plus_email",
            Self::PlusReady => "plus_ready",
        }
    }

    /// Parse a stored token back into a plan.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "business" => Some(Self::Business),
            "plus_email" => Some(Self::PlusEmail),
            "plus_ready" => Some(Self::PlusReady),
            _ => None,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// The stage of a single customer's conversation.
///
/// Progresses along the funnel: Start → Menu → ChoosingPlan →
/// AwaitingEmail(plan) → Done, with Support as a side exit. Done is
/// terminal: the engine never produces actions for a Done record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "plan", rename_all = "snake_case")]
pub enum Stage {
    Start,
    Menu,
    ChoosingPlan,
    AwaitingEmail(Plan),
    Support,
    Done,
}

impl Stage {
    /// Whether this stage is terminal (the bot has handed off).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Stable token for the database `stage` column. The AwaitingEmail
    /// payload is stored separately in the `plan` column.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Menu => "menu",
            Self::ChoosingPlan => "choosing_plan",
            Self::AwaitingEmail(_) => "awaiting_email",
            Self::Support => "support",
            Self::Done => "done",
        }
    }

    /// Rebuild a stage from its stored token and plan column.
    ///
    /// An `awaiting_email` row without a usable plan degrades to
    /// `ChoosingPlan`, so a corrupt row becomes a re-prompt rather than
    /// a panic. Unknown tokens degrade to `Start`.
    pub fn from_tokens(stage: &str, plan: Option<&str>) -> Self {
        match stage {
            "start" => Self::Start,
            "menu" => Self::Menu,
            "choosing_plan" => Self::ChoosingPlan,
            "awaiting_email" => match plan.and_then(Plan::from_token) {
                Some(p) => Self::AwaitingEmail(p),
                None => Self::ChoosingPlan,
            },
            "support" => Self::Support,
            "done" => Self::Done,
            _ => Self::Start,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Start
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// One durable record per customer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Stable external identifier (WhatsApp phone number).
    pub customer_id: String,
    pub stage: Stage,
    /// Plan the customer committed to; set together with Done.
    pub selected_plan: Option<Plan>,
    /// Validated email; set together with Done.
    pub captured_email: Option<String>,
    /// Timestamp of the last mutation. Observability only.
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    /// Fresh record at the Start stage.
    pub fn new(customer_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            customer_id: customer_id.into(),
            stage: Stage::Start,
            selected_plan: None,
            captured_email: None,
            updated_at: now,
        }
    }
}
