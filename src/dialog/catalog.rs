//! Customer-facing text: catalog, menus, prompts.
//!
//! Everything a customer reads lives here so the engine stays free of
//! presentation concerns. Button ids are part of the wire vocabulary and
//! are shared with webhook classification.

use super::engine::ButtonOption;
use super::state::Plan;

// ── Button id vocabulary ────────────────────────────────────────────

pub const BTN_SHOW_DETAILS: &str = "SUB_DETAILS";
pub const BTN_CONTACT_SUPPORT: &str = "SUPPORT";
pub const BTN_PLAN_BUSINESS: &str = "PLAN_BUSINESS";
pub const BTN_PLAN_PLUS_EMAIL: &str = "PLAN_PLUS_EMAIL";
pub const BTN_PLAN_PLUS_READY: &str = "PLAN_PLUS_READY";

/// Ids emitted by the previous generation of the bot. Accepted on input
/// so in-flight conversations survive an upgrade; never emitted.
pub const LEGACY_BTN_SHOW_DETAILS: &str = "MENU_DETAILS";
pub const LEGACY_BTN_CONTACT_SUPPORT: &str = "MENU_SUPPORT";

// ── Catalog ─────────────────────────────────────────────────────────

/// Full subscription catalog, sent before the plan menu.
pub const CATALOG_TEXT: &str = "\
🔥 ChatGPT subscription offers — pick the plan that fits you

Hi there 👋✨
These are the plans currently available:

═══════════════════════
🌟 ChatGPT Business (20/mo)
✔ Fresh chats without limits
✔ Pro mode supported
✔ Far more images than Plus

═══════════════════════
⭐ ChatGPT Plus (30/mo) on your own email
📌 Note: activation needs your login details temporarily (email + password)
✔ Images (may be limited under load)

═══════════════════════
💎 Ready-made Plus account from us (15)
✔ Email + password ready to use
";

// ── Menus ───────────────────────────────────────────────────────────

/// Body of the main menu prompt.
pub fn main_menu_body() -> String {
    "Welcome to Aqib Digital Store 👋✨\nHow can we help you today?".to_string()
}

/// The two top-level choices: plan details or human support.
pub fn main_menu_buttons() -> Vec<ButtonOption> {
    vec![
        ButtonOption::new(BTN_SHOW_DETAILS, "📌 Subscription details"),
        ButtonOption::new(BTN_CONTACT_SUPPORT, "🛠️ Talk to support"),
    ]
}

/// Body of the plan picker prompt.
pub fn plan_menu_body() -> String {
    "✅ Which plan would you like to subscribe to?".to_string()
}

/// The three plan choices, with prices in the titles.
pub fn plan_menu_buttons() -> Vec<ButtonOption> {
    vec![
        ButtonOption::new(BTN_PLAN_BUSINESS, "🔥 Business – 20"),
        ButtonOption::new(BTN_PLAN_PLUS_EMAIL, "⭐ Plus – 30"),
        ButtonOption::new(BTN_PLAN_PLUS_READY, "💎 Ready Plus – 15"),
    ]
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Ask for the email after a plan was chosen. The PlusEmail plan needs
/// temporary login credentials for activation, so its prompt says so.
pub fn email_prompt(plan: Plan) -> String {
    match plan {
        Plan::Business => "Excellent 🔥\nSend the email you want your Business \
                           subscription (20/mo) activated on."
            .to_string(),
        Plan::PlusEmail => "Excellent ⭐\nSend the email for your Plus subscription \
                            (30/mo). Note: activation needs your login details \
                            temporarily (email + password)."
            .to_string(),
        Plan::PlusReady => "💎 Great!\nThis is a ready-made Plus account from us (15).\n\
                            Send the email you want the account details delivered to."
            .to_string(),
    }
}

/// Retry prompt for a failed email validation.
pub fn invalid_email_prompt() -> String {
    "That doesn't look like a valid email address 🤔\nPlease send it like \
     name@example.com."
        .to_string()
}

/// Final summary once the email was captured.
pub fn confirmation_summary(plan: Plan, email: &str) -> String {
    format!(
        "All set ✅\nPlan: {}\nEmail: {}\nOur team will contact you shortly to \
         complete the activation.",
        plan.display_name(),
        email
    )
}

/// Handoff message when the customer asks for support.
pub fn support_handoff() -> String {
    "Thank you ✅\nYou are being connected to our support team now.".to_string()
}

/// Acknowledgment for a message while waiting on support.
pub fn support_ack() -> String {
    "Message received 📨 — our support team will get back to you.".to_string()
}

/// Nudge sent when free text arrives where a button tap was expected.
pub fn use_buttons_nudge() -> String {
    "Please use the buttons below to choose 👇".to_string()
}

/// Confirmation after an explicit reset.
pub fn reset_confirmation() -> String {
    "Conversation reset 🔄".to_string()
}
