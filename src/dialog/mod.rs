//! The per-conversation dialog state machine.

pub mod catalog;
pub mod email;
pub mod engine;
pub mod state;

pub use engine::{transition, Action, ButtonId, ButtonOption, DialogPolicy, Event, Transition};
pub use state::{ConversationRecord, Plan, Stage};
