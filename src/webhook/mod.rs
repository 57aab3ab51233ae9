//! Inbound webhook surface: payload model, dispatcher, routes.

pub mod dispatcher;
pub mod payload;
pub mod routes;

pub use dispatcher::{Dispatcher, Outcome};
pub use payload::WebhookPayload;
pub use routes::{webhook_routes, WebhookState};
