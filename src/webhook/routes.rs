//! Axum routes for the provider webhook.
//!
//! `GET /webhook` answers the verification handshake and never reaches
//! the dispatcher. `POST /webhook` acknowledges every delivery with 200,
//! whatever happened internally, so the provider does not retry an
//! already-handled event.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::WebhookError;
use crate::webhook::dispatcher::Dispatcher;
use crate::webhook::payload::WebhookPayload;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<Dispatcher>,
    pub verify_token: String,
}

/// Query parameters of the Meta verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
}

/// GET /webhook — echo the challenge iff the token matches.
async fn verify(
    State(state): State<WebhookState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let subscribed = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if subscribed && token_ok {
        info!("Webhook verification succeeded");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        warn!(error = %WebhookError::VerificationFailed, "Webhook verification rejected");
        (StatusCode::FORBIDDEN, String::new())
    }
}

/// POST /webhook — parse leniently, dispatch, always acknowledge.
async fn deliver(State(state): State<WebhookState>, body: String) -> StatusCode {
    match serde_json::from_str::<WebhookPayload>(&body) {
        Ok(payload) => {
            let outcome = state.dispatcher.handle(&payload).await;
            tracing::debug!(?outcome, "Webhook delivery processed");
        }
        Err(e) => {
            // Malformed bodies are acknowledged too; retrying them
            // cannot help.
            let err = WebhookError::MalformedPayload(e.to_string());
            warn!(error = %err, "Unparseable webhook body; acknowledged as no-op");
        }
    }
    StatusCode::OK
}

/// Build the webhook router.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", get(verify))
        .route("/webhook", post(deliver))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::dialog::{ButtonOption, DialogPolicy};
    use crate::error::GatewayError;
    use crate::gateway::MessageGateway;
    use crate::store::{ConversationStore, MemoryStore};

    struct NullGateway;

    #[async_trait]
    impl MessageGateway for NullGateway {
        async fn send_text(&self, _to: &str, _body: &str) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn send_buttons(
            &self,
            _to: &str,
            _body: &str,
            _options: &[ButtonOption],
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn test_router() -> Router {
        let dispatcher = Dispatcher::new(
            Arc::new(MemoryStore::new()) as Arc<dyn ConversationStore>,
            Arc::new(NullGateway) as Arc<dyn MessageGateway>,
            DialogPolicy::default(),
            "/reset",
        );
        webhook_routes(WebhookState {
            dispatcher: Arc::new(dispatcher),
            verify_token: "shared-secret".into(),
        })
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn verification_echoes_challenge_on_token_match() {
        let resp = test_router()
            .oneshot(
                Request::get(
                    "/webhook?hub.mode=subscribe&hub.verify_token=shared-secret&hub.challenge=12345",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "12345");
    }

    #[tokio::test]
    async fn verification_rejects_bad_token() {
        let resp = test_router()
            .oneshot(
                Request::get(
                    "/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn verification_rejects_wrong_mode() {
        let resp = test_router()
            .oneshot(
                Request::get(
                    "/webhook?hub.mode=unsubscribe&hub.verify_token=shared-secret&hub.challenge=1",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delivery_is_acknowledged() {
        let body = serde_json::json!({
            "entry": [{"changes": [{"value": {"messages": [
                {"from": "15551234567", "type": "text", "text": {"body": "hello"}}
            ]}}]}]
        });
        let resp = test_router()
            .oneshot(
                Request::post("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_still_acknowledged() {
        let resp = test_router()
            .oneshot(
                Request::post("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from("this is not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
