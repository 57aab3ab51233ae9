use std::path::Path;
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use storebot::config::Config;
use storebot::dialog::DialogPolicy;
use storebot::gateway::{MessageGateway, WhatsAppGateway};
use storebot::store::{ConversationStore, LibSqlStore};
use storebot::webhook::{webhook_routes, Dispatcher, WebhookState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    eprintln!("🛒 storebot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);
    eprintln!("   Database: {}", config.db_path);
    eprintln!(
        "   Support closes conversation: {}",
        config.support_closes_conversation
    );

    let store: Arc<dyn ConversationStore> =
        Arc::new(LibSqlStore::new_local(Path::new(&config.db_path)).await?);

    let gateway: Arc<dyn MessageGateway> = Arc::new(WhatsAppGateway::new(
        config.whatsapp_token.clone(),
        config.phone_number_id.clone(),
        config.send_timeout,
    ));

    let policy = DialogPolicy {
        support_closes_conversation: config.support_closes_conversation,
    };
    let dispatcher = Arc::new(Dispatcher::new(
        store,
        gateway,
        policy,
        config.reset_keyword.clone(),
    ));

    let app = webhook_routes(WebhookState {
        dispatcher,
        verify_token: config.verify_token.clone(),
    })
    .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
