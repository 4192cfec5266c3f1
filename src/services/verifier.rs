use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use payment_webhook_verifier::common::config::VerifierConfig;
use payment_webhook_verifier::common::handler::{WebhookVerifier, SIGNATURE_HEADER};
use payment_webhook_verifier::common::telemetry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// The verifier is read-only, so a plain Arc is enough to share it
type SharedVerifier = Arc<WebhookVerifier>;

// Create a new router with the webhook endpoint
pub fn create_router(verifier: WebhookVerifier) -> Router {
    let verifier: SharedVerifier = Arc::new(verifier);

    Router::new()
        .route("/", post(handle_webhook))
        .route("/webhook", post(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(verifier)
}

// The body is taken as raw bytes: the signature covers exactly what arrived
async fn handle_webhook(
    State(verifier): State<SharedVerifier>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()));

    let reply = verifier.handle(&body, signature.as_deref());
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(reply.body)).into_response()
}


#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = VerifierConfig::from_env()?;
    let app = create_router(WebhookVerifier::from_config(&config));

    tracing::info!(addr = %config.bind_addr, log_policy = ?config.log_policy, "webhook verifier listening");

    // Run the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
