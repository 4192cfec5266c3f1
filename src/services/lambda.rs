use std::sync::Arc;
use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use payment_webhook_verifier::common::config::VerifierConfig;
use payment_webhook_verifier::common::handler::{WebhookVerifier, SIGNATURE_HEADER};

/// Main function for the Lambda handler
#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .with_line_number(false)
        .init();

    let config = VerifierConfig::from_env()?;
    let verifier = Arc::new(WebhookVerifier::from_config(&config));
    run(service_fn(|event| handle_request(event, verifier.clone()))).await
}

/// Route the incoming request
async fn handle_request(event: Request, verifier: Arc<WebhookVerifier>) -> Result<Response<Body>, Error> {
    let path = event.uri().path();
    tracing::debug!(path, method = %event.method(), "lambda request");

    // Handle both root path and /webhook path
    if path != "/" && path != "/webhook" {
        return Ok(Response::builder()
            .status(404)
            .body(Body::from("Not Found"))?);
    }
    if event.method() != Method::POST {
        return Ok(Response::builder()
            .status(405)
            .header("Allow", "POST")
            .body(Body::from("Method Not Allowed"))?);
    }

    handle_webhook_request(event, &verifier)
}

/// Verify the delivery and render the reply as JSON
fn handle_webhook_request(event: Request, verifier: &WebhookVerifier) -> Result<Response<Body>, Error> {
    let signature = event
        .headers()
        .get(SIGNATURE_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let reply = verifier.handle(event.body(), signature.as_deref());

    Ok(Response::builder()
        .status(reply.status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&reply.body)?))?)
}
