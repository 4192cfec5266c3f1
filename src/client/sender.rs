use std::time::Duration;

use payment_webhook_verifier::common::config;
use payment_webhook_verifier::common::signer::{sign_payload, SignedPayload};
use payment_webhook_verifier::common::sample;
use reqwest::StatusCode;
use thiserror::Error;

const DEFAULT_WEBHOOK_URL: &str = "http://127.0.0.1:3000/webhook";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
enum SendError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned status {status} with body: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Posts an already-signed body, byte for byte, with its signature header.
async fn deliver(
    client: &reqwest::Client,
    url: &str,
    signed: &SignedPayload,
) -> Result<String, SendError> {
    let transport = |source| SendError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .header("X-Signature", &signed.signature)
        .timeout(REQUEST_TIMEOUT)
        .body(signed.body.clone())
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(SendError::Rejected { status, body: text });
    }
    Ok(text)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Get the webhook URL from command line arguments or use default
    let webhook_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());

    println!("Sending webhook to: {}", webhook_url);

    let secret = config::load_secret(&|key: &str| std::env::var(key).ok())?;

    // Serialize once; the signature covers exactly these bytes
    let signed = sign_payload(&sample::sample_payload(), &secret)?;
    println!("Generated signature: {}", signed.signature);
    println!("Payload: {}", signed.body);

    let client = reqwest::Client::new();
    match deliver(&client, &webhook_url, &signed).await {
        Ok(response_text) => {
            println!("Server response: {}", response_text);
            Ok(())
        }
        Err(e) => {
            println!("Error sending webhook: {}", e);
            Err(e.into())
        }
    }
}
