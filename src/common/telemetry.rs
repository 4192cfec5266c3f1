//! Diagnostic side channel for the verifier.
//!
//! Every log line the request path emits goes through [`record`]. Events
//! are fire-and-forget: `tracing` never reports failure back to the caller,
//! so nothing here can alter the response.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::common::error::WebhookError;
use crate::common::types::OrderStatusPayload;

/// How much request detail reaches the logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogPolicy {
    /// Sizes, order identifiers and outcomes only.
    #[default]
    Redacted,
    /// Also the raw body and both signatures, at debug level. Request
    /// headers are not logged here; the HTTP host's trace layer records
    /// the request line.
    Full,
}

/// Checkpoints on the accept/reject path.
#[derive(Debug)]
pub enum WebhookEvent<'a> {
    Received {
        body: &'a [u8],
        signature: Option<&'a str>,
    },
    SignatureChecked {
        expected: &'a str,
        received: &'a str,
        valid: bool,
    },
    Parsed {
        payload: &'a OrderStatusPayload,
    },
    Rejected {
        error: &'a WebhookError,
    },
}

pub fn record(policy: LogPolicy, event: WebhookEvent<'_>) {
    match event {
        WebhookEvent::Received { body, signature } => {
            tracing::info!(
                body_len = body.len(),
                has_signature = signature.is_some_and(|s| !s.is_empty()),
                "webhook received"
            );
            if policy == LogPolicy::Full {
                tracing::debug!(
                    payload = %String::from_utf8_lossy(body),
                    signature = signature.unwrap_or(""),
                    "webhook raw request"
                );
            }
        }
        WebhookEvent::SignatureChecked {
            expected,
            received,
            valid,
        } => {
            if policy == LogPolicy::Full {
                tracing::debug!(expected, received, valid, "signature compared");
            } else {
                tracing::debug!(valid, "signature compared");
            }
        }
        WebhookEvent::Parsed { payload } => {
            tracing::info!(
                order_id = payload.order_id.as_deref().unwrap_or("unknown"),
                status = %payload
                    .order_status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                usd_amount = payload.usd_amount.as_deref().unwrap_or("unknown"),
                btc_amount = payload.btc_amount.as_deref().unwrap_or("unknown"),
                outcome = "accepted",
                "webhook processed"
            );
        }
        WebhookEvent::Rejected { error } => match error {
            WebhookError::MalformedPayload(source) => {
                tracing::warn!(outcome = error.kind(), error = %source, "webhook rejected");
            }
            _ => {
                tracing::warn!(outcome = error.kind(), "webhook rejected");
            }
        },
    }
}

/// Installs the global subscriber for the long-running server.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this twice is
/// harmless; the second installation is ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
