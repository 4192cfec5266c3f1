use std::path::PathBuf;

use thiserror::Error;

/// Reasons a webhook delivery is turned away.
///
/// Each variant maps to exactly one HTTP status and one public message.
/// The wrapped parser error is kept for server-side logging only and is
/// never sent back to the caller.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing signature")]
    MissingSignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

impl WebhookError {
    pub fn status_code(&self) -> u16 {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => 401,
            WebhookError::MalformedPayload(_) => 400,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "Firma no proporcionada",
            WebhookError::InvalidSignature => "Firma inválida",
            WebhookError::MalformedPayload(_) => "Payload JSON inválido",
        }
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "missing_signature",
            WebhookError::InvalidSignature => "invalid_signature",
            WebhookError::MalformedPayload(_) => "malformed_payload",
        }
    }
}

/// Errors raised while loading service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no webhook secret configured: set WEBHOOK_SECRET or provide {0}")]
    MissingSecret(PathBuf),

    #[error("webhook secret is empty after trimming whitespace")]
    EmptySecret,

    #[error("failed to read webhook secret from {path}")]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid BIND_ADDR {value:?}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}
