use serde::Serialize;

use crate::common::config::VerifierConfig;
use crate::common::error::WebhookError;
use crate::common::signer::compute_signature;
use crate::common::telemetry::{self, LogPolicy, WebhookEvent};
use crate::common::types::{ErrorBody, OrderStatusPayload, WebhookAck};
use crate::common::verify::{signatures_match, SharedSecret};

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-signature";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyBody {
    Ack(WebhookAck),
    Error(ErrorBody),
}

/// Status code and JSON body handed back to whichever host served the request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebhookReply {
    pub status: u16,
    pub body: ReplyBody,
}

impl WebhookReply {
    fn accepted(payload: &OrderStatusPayload) -> Self {
        Self {
            status: 200,
            body: ReplyBody::Ack(WebhookAck::from(payload)),
        }
    }

    fn rejected(error: &WebhookError) -> Self {
        Self {
            status: error.status_code(),
            body: ReplyBody::Error(ErrorBody {
                error: error.public_message().to_string(),
            }),
        }
    }
}

/// Authenticates webhook deliveries against a shared secret.
///
/// The verifier holds nothing but the read-only secret and the logging
/// policy, so one instance can serve any number of concurrent requests.
#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    secret: SharedSecret,
    log_policy: LogPolicy,
}

impl WebhookVerifier {
    pub fn new(secret: SharedSecret, log_policy: LogPolicy) -> Self {
        Self { secret, log_policy }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.secret.clone(), config.log_policy)
    }

    /// Checks the signature and, only once it matches, decodes the body.
    pub fn verify(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<OrderStatusPayload, WebhookError> {
        let signature = match signature {
            Some(s) if !s.is_empty() => s,
            _ => return Err(WebhookError::MissingSignature),
        };

        let expected = compute_signature(&self.secret, raw_body);
        let valid = signatures_match(&expected, signature);
        telemetry::record(
            self.log_policy,
            WebhookEvent::SignatureChecked {
                expected: &expected,
                received: signature,
                valid,
            },
        );
        if !valid {
            return Err(WebhookError::InvalidSignature);
        }

        OrderStatusPayload::parse(raw_body).map_err(WebhookError::MalformedPayload)
    }

    /// Runs the full accept/reject sequence for one delivery.
    pub fn handle(&self, raw_body: &[u8], signature: Option<&str>) -> WebhookReply {
        telemetry::record(
            self.log_policy,
            WebhookEvent::Received {
                body: raw_body,
                signature,
            },
        );

        match self.verify(raw_body, signature) {
            Ok(payload) => {
                telemetry::record(self.log_policy, WebhookEvent::Parsed { payload: &payload });
                WebhookReply::accepted(&payload)
            }
            Err(error) => {
                telemetry::record(self.log_policy, WebhookEvent::Rejected { error: &error });
                WebhookReply::rejected(&error)
            }
        }
    }
}

/// One-shot form of [`WebhookVerifier::handle`] for callers without a long-lived verifier.
pub fn handle(raw_body: &[u8], signature: Option<&str>, secret: &SharedSecret) -> WebhookReply {
    WebhookVerifier::new(secret.clone(), LogPolicy::Redacted).handle(raw_body, signature)
}
