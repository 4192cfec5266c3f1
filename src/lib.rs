//! Verification and acknowledgment of signed payment-status webhooks.
//!
//! The [`common::handler::WebhookVerifier`] checks the `X-Signature` header
//! against an HMAC-SHA256 of the raw request body and, once the body is
//! authenticated, decodes it into an [`common::types::OrderStatusPayload`]
//! and builds the acknowledgment returned to the sender.

pub mod common;
pub mod test_utils;
