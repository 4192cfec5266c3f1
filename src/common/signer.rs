use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::common::types::OrderStatusPayload;
use crate::common::verify::SharedSecret;

type HmacSha256 = Hmac<Sha256>;

/// A serialized payload together with the signature over its exact bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedPayload {
    pub body: String,
    pub signature: String,
}

/// Computes the lowercase hex HMAC-SHA256 of `body` keyed by `secret`.
pub fn compute_signature(secret: &SharedSecret, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Serializes `payload` once and signs the resulting bytes.
///
/// The returned `body` must be sent unchanged: re-serializing it before
/// delivery would change the bytes the receiver hashes.
pub fn sign_payload(
    payload: &OrderStatusPayload,
    secret: &SharedSecret,
) -> Result<SignedPayload, serde_json::Error> {
    let body = serde_json::to_string(payload)?;
    let signature = compute_signature(secret, body.as_bytes());

    Ok(SignedPayload { body, signature })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let secret = SharedSecret::new("Jefe").unwrap();
        let signature = compute_signature(&secret, b"what do ya want for nothing?");

        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signature_format() {
        let secret = SharedSecret::new("test-secret").unwrap();
        let signature = compute_signature(&secret, b"payload");

        assert_eq!(signature.len(), 64);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_sign_payload_signs_exact_body() {
        let secret = SharedSecret::new(test_utils::TEST_SECRET).unwrap();
        let SignedPayload { body, signature } =
            sign_payload(&test_utils::sample_payload(), &secret).unwrap();

        assert_eq!(signature, compute_signature(&secret, body.as_bytes()));
        assert!(body.contains("\"orderId\":\"da8972b7-6471-4a8d-a05a-1bdfafeadfa4\""));
    }
}
