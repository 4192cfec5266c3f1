use std::fmt;

use subtle::ConstantTimeEq;

use crate::common::error::ConfigError;
use crate::common::signer::compute_signature;

/// Shared HMAC key, provisioned out of band and identical on both ends.
///
/// Surrounding whitespace (space, tab, newline, carriage return, NUL and
/// vertical tab) is stripped on construction, so a secret read from a file
/// with a trailing newline keys the MAC the same way as the bare value.
#[derive(Clone)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(raw: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let trimmed = trim_secret(raw.as_ref());
        if trimmed.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self(trimmed.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedSecret").field(&"<redacted>").finish()
    }
}

fn is_trimmable(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0B)
}

fn trim_secret(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|b| !is_trimmable(b)).unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !is_trimmable(b))
        .map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Checks `signature` against the lowercase hex HMAC-SHA256 of `payload`.
///
/// The comparison runs over the hex text in constant time, so the time
/// taken does not depend on where the first differing character sits. A
/// signature of the wrong length never matches.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &SharedSecret) -> bool {
    let expected = compute_signature(secret, payload);
    signatures_match(&expected, signature)
}

/// Constant-time equality of an expected and a received hex signature.
pub fn signatures_match(expected: &str, received: &str) -> bool {
    constant_time_eq(expected.as_bytes(), received.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
