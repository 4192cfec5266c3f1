use std::env;
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::common::error::ConfigError;
use crate::common::telemetry::LogPolicy;
use crate::common::verify::SharedSecret;

pub const DEFAULT_SECRET_FILE: &str = "webhook_secret.txt";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Settings for the verifier hosts, injected into the handler at startup.
#[derive(Clone, Debug)]
pub struct VerifierConfig {
    pub secret: SharedSecret,
    pub bind_addr: SocketAddr,
    pub log_policy: LogPolicy,
}

impl VerifierConfig {
    /// Reads configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = load_secret(&lookup)?;

        let bind_value = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let log_policy = match lookup("WEBHOOK_LOG_PAYLOADS").as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("TRUE") | Some("yes") => LogPolicy::Full,
            _ => LogPolicy::Redacted,
        };

        Ok(Self {
            secret,
            bind_addr,
            log_policy,
        })
    }
}

/// Loads the shared secret from `WEBHOOK_SECRET`, falling back to the file
/// named by `WEBHOOK_SECRET_FILE` (default `webhook_secret.txt`).
pub fn load_secret<F>(lookup: &F) -> Result<SharedSecret, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("WEBHOOK_SECRET").filter(|s| !s.is_empty()) {
        return SharedSecret::new(value);
    }

    let path = PathBuf::from(
        lookup("WEBHOOK_SECRET_FILE").unwrap_or_else(|| DEFAULT_SECRET_FILE.to_string()),
    );
    match fs::read(&path) {
        Ok(contents) => SharedSecret::new(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::MissingSecret(path)),
        Err(source) => Err(ConfigError::SecretFile { path, source }),
    }
}
