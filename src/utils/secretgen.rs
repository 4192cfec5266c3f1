use rand::rngs::OsRng;
use rand::RngCore;
use std::fs;

const SECRET_LEN: usize = 32;

fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| payment_webhook_verifier::common::config::DEFAULT_SECRET_FILE.to_string());

    // Generate a new shared secret
    let secret = generate_secret();

    // Save it where the verifier looks for it by default
    fs::write(&path, format!("{}\n", secret))?;
    println!("Webhook secret saved to {}", path);
    println!("Configure the sending service with the same value:\n{}", secret);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let secret = generate_secret();

        assert_eq!(secret.len(), SECRET_LEN * 2);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_secret_is_random() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
