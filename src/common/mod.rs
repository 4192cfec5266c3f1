pub mod config;
pub mod error;
pub mod handler;
pub mod sample;
pub mod signer;
pub mod telemetry;
pub mod types;
pub mod verify;
