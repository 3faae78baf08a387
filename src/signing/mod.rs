//! Cryptographic helpers
//!
//! RS256 playback tokens for restricted videos and HMAC-SHA256 verification
//! of inbound webhook notifications.

pub mod token;
pub mod webhook;

pub use token::TokenSigner;
pub use webhook::{SIGNATURE_HEADER, SignatureHeader, WebhookVerifier};
