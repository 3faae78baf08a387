//! Cloudflare Stream client
//!
//! A client library for managing videos hosted on Cloudflare Stream: uploading
//! by link, listing, fetching and deleting videos, restricting access, issuing
//! signed playback URLs and verifying webhook notifications.
//!
//! # Architecture
//!
//! - [`StreamClient`]: request orchestration against the `/stream` endpoints,
//!   generic over an HTTP [`Transport`](client::Transport)
//! - [`TokenSigner`]: RS256 tokens for signed playback URLs
//! - [`WebhookVerifier`]: HMAC-SHA256 check of the `Webhook-Signature` header
//! - [`VideoQueryParams`]: structured filters for listing videos
//! - [`error::catalog`]: descriptions of provider error codes
//!
//! # Examples
//!
//! ```rust
//! use cloudflare_stream::{Settings, StreamClient, WebhookVerifier};
//!
//! # fn example() -> cloudflare_stream::Result<()> {
//! let mut settings = Settings::default();
//! settings.credentials.account_id = "023e105f4ecef8ad9ca31a8372d0c353".to_string();
//! let _client = StreamClient::new(settings)?;
//!
//! let verifier = WebhookVerifier::new("webhook-secret");
//! let header = format!("time=1230811200,sig1={}", verifier.sign("1230811200", b"{}"));
//! assert!(verifier.verify(&header, b"{}"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod types;
pub mod utils;

pub use client::StreamClient;
pub use config::Settings;
pub use error::{Error, ProviderErrorCode, Result};
pub use signing::{TokenSigner, WebhookVerifier};
pub use types::{AccessAction, AccessRule, ListQuery, Params, SignedUrls, VideoQueryParams};
