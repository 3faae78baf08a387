//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::STANDARD};
use cloudflare_stream::{Settings, StreamClient};

pub const ACCOUNT_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
pub const API_TOKEN: &str = "test-api-token";
pub const KEY_ID: &str = "8f926b2b01f383510025a78a4dcbf6a";
pub const DELIVERY_BASE_URL: &str = "https://customer-test.cloudflarestream.com";
pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/signing_key.pub.pem");

/// Base64-wrapped private key, as stored in configuration
pub fn private_key_b64() -> String {
    STANDARD.encode(PRIVATE_KEY_PEM)
}

/// Settings pointing at a mock API server
pub fn create_test_settings(api_base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.credentials.api_token = API_TOKEN.to_string();
    settings.credentials.account_id = ACCOUNT_ID.to_string();
    settings.credentials.api_base_url = api_base_url.to_string();
    settings.credentials.delivery_base_url = DELIVERY_BASE_URL.to_string();
    settings.credentials.key_id = KEY_ID.to_string();
    settings.credentials.pem = private_key_b64();
    settings.credentials.webhook_secret = "test-webhook-secret".to_string();
    settings
}

/// Client using the reqwest transport against a mock API server
pub fn create_test_client(api_base_url: &str) -> StreamClient {
    StreamClient::new(create_test_settings(api_base_url)).expect("client should build")
}
