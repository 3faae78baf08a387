//! Configuration management for the Stream client
//!
//! This module handles loading credentials, upload defaults and transport
//! settings from TOML files and environment variables.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{Credentials, HttpSettings, LoggingSettings, Settings, WebhookSettings};
