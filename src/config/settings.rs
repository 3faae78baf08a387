//! Configuration settings structure
//!
//! Defines the settings a [`StreamClient`](crate::StreamClient) is built from and
//! the environment variables that can override them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::{fmt, path::Path, time::Duration};

/// Default Stream API base URL (the account id is appended per request)
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4/accounts";

/// Main configuration settings for the Stream client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account credentials and endpoints
    pub credentials: Credentials,
    /// Options applied to every upload unless the caller overrides them
    pub default_options: Map<String, Value>,
    /// HTTP transport configuration
    pub http: HttpSettings,
    /// Webhook verification configuration
    pub webhook: WebhookSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Account credentials. Loaded once, never mutated by the client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Bearer token for the REST API
    pub api_token: String,
    /// Account identifier
    pub account_id: String,
    /// Shared secret for webhook signatures
    pub webhook_secret: String,
    /// Identifier of the signing key
    pub key_id: String,
    /// Base64-wrapped PEM private key
    pub pem: String,
    /// REST API base URL
    pub api_base_url: String,
    /// Playback delivery base URL, e.g. `https://customer-<code>.cloudflarestream.com`.
    /// Empty until configured; only signed URLs need it.
    pub delivery_base_url: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Webhook verification configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Maximum accepted distance between the signature timestamp and now.
    /// `None` disables the freshness check.
    pub tolerance_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            default_options: default_upload_options(),
            http: HttpSettings::default(),
            webhook: WebhookSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            account_id: String::new(),
            webhook_secret: String::new(),
            key_id: String::new(),
            pem: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            delivery_base_url: String::new(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("cfstream/{}", crate::utils::get_version()),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &redact(&self.api_token))
            .field("account_id", &self.account_id)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("key_id", &self.key_id)
            .field("pem", &redact(&self.pem))
            .field("api_base_url", &self.api_base_url)
            .field("delivery_base_url", &self.delivery_base_url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

fn default_upload_options() -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("requireSignedURLs".to_string(), json!(true));
    options
}

impl HttpSettings {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WebhookSettings {
    /// Freshness tolerance as a [`Duration`], if enabled
    pub fn tolerance(&self) -> Option<Duration> {
        self.tolerance_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of the defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let credentials = &mut self.credentials;
        let string_vars: [(&str, &mut String); 7] = [
            ("CLOUDFLARE_API_TOKEN", &mut credentials.api_token),
            ("CLOUDFLARE_ACCOUNT_ID", &mut credentials.account_id),
            ("CLOUDFLARE_WEBHOOK_SECRET", &mut credentials.webhook_secret),
            ("CLOUDFLARE_KEY_ID", &mut credentials.key_id),
            ("CLOUDFLARE_PEM", &mut credentials.pem),
            ("CLOUDFLARE_API_BASE_URL", &mut credentials.api_base_url),
            (
                "CLOUDFLARE_CUSTOMER_DOMAIN",
                &mut credentials.delivery_base_url,
            ),
        ];
        for (name, field) in string_vars {
            if let Ok(value) = std::env::var(name) {
                *field = value;
            }
        }

        if let Ok(timeout) = std::env::var("CLOUDFLARE_HTTP_TIMEOUT") {
            self.http.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid HTTP timeout: {}", e)))?;
        }

        if let Ok(tolerance) = std::env::var("CLOUDFLARE_WEBHOOK_TOLERANCE") {
            self.webhook.tolerance_secs = Some(tolerance.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid webhook tolerance: {}", e))
            })?);
        }

        Ok(self)
    }

    /// Validate the settings
    ///
    /// Credentials and the delivery URL may still be empty here; operations
    /// that need them fail when they are used.
    pub fn validate(&self) -> crate::Result<()> {
        let api_base_url = &self.credentials.api_base_url;
        if api_base_url.trim().is_empty() {
            return Err(crate::Error::config("api_base_url must not be empty"));
        }
        url::Url::parse(api_base_url)
            .map_err(|e| crate::Error::config(format!("Invalid api_base_url: {}", e)))?;

        let delivery_base_url = self.credentials.delivery_base_url.trim();
        if !delivery_base_url.is_empty() {
            url::Url::parse(delivery_base_url)
                .map_err(|e| crate::Error::config(format!("Invalid delivery_base_url: {}", e)))?;
        }

        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .map_err(|e| crate::Error::config(format!("Invalid log level: {}", e)))?;

        if self.http.timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.credentials.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.default_options.get("requireSignedURLs"), Some(&json!(true)));
        assert!(settings.webhook.tolerance_secs.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_creation() {
        let settings = Settings::new();
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_validate_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "cloudflare_stream=debug,reqwest=info".to_string();
        assert!(settings.validate().is_ok());

        settings.logging.level = "cloudflare_stream=loud".to_string();
        assert!(matches!(settings.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut settings = Settings::default();
        settings.credentials.api_token = "super-secret-token".to_string();
        settings.credentials.account_id = "acc-123".to_string();

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("acc-123"));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut settings = Settings::default();
        settings.credentials.api_base_url = "not a url".to_string();
        assert!(matches!(settings.validate(), Err(crate::Error::Config(_))));

        let mut settings = Settings::default();
        settings.credentials.api_base_url = " ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.credentials.delivery_base_url = "customer-x.example.com".to_string();
        assert!(matches!(settings.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_unset_delivery_url_is_valid() {
        let settings = Settings::default();
        assert!(settings.credentials.delivery_base_url.is_empty());
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.credentials.delivery_base_url = "https://customer-abc.cloudflarestream.com".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.http.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[credentials]
account_id = "acc"

[default_options]
requireSignedURLs = false
thumbnailTimestampPct = 0.5
"#,
        )
        .unwrap();

        assert_eq!(settings.credentials.account_id, "acc");
        assert_eq!(settings.credentials.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.default_options["requireSignedURLs"], json!(false));
        assert_eq!(settings.default_options["thumbnailTimestampPct"], json!(0.5));
        assert_eq!(settings.http.timeout_secs, 30);
    }
}
