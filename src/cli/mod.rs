//! Command-line front end
//!
//! Subcommands of the `cfstream` binary. Each command runs against a
//! [`StreamClient`] built from the loaded settings and produces a JSON value
//! for stdout.

use clap::{Args, Subcommand};
use serde_json::{Value, json};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::{
    AccessRule, Params, Settings, StreamClient, VideoQueryParams, WebhookVerifier,
    client::{DEFAULT_EXPIRES_IN_SECS, Transport},
    error::ProviderErrorCode,
};

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List videos
    List(ListArgs),
    /// Show a single video
    Fetch {
        /// Video identifier
        id: String,
    },
    /// Delete a video
    Delete {
        /// Video identifier
        id: String,
    },
    /// Upload a video by letting Stream fetch it from a URL
    Upload(UploadArgs),
    /// Update access control of a video
    Secure(SecureArgs),
    /// Register the account's webhook endpoint (replaces any existing one)
    Subscribe {
        /// URL that receives notifications
        notification_url: String,
    },
    /// Request a provider-issued signed token
    Token(TokenArgs),
    /// Create a signing key pair on the provider side
    Keys,
    /// Build signed HLS/DASH URLs locally
    SignedUrl(SignedUrlArgs),
    /// Check a webhook signature against a request body
    VerifyWebhook(VerifyWebhookArgs),
    /// Print the provider error code catalog
    Errors,
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Search the `name` meta field
    #[arg(long)]
    pub search: Option<String>,
    /// Processing state (pendingupload, downloading, queued, inprogress, ready, error)
    #[arg(long)]
    pub status: Option<String>,
    /// Creator identifier
    #[arg(long)]
    pub creator: Option<String>,
    /// Only videos created after this date
    #[arg(long)]
    pub start: Option<String>,
    /// Only videos created before this date
    #[arg(long)]
    pub end: Option<String>,
    /// Oldest first
    #[arg(long)]
    pub asc: bool,
    /// Include total counts
    #[arg(long)]
    pub include_counts: bool,
    /// `vod` or `live`
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Source URL of the video
    pub url: String,
    /// Video name stored in meta
    #[arg(long)]
    pub name: Option<String>,
    /// Extra meta field (KEY=VALUE, repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub meta: Vec<(String, Value)>,
    /// Upload option (KEY=VALUE, value parsed as JSON when possible, repeatable)
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, Value)>,
}

#[derive(Debug, Args)]
pub struct SecureArgs {
    /// Video identifier
    pub id: String,
    /// Require signed URLs for playback
    #[arg(long)]
    pub require_signed_urls: Option<bool>,
    /// Allowed embedding origin (repeatable)
    #[arg(long = "allowed-origin", value_name = "ORIGIN")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Video identifier
    pub id: String,
    /// Token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_EXPIRES_IN_SECS)]
    pub expires_in: u64,
    /// Allow downloads with this token
    #[arg(long)]
    pub downloadable: bool,
    /// Access rule as JSON, e.g. '{"type":"any","action":"block"}' (repeatable)
    #[arg(long = "rule", value_name = "JSON", value_parser = parse_access_rule)]
    pub rules: Vec<AccessRule>,
}

#[derive(Debug, Args)]
pub struct SignedUrlArgs {
    /// Video identifier
    pub id: String,
    /// Token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_EXPIRES_IN_SECS, conflicts_with = "no_expiry")]
    pub expires_in: u64,
    /// Issue a token without an expiry claim
    #[arg(long)]
    pub no_expiry: bool,
}

#[derive(Debug, Args)]
pub struct VerifyWebhookArgs {
    /// Value of the Webhook-Signature header
    #[arg(long)]
    pub signature: String,
    /// File holding the raw request body (stdin when omitted)
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,
}

/// Result of a command: JSON for stdout and whether the process should succeed
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub value: Value,
    pub success: bool,
}

impl CommandOutput {
    fn ok(value: Value) -> Self {
        Self {
            value,
            success: true,
        }
    }
}

/// Run a command that does not need the API or signing key
pub async fn run_offline(command: &Command, settings: &Settings) -> anyhow::Result<Option<CommandOutput>> {
    let output = match command {
        Command::Errors => CommandOutput::ok(error_catalog()),
        Command::VerifyWebhook(args) => verify_webhook(args, settings).await?,
        _ => return Ok(None),
    };
    Ok(Some(output))
}

/// Run a command against the Stream API
pub async fn run<T: Transport>(command: Command, client: &StreamClient<T>) -> anyhow::Result<CommandOutput> {
    let value = match command {
        Command::List(args) => client.list_videos(list_query(args)).await?,
        Command::Fetch { id } => client.fetch_video(&id).await?,
        Command::Delete { id } => {
            let deleted = client.delete_video(&id).await?;
            return Ok(CommandOutput {
                value: json!({ "id": id, "deleted": deleted }),
                success: deleted,
            });
        }
        Command::Upload(args) => {
            let mut meta: Params = args.meta.into_iter().collect();
            if let Some(name) = args.name {
                meta.insert("name".to_string(), Value::String(name));
            }
            let options: Params = args.options.into_iter().collect();
            client.upload_via_link(&args.url, &meta, &options).await?
        }
        Command::Secure(args) => {
            let mut payload = Params::new();
            if let Some(require) = args.require_signed_urls {
                payload.insert("requireSignedURLs".to_string(), Value::Bool(require));
            }
            if !args.allowed_origins.is_empty() {
                payload.insert("allowedOrigins".to_string(), json!(args.allowed_origins));
            }
            client.secure_video(&args.id, payload).await?
        }
        Command::Subscribe { notification_url } => {
            client
                .subscribe_to_webhook_notifications(&notification_url)
                .await?
        }
        Command::Token(args) => {
            client
                .get_stream_signed_token(&args.id, args.expires_in, args.downloadable, args.rules)
                .await?
        }
        Command::Keys => client.get_verification_keys().await?,
        Command::SignedUrl(args) => {
            let expires_in = (!args.no_expiry).then_some(args.expires_in);
            serde_json::to_value(client.get_signed_url(&args.id, expires_in)?)?
        }
        Command::Errors | Command::VerifyWebhook(_) => {
            anyhow::bail!("command does not use the Stream API")
        }
    };

    Ok(CommandOutput::ok(value))
}

fn list_query(args: ListArgs) -> VideoQueryParams {
    VideoQueryParams {
        asc: args.asc.then(|| "true".to_string()),
        creator: args.creator,
        end: args.end,
        search: args.search,
        start: args.start,
        include_counts: args.include_counts.then(|| "true".to_string()),
        status: args.status,
        kind: args.kind,
    }
}

async fn verify_webhook(args: &VerifyWebhookArgs, settings: &Settings) -> anyhow::Result<CommandOutput> {
    if settings.credentials.webhook_secret.is_empty() {
        anyhow::bail!("webhook secret is not configured (CLOUDFLARE_WEBHOOK_SECRET)");
    }

    let body = match &args.body_file {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut body = Vec::new();
            tokio::io::stdin().read_to_end(&mut body).await?;
            body
        }
    };

    let valid = WebhookVerifier::from_settings(settings).verify(&args.signature, &body);
    Ok(CommandOutput {
        value: json!({ "valid": valid }),
        success: valid,
    })
}

fn error_catalog() -> Value {
    ProviderErrorCode::ALL
        .into_iter()
        .map(|code| (code.as_str().to_string(), Value::from(code.description())))
        .collect::<Params>()
        .into()
}

/// Parse `KEY=VALUE`; the value is JSON if it parses as JSON, a string otherwise
pub fn parse_key_value(input: &str) -> Result<(String, Value), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", input))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", input));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn parse_access_rule(input: &str) -> Result<AccessRule, String> {
    serde_json::from_str(input).map_err(|e| format!("invalid access rule: {}", e))
}
