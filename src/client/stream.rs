//! # Stream API client
//!
//! [`StreamClient`] turns high-level video operations into calls against the
//! account's `/stream` REST endpoints. It is built from an explicit
//! [`Settings`] value and never reads configuration on its own.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use cloudflare_stream::{Settings, StreamClient, VideoQueryParams};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::from_env()?;
//! let client = StreamClient::new(settings)?;
//!
//! let videos = client
//!     .list_videos(VideoQueryParams::new().with_status("ready"))
//!     .await?;
//! println!("{}", videos["result"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! ## Responses
//!
//! Every call returns the provider's JSON envelope untouched, including
//! `success: false` payloads. Only transport failures become errors.

use chrono::Utc;
use serde_json::Value;
use url::Url;

use super::transport::{ApiRequest, ReqwestTransport, Transport};
use crate::{
    Error, Result,
    config::{Credentials, Settings},
    signing::TokenSigner,
    types::{
        AccessRule, ListQuery, Params, SignedUrls, StreamTokenRequest, WebhookSubscription,
        merge_with_defaults, prepare_data,
    },
};

/// Default lifetime of signed tokens and URLs, in seconds
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Client for the Stream video API
#[derive(Debug)]
pub struct StreamClient<T: Transport = ReqwestTransport> {
    /// Account credentials
    credentials: Credentials,
    /// Options merged into every upload
    default_options: Params,
    /// HTTP transport
    transport: T,
}

impl StreamClient<ReqwestTransport> {
    /// Create a client using the `reqwest` transport configured from `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(&settings.credentials.api_token, &settings.http)?;
        Ok(Self::with_transport(settings, transport))
    }
}

impl<T: Transport> StreamClient<T> {
    /// Create a client with a custom transport
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        Self {
            credentials: settings.credentials,
            default_options: settings.default_options,
            transport,
        }
    }

    /// URL of `{api_base_url}/{account_id}/stream[/segments...]`
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if self.credentials.account_id.is_empty() {
            return Err(Error::config("account id is not configured"));
        }

        let mut url = Url::parse(&self.credentials.api_base_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .push(&self.credentials.account_id)
            .push("stream")
            .extend(segments);
        Ok(url)
    }

    /// URL requested by [`list_videos`](Self::list_videos). No query string
    /// is added when the query is empty.
    pub fn list_videos_url(&self, query: &ListQuery) -> Result<Url> {
        let mut url = self.endpoint(&[])?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    /// List videos matching `query`
    ///
    /// Accepts a [`ListQuery`], a structured
    /// [`VideoQueryParams`](crate::types::VideoQueryParams) or a plain
    /// snake_case mapping.
    pub async fn list_videos(&self, query: impl Into<ListQuery>) -> Result<Value> {
        let url = self.list_videos_url(&query.into())?;
        self.send(ApiRequest::get(url)).await
    }

    /// Build the body of an upload-via-link request.
    ///
    /// `meta` is attached only if something survives [`prepare_data`]. Caller
    /// `options` are merged over the configured defaults (caller wins) and the
    /// result is placed at the top level; `url` and `meta` always come from the
    /// explicit arguments.
    pub fn upload_payload(&self, source_url: &str, meta: &Params, options: &Params) -> Params {
        let mut payload = Params::new();
        payload.insert("url".to_string(), Value::String(source_url.to_string()));

        let meta = prepare_data(meta);
        if !meta.is_empty() {
            payload.insert("meta".to_string(), Value::Object(meta));
        }

        for (key, value) in merge_with_defaults(options, &self.default_options) {
            if key != "url" && key != "meta" {
                payload.insert(key, value);
            }
        }

        payload
    }

    /// Ask Stream to fetch and ingest the video at `source_url`
    pub async fn upload_via_link(
        &self,
        source_url: &str,
        meta: &Params,
        options: &Params,
    ) -> Result<Value> {
        let payload = self.upload_payload(source_url, meta, options);
        let url = self.endpoint(&["copy"])?;

        let response = self
            .send(ApiRequest::post(url, Some(Value::Object(payload))))
            .await?;
        tracing::info!(source_url, "Submitted upload via link");
        Ok(response)
    }

    /// Update access-control fields of a video (`requireSignedURLs`,
    /// `allowedOrigins`, ...). The video id is injected as `uid`.
    pub async fn secure_video(&self, id: &str, mut payload: Params) -> Result<Value> {
        payload.insert("uid".to_string(), Value::String(id.to_string()));
        let url = self.endpoint(&[id])?;
        self.send(ApiRequest::post(url, Some(Value::Object(payload))))
            .await
    }

    /// Register the account's webhook endpoint. Stream keeps a single
    /// subscription per account, so this replaces any previous one.
    pub async fn subscribe_to_webhook_notifications(&self, notification_url: &str) -> Result<Value> {
        let body = WebhookSubscription {
            notification_url: notification_url.to_string(),
        };
        let url = self.endpoint(&["webhook"])?;
        self.send(ApiRequest::post(url, Some(serde_json::to_value(body)?)))
            .await
    }

    /// Fetch a single video
    pub async fn fetch_video(&self, id: &str) -> Result<Value> {
        let url = self.endpoint(&[id])?;
        self.send(ApiRequest::get(url)).await
    }

    /// Delete a video. Returns `true` when Stream answers with an empty body,
    /// `false` when it returns anything else (typically an error envelope).
    pub async fn delete_video(&self, id: &str) -> Result<bool> {
        let url = self.endpoint(&[id])?;
        let deleted = self.transport.send(ApiRequest::delete(url)).await?.is_none();
        if deleted {
            tracing::info!(video_id = id, "Deleted video");
        } else {
            tracing::warn!(video_id = id, "Delete returned a response body");
        }
        Ok(deleted)
    }

    /// Request a provider-issued signed token for a video
    pub async fn get_stream_signed_token(
        &self,
        id: &str,
        expires_in: u64,
        downloadable: bool,
        access_rules: Vec<AccessRule>,
    ) -> Result<Value> {
        let body = StreamTokenRequest::new(
            Utc::now().timestamp(),
            expires_in,
            downloadable,
            access_rules,
        );
        let url = self.endpoint(&[id, "token"])?;
        self.send(ApiRequest::post(url, Some(serde_json::to_value(body)?)))
            .await
    }

    /// Create a signing key pair on the provider side. The response holds the
    /// key id, PEM and JWK; store them rather than calling this repeatedly.
    pub async fn get_verification_keys(&self) -> Result<Value> {
        let url = self.endpoint(&["keys"])?;
        self.send(ApiRequest::post(url, None)).await
    }

    /// Signed HLS and DASH playback URLs built from a locally signed token.
    ///
    /// `expires_in` is the token lifetime in seconds; pass
    /// `Some(DEFAULT_EXPIRES_IN_SECS)` for the usual one hour. `None` issues a
    /// token without an `exp` claim. Fails with [`Error::Config`] when no
    /// delivery base URL is configured.
    pub fn get_signed_url(&self, id: &str, expires_in: Option<u64>) -> Result<SignedUrls> {
        if self.credentials.delivery_base_url.trim().is_empty() {
            return Err(Error::config(
                "delivery base URL is not configured (CLOUDFLARE_CUSTOMER_DOMAIN)",
            ));
        }

        let signer = TokenSigner::from_base64_pem(&self.credentials.key_id, &self.credentials.pem)?;
        let token = signer.sign(id, expires_in)?;
        Ok(SignedUrls::new(&self.credentials.delivery_base_url, &token))
    }

    async fn send(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, path = request.url.path(), "Stream API request");
        Ok(self.transport.send(request).await?.unwrap_or(Value::Null))
    }
}
