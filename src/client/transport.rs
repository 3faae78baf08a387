//! HTTP transport
//!
//! The client hands fully built requests to a [`Transport`]; the default
//! implementation is backed by `reqwest`. Provider error payloads are returned
//! as parsed JSON like any other response, only network failures are errors.

use async_trait::async_trait;
use reqwest::{
    Client, Method,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;
use url::Url;

use crate::{Error, Result, config::HttpSettings};

/// A single outbound API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    pub fn post(url: Url, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            url,
            body,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::DELETE,
            url,
            body: None,
        }
    }
}

/// Issues API requests and returns the parsed response body.
///
/// `Ok(None)` means the response had no body or a JSON `null` body.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>>;
}

/// `reqwest`-backed transport authenticating with a bearer token
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport sending `Authorization: Bearer {api_token}` on every request
    pub fn new(api_token: &str, http: &HttpSettings) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_token))
            .map_err(|_| Error::config("API token contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(http.user_agent.clone())
            .timeout(http.timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>> {
        let ApiRequest { method, url, body } = request;

        let mut builder = self.client.request(method, url);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Stream API returned a non-success status");
        }

        let text = response.text().await?;
        parse_body(&text)
    }
}

/// Parse a response body, treating an empty body as `None`
pub(crate) fn parse_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(text)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_body("").unwrap(), None);
        assert_eq!(parse_body("  \n").unwrap(), None);
        assert_eq!(parse_body("null").unwrap(), None);
    }

    #[test]
    fn test_parse_json_body() {
        let value = parse_body(r#"{"success":true}"#).unwrap();
        assert_eq!(value, Some(json!({ "success": true })));
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(parse_body("<html>"), Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = ReqwestTransport::new("bad\ntoken", &HttpSettings::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_request_constructors() {
        let url = Url::parse("https://api.example.com/acc/stream").unwrap();
        assert_eq!(ApiRequest::get(url.clone()).method, Method::GET);
        assert_eq!(ApiRequest::delete(url.clone()).method, Method::DELETE);

        let post = ApiRequest::post(url, Some(json!({ "a": 1 })));
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.body, Some(json!({ "a": 1 })));
    }
}
