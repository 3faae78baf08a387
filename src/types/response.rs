//! Response type definitions
//!
//! Most API responses are returned as raw JSON; only locally built values get a
//! dedicated type.

use serde::{Deserialize, Serialize};

/// Signed playback URLs for a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrls {
    /// HLS manifest URL
    pub hls: String,
    /// DASH manifest URL
    pub dash: String,
}

impl SignedUrls {
    /// Build manifest URLs for `token` under the delivery base URL
    pub fn new(delivery_base_url: &str, token: &str) -> Self {
        let base = delivery_base_url.trim_end_matches('/');
        Self {
            hls: format!("{base}/{token}/manifest/video.m3u8"),
            dash: format!("{base}/{token}/manifest/video.mpd"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_urls_format() {
        let urls = SignedUrls::new("https://customer-abc.cloudflarestream.com", "a.b.c");
        assert_eq!(
            urls.hls,
            "https://customer-abc.cloudflarestream.com/a.b.c/manifest/video.m3u8"
        );
        assert_eq!(
            urls.dash,
            "https://customer-abc.cloudflarestream.com/a.b.c/manifest/video.mpd"
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let urls = SignedUrls::new("https://cdn.example.com/", "tok");
        assert_eq!(urls.hls, "https://cdn.example.com/tok/manifest/video.m3u8");
    }

    #[test]
    fn test_signed_urls_serialization() {
        let urls = SignedUrls::new("https://cdn.example.com", "tok");
        let json = serde_json::to_value(&urls).unwrap();
        assert_eq!(json["dash"], "https://cdn.example.com/tok/manifest/video.mpd");
    }
}
