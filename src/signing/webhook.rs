//! Webhook authenticity checks
//!
//! Stream signs every notification with a `Webhook-Signature` header of the
//! form `time=<unix-ts>,sig1=<hex>` (`t=`/`v1=` are read the same way). The
//! first pair carries the timestamp, the second the HMAC-SHA256 of
//! `timestamp + "." + rawBody` under the shared secret. The body must be the
//! exact bytes received; re-serialized JSON will not verify.
//!
//! The received signature is hex-decoded and compared as bytes in constant
//! time, so upper- and lower-case hex digits are both accepted.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::{fmt, time::Duration};

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the signature
pub const SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Parsed signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp exactly as sent, used verbatim in the signed message
    pub timestamp: String,
    /// Decoded signature bytes
    pub signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parse a header value. Returns `None` for anything malformed: fewer than
    /// two pairs, a pair without `=`, a non-numeric timestamp or non-hex signature.
    /// Pairs after the second are ignored.
    pub fn parse(header: &str) -> Option<Self> {
        let mut pairs = header.split(',').map(|pair| pair.trim().split_once('='));

        let (_, timestamp) = pairs.next()??;
        let (_, signature) = pairs.next()??;

        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            timestamp: timestamp.to_string(),
            signature: hex::decode(signature).ok()?,
        })
    }

    /// Timestamp as UNIX seconds
    pub fn unix_time(&self) -> Option<i64> {
        self.timestamp.parse().ok()
    }
}

/// Verifies inbound webhook notifications
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: Option<Duration>,
}

impl WebhookVerifier {
    /// Verifier for the given shared secret, without a freshness check
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: None,
        }
    }

    /// Also reject signatures whose timestamp is further than `tolerance` from now
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Verifier for the configured webhook secret and tolerance
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let verifier = Self::new(settings.credentials.webhook_secret.clone());
        match settings.webhook.tolerance() {
            Some(tolerance) => verifier.with_tolerance(tolerance),
            None => verifier,
        }
    }

    pub fn tolerance(&self) -> Option<Duration> {
        self.tolerance
    }

    /// Hex HMAC-SHA256 of `timestamp.body`
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        hex::encode(self.mac(timestamp, body).finalize().into_bytes())
    }

    /// Check `header` against the raw request body
    pub fn verify(&self, header: &str, body: &[u8]) -> bool {
        self.verify_at(header, body, Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit current time (UNIX seconds)
    pub fn verify_at(&self, header: &str, body: &[u8], now: i64) -> bool {
        let Some(parsed) = SignatureHeader::parse(header) else {
            tracing::warn!("Rejected webhook: malformed signature header");
            return false;
        };

        if let Some(tolerance) = self.tolerance {
            let Some(sent_at) = parsed.unix_time() else {
                tracing::warn!("Rejected webhook: timestamp out of range");
                return false;
            };
            let skew = now.abs_diff(sent_at);
            if skew > tolerance.as_secs() {
                tracing::warn!(skew, "Rejected webhook: stale or future timestamp");
                return false;
            }
        }

        // verify_slice compares in constant time
        let valid = self
            .mac(&parsed.timestamp, body)
            .verify_slice(&parsed.signature)
            .is_ok();
        if !valid {
            tracing::warn!("Rejected webhook: signature mismatch");
        }
        valid
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC key can be of any size, as per crate documentation"),
        };
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &str = "webhook-secret";
    const BODY: &[u8] = br#"{"uid":"dd5d531a12de0c724bd1275a3b2bc9c6","readyToStream":true}"#;
    const TS: &str = "1230811200";

    fn header_for(verifier: &WebhookVerifier, ts: &str, body: &[u8]) -> String {
        format!("time={},sig1={}", ts, verifier.sign(ts, body))
    }

    #[test]
    fn test_valid_signature() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = header_for(&verifier, TS, BODY);
        assert!(verifier.verify(&header, BODY));
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA256("key", "1.body")
        let verifier = WebhookVerifier::new("key");
        let expected = {
            let mut mac = HmacSha256::new_from_slice(b"key").unwrap();
            mac.update(b"1.body");
            hex::encode(mac.finalize().into_bytes())
        };
        assert_eq!(verifier.sign("1", b"body"), expected);
        assert!(verifier.verify(&format!("t=1,v1={expected}"), b"body"));
    }

    #[test]
    fn test_tampered_body_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = header_for(&verifier, TS, BODY);

        let mut tampered = BODY.to_vec();
        tampered[10] ^= 0x01;
        assert!(!verifier.verify(&header, &tampered));
    }

    #[test]
    fn test_tampered_timestamp_fails() {
        let verifier = WebhookVerifier::new(SECRET);
        let signature = verifier.sign(TS, BODY);
        let header = format!("time=1230811201,sig1={signature}");
        assert!(!verifier.verify(&header, BODY));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signer = WebhookVerifier::new(SECRET);
        let header = header_for(&signer, TS, BODY);

        let verifier = WebhookVerifier::new("webhook-secreT");
        assert!(!verifier.verify(&header, BODY));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = format!("time={},sig1={}", TS, verifier.sign(TS, BODY).to_uppercase());
        assert!(verifier.verify(&header, BODY));
    }

    #[test]
    fn test_extra_pairs_ignored() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = format!("{},v2=deadbeef", header_for(&verifier, TS, BODY));
        assert!(verifier.verify(&header, BODY));
    }

    #[rstest]
    #[case("")]
    #[case("time=1230811200")]
    #[case("time=1230811200;sig1=abcd")]
    #[case("time,sig1=abcd")]
    #[case("time=abc,sig1=abcd")]
    #[case("time=,sig1=abcd")]
    #[case("time=-5,sig1=abcd")]
    #[case("time=1230811200,sig1=not-hex")]
    #[case("time=1230811200,sig1")]
    fn test_malformed_headers_fail_closed(#[case] header: &str) {
        let verifier = WebhookVerifier::new(SECRET);
        assert!(!verifier.verify(header, BODY));
    }

    #[test]
    fn test_no_tolerance_accepts_old_timestamp() {
        let verifier = WebhookVerifier::new(SECRET);
        let header = header_for(&verifier, TS, BODY);
        assert!(verifier.verify_at(&header, BODY, 1_900_000_000));
    }

    #[test]
    fn test_tolerance_window() {
        let verifier = WebhookVerifier::new(SECRET).with_tolerance(Duration::from_secs(300));
        let header = header_for(&verifier, TS, BODY);
        let sent_at: i64 = TS.parse().unwrap();

        assert!(verifier.verify_at(&header, BODY, sent_at + 300));
        assert!(verifier.verify_at(&header, BODY, sent_at - 300));
        assert!(!verifier.verify_at(&header, BODY, sent_at + 301));
        assert!(!verifier.verify_at(&header, BODY, sent_at - 301));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = crate::Settings::default();
        settings.credentials.webhook_secret = SECRET.to_string();
        settings.webhook.tolerance_secs = Some(60);

        let verifier = WebhookVerifier::from_settings(&settings);
        assert_eq!(verifier.tolerance(), Some(Duration::from_secs(60)));
        let header = header_for(&verifier, TS, BODY);
        assert!(verifier.verify_at(&header, BODY, 1230811230));
    }

    #[test]
    fn test_parse_header() {
        let parsed = SignatureHeader::parse("time=42, sig1=0aff").unwrap();
        assert_eq!(parsed.timestamp, "42");
        assert_eq!(parsed.signature, vec![0x0a, 0xff]);
        assert_eq!(parsed.unix_time(), Some(42));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", WebhookVerifier::new(SECRET));
        assert!(!debug.contains(SECRET));
    }
}
