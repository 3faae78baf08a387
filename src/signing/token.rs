//! Signed playback tokens
//!
//! Tokens are a compact `header.payload.signature` triple. Header and payload
//! are JSON, every segment is base64url without padding, and the signature is
//! RS256 over `encodedHeader + "." + encodedPayload`.

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

const ALGORITHM_TAG: &str = "RS256";

#[derive(Serialize)]
struct TokenHeader<'a> {
    alg: &'static str,
    kid: &'a str,
}

#[derive(Serialize)]
struct TokenClaims<'a> {
    sub: &'a str,
    kid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Issues signed tokens for restricted playback
#[derive(Clone)]
pub struct TokenSigner {
    key_id: String,
    key: EncodingKey,
}

impl TokenSigner {
    /// Build a signer from a PEM-encoded RSA private key (`BEGIN RSA PRIVATE KEY`)
    pub fn from_pem(key_id: impl Into<String>, pem: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| Error::signing(format!("invalid RSA private key: {}", e)))?;

        Ok(Self {
            key_id: key_id.into(),
            key,
        })
    }

    /// Build a signer from the base64-wrapped PEM stored in configuration.
    /// Whitespace inside the base64 text is ignored.
    pub fn from_base64_pem(key_id: impl Into<String>, pem_b64: &str) -> Result<Self> {
        let compact: String = pem_b64.split_whitespace().collect();
        if compact.is_empty() {
            return Err(Error::signing("no private key configured"));
        }

        let pem = STANDARD
            .decode(compact)
            .map_err(|e| Error::signing(format!("private key is not valid base64: {}", e)))?;

        Self::from_pem(key_id, &pem)
    }

    /// Sign a token for `subject`, expiring `expires_in` seconds from now.
    /// With no expiry the payload carries no `exp` claim.
    pub fn sign(&self, subject: &str, expires_in: Option<u64>) -> Result<String> {
        self.sign_at(subject, expires_in, Utc::now().timestamp())
    }

    /// Same as [`sign`](Self::sign) with an explicit current time (UNIX seconds)
    pub fn sign_at(&self, subject: &str, expires_in: Option<u64>, now: i64) -> Result<String> {
        let header = TokenHeader {
            alg: ALGORITHM_TAG,
            kid: &self.key_id,
        };
        let claims = TokenClaims {
            sub: subject,
            kid: &self.key_id,
            exp: expires_in.map(|secs| now.saturating_add_unsigned(secs)),
        };

        let encoded_header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let encoded_claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let message = format!("{encoded_header}.{encoded_claims}");

        // Already base64url without padding
        let signature = jsonwebtoken::crypto::sign(message.as_bytes(), &self.key, Algorithm::RS256)
            .map_err(|e| Error::signing(format!("RS256 signing failed: {}", e)))?;

        tracing::debug!(subject, key_id = %self.key_id, "Signed playback token");

        Ok(format!("{message}.{signature}"))
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
