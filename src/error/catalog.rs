//! Provider error codes
//!
//! Human-readable descriptions for the `errorReasonCode` values Stream reports
//! on a video's status object. Nothing in the client consults this table; it is
//! a convenience for callers inspecting responses.

use serde_json::Value;
use std::{fmt, str::FromStr};

/// Error codes reported by Stream when processing a video fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    NonVideo,
    DurationExceedConstraint,
    FetchOriginError,
    MalformedVideo,
    DurationTooShort,
    Unknown,
}

impl ProviderErrorCode {
    /// Every known code, in catalog order
    pub const ALL: [ProviderErrorCode; 6] = [
        Self::NonVideo,
        Self::DurationExceedConstraint,
        Self::FetchOriginError,
        Self::MalformedVideo,
        Self::DurationTooShort,
        Self::Unknown,
    ];

    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonVideo => "ERR_NON_VIDEO",
            Self::DurationExceedConstraint => "ERR_DURATION_EXCEED_CONSTRAINT",
            Self::FetchOriginError => "ERR_FETCH_ORIGIN_ERROR",
            Self::MalformedVideo => "ERR_MALFORMED_VIDEO",
            Self::DurationTooShort => "ERR_DURATION_TOO_SHORT",
            Self::Unknown => "ERR_UNKNOWN",
        }
    }

    /// Human-readable description of the code
    pub fn description(&self) -> &'static str {
        match self {
            Self::NonVideo => "The upload is not a video",
            Self::DurationExceedConstraint => {
                "The video duration exceeds the constraints defined in the direct creator upload."
            }
            Self::FetchOriginError => "The video failed to download from the URL",
            Self::MalformedVideo => {
                "The video is a valid file but contains corrupt data that cannot be recovered."
            }
            Self::DurationTooShort => "The video's duration is shorter than 0.1 seconds.",
            Self::Unknown => "Stream cannot determine the error",
        }
    }

    /// Read `status.errorReasonCode` from a video resource.
    ///
    /// Returns `None` when the field is missing or empty. Unrecognised codes map
    /// to [`ProviderErrorCode::Unknown`].
    pub fn from_video(video: &Value) -> Option<Self> {
        let code = video
            .pointer("/status/errorReasonCode")
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())?;

        Some(code.parse().unwrap_or(Self::Unknown))
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderErrorCode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| crate::Error::internal(format!("unknown provider error code: {s}")))
    }
}

/// Look up the description for a raw error code string
pub fn describe(code: &str) -> Option<&'static str> {
    code.parse::<ProviderErrorCode>()
        .ok()
        .map(|code| code.description())
}
