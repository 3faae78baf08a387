//! Request type definitions
//!
//! Request bodies sent to the Stream API and the rules used to clean and merge
//! caller-supplied fields with account-wide defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object of loosely-typed request fields (meta, upload options, ...)
pub type Params = Map<String, Value>;

/// Remove empty values from a set of request fields.
///
/// A field is dropped when it is `null`, an empty string, an empty array or an
/// empty object. Numbers are always kept, including `0`, and so are booleans,
/// including `false`: a `false` flag is an explicit choice, not a missing value.
pub fn prepare_data(data: &Params) -> Params {
    data.iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Merge caller options over the configured defaults.
///
/// Both sides go through [`prepare_data`] first. On a key collision the caller's
/// value wins; every default the caller did not override is present in the result.
pub fn merge_with_defaults(options: &Params, defaults: &Params) -> Params {
    let mut merged = prepare_data(defaults);
    merged.extend(prepare_data(options));
    merged
}

/// Action taken when an access rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Allow,
    Block,
}

/// Constraint attached to a provider-issued signed token.
///
/// Rules are forwarded as-is; the provider evaluates them in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccessRule {
    /// Matches every request
    #[serde(rename = "any")]
    Any { action: AccessAction },
    /// Matches source IPs in the given ranges, e.g. `93.184.216.0/24`
    #[serde(rename = "ip.src")]
    IpSource { ip: Vec<String>, action: AccessAction },
    /// Matches requests geolocated to the given ISO country codes
    #[serde(rename = "ip.geoip.country")]
    Country {
        country: Vec<String>,
        action: AccessAction,
    },
}

impl AccessRule {
    pub fn any(action: AccessAction) -> Self {
        Self::Any { action }
    }

    pub fn ip_source<I, S>(ranges: I, action: AccessAction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IpSource {
            ip: ranges.into_iter().map(Into::into).collect(),
            action,
        }
    }

    pub fn country<I, S>(codes: I, action: AccessAction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Country {
            country: codes.into_iter().map(Into::into).collect(),
            action,
        }
    }
}

/// Body of a provider-issued signed token request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamTokenRequest {
    /// Absolute expiry, UNIX seconds
    pub exp: i64,
    /// Whether the token also permits downloads
    pub downloadable: bool,
    /// Access rules evaluated by the provider
    pub access_rules: Vec<AccessRule>,
}

impl StreamTokenRequest {
    /// Build a request expiring `expires_in` seconds after `now`
    pub fn new(now: i64, expires_in: u64, downloadable: bool, access_rules: Vec<AccessRule>) -> Self {
        Self {
            exp: now.saturating_add_unsigned(expires_in),
            downloadable,
            access_rules,
        }
    }
}

/// Body of a webhook subscription request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub notification_url: String,
}
