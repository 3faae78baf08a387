//! Query parameters for listing videos
//!
//! Structured query objects are serialized with camelCase field names, stripped
//! of unset fields and rewritten to the snake_case keys the list endpoint expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Shared behaviour of structured query-parameter objects.
///
/// Implementors only need to be [`Serialize`]; the default [`to_query`]
/// drops `null` fields and converts keys to snake_case.
///
/// [`to_query`]: QueryParams::to_query
pub trait QueryParams: Serialize {
    /// Convert into a canonical key-value mapping
    fn to_query(&self) -> crate::Result<BTreeMap<String, String>> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(crate::Error::internal(
                "query parameters must serialize to an object",
            ));
        };

        Ok(fields
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::Null => return None,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((to_snake_case(&key), value))
            })
            .collect())
    }
}

/// Rewrite a camelCase key as snake_case.
///
/// An underscore is inserted between a lowercase ASCII letter and a following
/// uppercase ASCII letter, then the whole key is lowercased.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;

    for ch in key.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.extend(ch.to_lowercase());
    }

    out
}

/// Filters accepted by the video listing endpoint. Unset fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQueryParams {
    /// List videos in ascending order of creation (`"true"` / `"false"`)
    pub asc: Option<String>,
    /// User defined identifier for the media creator
    pub creator: Option<String>,
    /// List videos created before this date, e.g. `2014-01-02T02:20:00Z`
    pub end: Option<String>,
    /// Search over the `name` key in the meta field
    pub search: Option<String>,
    /// List videos created after this date
    pub start: Option<String>,
    /// Include total counts in the response
    pub include_counts: Option<String>,
    /// Processing state: pendingupload, downloading, queued, inprogress, ready, error
    pub status: Option<String>,
    /// `vod` or `live`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl QueryParams for VideoQueryParams {}

impl VideoQueryParams {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asc(mut self, asc: bool) -> Self {
        self.asc = Some(asc.to_string());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_include_counts(mut self, include_counts: bool) -> Self {
        self.include_counts = Some(include_counts.to_string());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Query for the listing endpoint: empty, a plain snake_case mapping, or built
/// from a structured [`QueryParams`] object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pairs: BTreeMap<String, String>,
}

impl ListQuery {
    /// Empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a structured query object
    pub fn from_params<P: QueryParams>(params: &P) -> crate::Result<Self> {
        Ok(Self {
            pairs: params.to_query()?,
        })
    }

    /// Add a single key-value pair
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in key order
    pub fn pairs(&self) -> &BTreeMap<String, String> {
        &self.pairs
    }
}

impl From<VideoQueryParams> for ListQuery {
    fn from(params: VideoQueryParams) -> Self {
        // Every field is an Option<String>, serialization cannot fail
        Self::from_params(&params).unwrap_or_default()
    }
}

impl From<BTreeMap<String, String>> for ListQuery {
    fn from(pairs: BTreeMap<String, String>) -> Self {
        Self { pairs }
    }
}

impl From<HashMap<String, String>> for ListQuery {
    fn from(pairs: HashMap<String, String>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for ListQuery {
    fn from(pairs: [(K, V); N]) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
