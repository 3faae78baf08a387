//! Type definitions for the Stream client
//!
//! This module contains request bodies, list queries and locally built responses.

pub mod query;
pub mod request;
pub mod response;

pub use query::{ListQuery, QueryParams, VideoQueryParams, to_snake_case};
pub use request::{
    AccessAction, AccessRule, Params, StreamTokenRequest, WebhookSubscription,
    merge_with_defaults, prepare_data,
};
pub use response::SignedUrls;
