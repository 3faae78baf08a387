//! Error handling for the Stream client
//!
//! This module defines the crate error type and the catalog of error codes the
//! provider reports for failed video processing.

pub mod catalog;
pub mod types;

pub use catalog::{ProviderErrorCode, describe};
pub use types::{Error, Result};
