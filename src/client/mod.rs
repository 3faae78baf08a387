//! Stream API client
//!
//! Request orchestration on top of a pluggable HTTP transport.

pub mod stream;
pub mod transport;

pub use stream::{DEFAULT_EXPIRES_IN_SECS, StreamClient};
pub use transport::{ApiRequest, ReqwestTransport, Transport};
