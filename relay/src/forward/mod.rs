//! Forwarding of captured webhooks to the configured origin.
//!
//! The relay judges a forward purely on transport: any HTTP response from
//! the origin, whatever its status, counts as delivered.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::HttpForwarder;
pub use types::{BuildError, ForwardError, ForwardRequest, ForwardResponse};

/// Sends a forward request. One attempt per call.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn send(&self, request: ForwardRequest) -> Result<ForwardResponse, ForwardError>;
}
