//! Shared HTTP plumbing for kwcluster's remote AI services.
//!
//! Both the embedding fetcher and the cluster labeler talk to
//! OpenAI-compatible JSON endpoints. This crate keeps the parts they share in
//! one place:
//!
//! - [`UpstreamClient`] - a pooled `reqwest` client bound to one endpoint, with
//!   bearer auth, per-service timeout and typed JSON decoding.
//! - [`RetryConfig`] / [`execute_with_retry`] - exponential backoff with
//!   jitter for transient failures (timeouts, connection resets, 408/429/5xx).
//! - [`UpstreamError`] - transport, status and response-shape failures.
//!
//! Response bodies are always decoded into explicit types. A body that does
//! not match the expected shape surfaces as [`UpstreamError::Format`] instead
//! of a panic on field access.

pub mod client;
pub mod error;
pub mod retry;
mod serde_millis;

pub use crate::client::UpstreamClient;
pub use crate::error::UpstreamError;
pub use crate::retry::{execute_with_retry, RetryConfig, RetryResult};
