//! HTTP middleware for request processing.
//!
//! Provides CORS and observability layers.

pub mod cors;
pub mod tracing;
