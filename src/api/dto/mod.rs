//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Empty strings in optional inputs are read as absent.

pub mod health;
pub mod link;
pub mod pagination;
