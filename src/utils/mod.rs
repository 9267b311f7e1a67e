//! Helper functions shared by services and handlers.
//!
//! - [`hash_generator`] - Short hash / owner id generation and hash validation
//! - [`url_validator`] - Destination URL checks

pub mod hash_generator;
pub mod url_validator;
