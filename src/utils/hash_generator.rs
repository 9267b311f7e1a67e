//! Short hash and owner id generation.
//!
//! Generated hashes draw from a 62-character alphanumeric alphabet; at the
//! default length that is about 8.4 * 10^17 combinations, so collision
//! re-rolls are rare. Owner ids are random UUID v4 strings.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use uuid::Uuid;

/// Alphabet for generated hashes.
const HASH_CHARSET: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated hashes.
pub const HASH_LENGTH: usize = 10;

/// Longest hash a caller may supply.
pub const MAX_CUSTOM_HASH_LENGTH: usize = 32;

/// Compiled regex for the characters allowed in a custom hash.
static CUSTOM_HASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// First path segments already routed by the service.
const RESERVED_HASHES: &[&str] = &["api", "health"];

/// Generates a random hash of [`HASH_LENGTH`] alphanumeric characters.
pub fn generate_hash() -> String {
    let mut rng = rand::rng();

    (0..HASH_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..HASH_CHARSET.len());
            HASH_CHARSET[idx] as char
        })
        .collect()
}

/// Generates a random owner id.
pub fn generate_owner_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validates a caller-supplied hash.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_hash(hash: &str) -> Result<(), AppError> {
    if hash.is_empty() || hash.len() > MAX_CUSTOM_HASH_LENGTH {
        return Err(AppError::bad_request(
            "Hash must be 1-32 characters",
            json!({ "provided_length": hash.len() }),
        ));
    }

    if !CUSTOM_HASH_REGEX.is_match(hash) {
        return Err(AppError::bad_request(
            "Hash can only contain letters, digits, hyphens and underscores",
            json!({ "hash": hash }),
        ));
    }

    if RESERVED_HASHES.contains(&hash) {
        return Err(AppError::bad_request(
            "This hash is reserved",
            json!({ "hash": hash }),
        ));
    }

    Ok(())
}
