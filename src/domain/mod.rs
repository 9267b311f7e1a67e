//! Domain layer containing business entities and logic.
//!
//! Defines the link entity, the repository contract over the link store, and
//! the background worker that ages links.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`lifecycle_worker`] - Periodic lifetime decrement and expiry purge
//!
//! # Lifecycle Flow
//!
//! 1. [`lifecycle_worker::run_lifecycle_worker`] wakes on a fixed interval
//! 2. Every live link with lifetime above zero loses one day
//! 3. Live links at zero are soft-deleted, freeing their hashes for reuse
//! 4. Failures are logged; the next tick retries

pub mod entities;
pub mod lifecycle_worker;
pub mod repositories;
