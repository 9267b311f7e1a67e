//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, ownership checks and lifecycle updates

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;
