//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and expose operations the HTTP
//! handlers and the admin CLI call directly.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, lookup, redirect and deletion

pub mod services;
