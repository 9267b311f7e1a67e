//! Core domain entities.
//!
//! The service has a single persisted entity, [`Link`]. The remaining types
//! are inputs and results of store operations:
//!
//! - [`NewLink`] - insert payload with hash and owner already resolved
//! - [`LinkPage`] - one page of an owner's links
//! - [`DeleteOutcome`] - the three ways a delete can end
//! - [`LifecycleReport`] - rows touched by a lifecycle tick
//! - [`LinkSummary`] - aggregate counts for operators

pub mod link;

pub use link::{DeleteOutcome, LifecycleReport, Link, LinkPage, LinkSummary, NewLink};

#[cfg(test)]
pub(crate) use link::sample_link;
