//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by an opaque owner id.
///
/// `deleted_at` is `None` while the link is live. Soft-deleted rows stay in
/// the table until their hash is claimed again.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub url: String,
    pub hash: String,
    pub owner_id: String,
    pub click_count: i64,
    pub remaining_lifetime: i64,
}

impl Link {
    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true once the lifetime counter has run out.
    pub fn is_expired(&self) -> bool {
        self.remaining_lifetime <= 0
    }
}

/// Input data for inserting a new link.
///
/// Hash and owner id are already resolved by the time this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub hash: String,
    pub owner_id: String,
    pub remaining_lifetime: i64,
}

/// One page of an owner's live links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub total_links: i64,
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
}

impl LinkPage {
    /// An empty page echoing the requested pagination.
    pub fn empty(page: i64, limit: i64) -> Self {
        Self {
            links: Vec::new(),
            total_links: 0,
            total_pages: 0,
            page,
            limit,
        }
    }

    /// Number of pages needed to hold `total_links` at `limit` per page.
    pub fn page_count(total_links: i64, limit: i64) -> i64 {
        if limit <= 0 {
            return 0;
        }
        total_links / limit + i64::from(total_links % limit != 0)
    }
}

/// Result of a delete attempt, decided inside a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The live link was soft-deleted.
    Deleted,
    /// No live link with this hash belongs to the caller.
    NotPermitted,
    /// The caller's link with this hash exists only as a soft-deleted row.
    AlreadyDeleted,
}

/// Row counts touched by one lifecycle tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    pub decremented: u64,
    pub expired: u64,
}

/// Aggregate numbers shown by the admin CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub live_links: i64,
    pub deleted_links: i64,
    pub total_clicks: i64,
}

#[cfg(test)]
pub(crate) fn sample_link(id: i64, hash: &str, owner_id: &str) -> Link {
    let now = Utc::now();
    Link {
        id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
        url: "https://example.com".to_string(),
        hash: hash.to_string(),
        owner_id: owner_id.to_string(),
        click_count: 0,
        remaining_lifetime: 90,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_helpers() {
        let mut link = sample_link(1, "abc123", "owner-1");

        assert!(!link.is_deleted());
        assert!(!link.is_expired());

        link.remaining_lifetime = 0;
        link.deleted_at = Some(Utc::now());
        assert!(link.is_expired());
        assert!(link.is_deleted());
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(LinkPage::page_count(15, 10), 2);
        assert_eq!(LinkPage::page_count(20, 10), 2);
        assert_eq!(LinkPage::page_count(21, 10), 3);
        assert_eq!(LinkPage::page_count(0, 10), 0);
        assert_eq!(LinkPage::page_count(5, 0), 0);
    }

    #[test]
    fn test_page_count_does_not_overflow() {
        assert_eq!(LinkPage::page_count(15, i64::MAX), 1);
        assert_eq!(LinkPage::page_count(i64::MAX, 1), i64::MAX);
        assert_eq!(LinkPage::page_count(i64::MAX, i64::MAX), 1);
    }

    #[test]
    fn test_empty_page_echoes_pagination() {
        let page = LinkPage::empty(3, 25);
        assert!(page.links.is_empty());
        assert_eq!(page.total_links, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, 25);
    }
}
