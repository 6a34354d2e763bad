//! One entry of a fetched feed, before it becomes a [`Post`].

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::state::Post;

/// A single feed entry, normalised from the wire format.
///
/// ## Sorting
///
/// `FeedItem` implements [`Ord`] for **reverse-chronological** ordering:
/// newer items sort before older ones, and items without a date sort last.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedItem {
    /// Stable identifier from the feed (`<guid>`, falling back to `<link>`).
    pub guid: String,

    pub title: String,

    pub description: Option<String>,

    /// URL of the full content; the de-duplication key within a source.
    pub link: Option<String>,

    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// The link used to recognise this item on later polls.
    pub fn dedup_key(&self) -> &str {
        self.link.as_deref().unwrap_or(&self.guid)
    }

    /// Convert into an unread post.  The id and owning source are assigned
    /// by the store.
    pub fn into_post(self) -> Post {
        let link = self.dedup_key().to_string();
        Post {
            id: String::new(),
            source_id: String::new(),
            title: self.title,
            description: self.description.unwrap_or_default(),
            link,
            published: self.published,
            unread: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering: reverse chronological (newest first)
// ---------------------------------------------------------------------------

impl Ord for FeedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None` is less than `Some(_)`, so undated items sink to the bottom.
        other.published.cmp(&self.published)
    }
}

impl PartialOrd for FeedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
