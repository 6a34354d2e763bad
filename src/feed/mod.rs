//! Feed fetching.
//!
//! This module defines the [`FeedFetcher`] trait and the [`Feed`] /
//! [`FeedItem`] types it produces.  The concrete implementation lives in
//! [`rss`].  Nothing here touches application state: the poller hands the
//! results to the UI thread, which turns items into posts.
//!
//! ## For contributors: adding a new feed format
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a fetcher struct and implement [`FeedFetcher`] for it.
//! 3. Add `mod atom;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of (or next to) [`RssFetcher`].

mod item;
mod rss;

pub use item::FeedItem;
pub use rss::RssFetcher;

use thiserror::Error;

/// A fetched and parsed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("not a valid feed: {0}")]
    Parse(#[from] ::rss::Error),
}

impl FeedError {
    /// Short name shown as the title of an error alert.
    pub fn name(&self) -> &'static str {
        match self {
            FeedError::Network(_) => "NetworkError",
            FeedError::Parse(_) => "ParseError",
        }
    }

    /// Translation key for the message shown beneath the form.
    pub fn key(&self) -> &'static str {
        match self {
            FeedError::Network(_) => "form.error.network",
            FeedError::Parse(_) => "form.error.parse",
        }
    }
}

/// Anything that can turn a feed link into a [`Feed`].
///
/// The poller calls [`fetch()`](FeedFetcher::fetch) on a background thread,
/// so implementations must be [`Send`].
pub trait FeedFetcher: Send {
    fn fetch(&self, link: &str) -> Result<Feed, FeedError>;
}
