//! Background feed polling.
//!
//! Runs on a dedicated thread.  The UI thread sends [`PollCmd`]s (subscribe
//! to a new link, start or stop tracking a source) and drains [`PollMsg`]s
//! once per tick.  Tracked sources are refetched every poll interval.
//!
//! The poller never sees application state.  Deciding which fetched items
//! are new happens on the UI thread through [`fresh_items`].

use std::collections::HashSet;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::feed::{Feed, FeedError, FeedFetcher, FeedItem};
use crate::state::{Post, SourceId};

/// Who asked for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Submitted through the add-feed form.
    Form,
    /// Listed in the config file or on the command line.
    Startup,
}

/// Requests from the UI thread.
#[derive(Debug)]
pub enum PollCmd {
    Subscribe { link: String, origin: Origin },
    Track { source_id: SourceId, link: String },
    Untrack(SourceId),
}

/// Results sent back to the UI thread.
#[derive(Debug)]
pub enum PollMsg {
    Subscribed {
        link: String,
        origin: Origin,
        feed: Feed,
    },
    SubscribeFailed {
        link: String,
        origin: Origin,
        error: FeedError,
    },
    Polled {
        source_id: SourceId,
        items: Vec<FeedItem>,
    },
    PollFailed {
        source_id: SourceId,
        error: FeedError,
    },
}

/// Handle to the poller thread.
pub struct Poller {
    pub commands: mpsc::Sender<PollCmd>,
    pub messages: mpsc::Receiver<PollMsg>,
}

/// Spawn the background polling thread.
///
/// The thread runs until either side of its channels is dropped.
pub fn spawn(fetcher: Box<dyn FeedFetcher>, interval: Duration) -> Poller {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::spawn(move || {
        let mut tracked: Vec<(SourceId, String)> = Vec::new();
        let mut next_poll = Instant::now() + interval;

        loop {
            let wait = next_poll.saturating_duration_since(Instant::now());
            let msgs = match cmd_rx.recv_timeout(wait) {
                Ok(PollCmd::Subscribe { link, origin }) => {
                    let msg = match fetcher.fetch(&link) {
                        Ok(feed) => PollMsg::Subscribed { link, origin, feed },
                        Err(error) => PollMsg::SubscribeFailed { link, origin, error },
                    };
                    vec![msg]
                }
                Ok(PollCmd::Track { source_id, link }) => {
                    debug!(source = %source_id, %link, "tracking");
                    tracked.push((source_id, link));
                    continue;
                }
                Ok(PollCmd::Untrack(source_id)) => {
                    tracked.retain(|(id, _)| *id != source_id);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {
                    next_poll = Instant::now() + interval;
                    poll_all(fetcher.as_ref(), &tracked)
                }
                Err(RecvTimeoutError::Disconnected) => return,
            };

            for msg in msgs {
                // If the receiver is gone the main thread has exited.
                if msg_tx.send(msg).is_err() {
                    return;
                }
            }
        }
    });

    Poller {
        commands: cmd_tx,
        messages: msg_rx,
    }
}

fn poll_all(fetcher: &dyn FeedFetcher, tracked: &[(SourceId, String)]) -> Vec<PollMsg> {
    tracked
        .iter()
        .map(|(source_id, link)| match fetcher.fetch(link) {
            Ok(feed) => PollMsg::Polled {
                source_id: source_id.clone(),
                items: feed.items,
            },
            Err(error) => {
                warn!(source = %source_id, %error, "poll failed");
                PollMsg::PollFailed {
                    source_id: source_id.clone(),
                    error,
                }
            }
        })
        .collect()
}

/// Posts for the items whose link is not yet known for `source_id`.
///
/// Duplicates inside `items` itself are dropped too.
pub fn fresh_items(existing: &[Post], source_id: &str, items: Vec<FeedItem>) -> Vec<Post> {
    let mut seen: HashSet<String> = existing
        .iter()
        .filter(|p| p.source_id == source_id)
        .map(|p| p.link.clone())
        .collect();

    items
        .into_iter()
        .filter(|item| seen.insert(item.dedup_key().to_string()))
        .map(|item| {
            let mut post = item.into_post();
            post.source_id = source_id.to_string();
            post
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(link: &str) -> FeedItem {
        FeedItem {
            guid: link.to_string(),
            title: link.to_string(),
            description: None,
            link: Some(link.to_string()),
            published: None,
        }
    }

    fn existing(source_id: &str, link: &str) -> Post {
        let mut post = item(link).into_post();
        post.id = format!("{source_id}-{link}");
        post.source_id = source_id.to_string();
        post
    }

    #[test]
    fn fresh_items_skips_known_links_of_same_source() {
        let known = vec![existing("a", "l1"), existing("b", "l2")];
        let fresh = fresh_items(&known, "a", vec![item("l1"), item("l2"), item("l3")]);

        let links: Vec<_> = fresh.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(links, ["l2", "l3"], "l2 belongs to another source");
        assert!(fresh.iter().all(|p| p.source_id == "a" && p.unread));
    }

    #[test]
    fn fresh_items_drops_duplicates_within_batch() {
        let fresh = fresh_items(&[], "a", vec![item("x"), item("x")]);
        assert_eq!(fresh.len(), 1);
    }

    struct Canned;

    impl FeedFetcher for Canned {
        fn fetch(&self, link: &str) -> Result<Feed, FeedError> {
            Ok(Feed {
                title: link.to_string(),
                description: String::new(),
                items: vec![item(&format!("{link}/1"))],
            })
        }
    }

    #[test]
    fn subscribe_round_trips_through_thread() {
        let poller = spawn(Box::new(Canned), Duration::from_secs(3600));
        poller
            .commands
            .send(PollCmd::Subscribe {
                link: "https://a.example/rss".into(),
                origin: Origin::Form,
            })
            .unwrap();

        match poller.messages.recv_timeout(Duration::from_secs(5)).unwrap() {
            PollMsg::Subscribed { link, origin, feed } => {
                assert_eq!(link, "https://a.example/rss");
                assert_eq!(origin, Origin::Form);
                assert_eq!(feed.items.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn tracked_sources_are_polled_on_interval() {
        let poller = spawn(Box::new(Canned), Duration::from_millis(20));
        poller
            .commands
            .send(PollCmd::Track {
                source_id: "s1".into(),
                link: "https://a.example/rss".into(),
            })
            .unwrap();

        match poller.messages.recv_timeout(Duration::from_secs(5)).unwrap() {
            PollMsg::Polled { source_id, items } => {
                assert_eq!(source_id, "s1");
                assert_eq!(items.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
