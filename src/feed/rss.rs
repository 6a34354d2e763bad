//! RSS 2.0 fetcher.

use chrono::{DateTime, Utc};

use super::{Feed, FeedError, FeedFetcher, FeedItem};

/// Fetches feeds over HTTP and parses them with the [`rss`] crate.
#[derive(Debug, Default)]
pub struct RssFetcher;

impl RssFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Turn an already-fetched [`rss::Channel`] into a [`Feed`], newest
    /// items first.  No I/O, so parsing is testable offline.
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let mut items: Vec<FeedItem> = channel.items().iter().map(feed_item).collect();
        items.sort();

        Feed {
            title: channel.title().to_string(),
            description: channel.description().to_string(),
            items,
        }
    }
}

fn feed_item(item: &rss::Item) -> FeedItem {
    let link = item.link().map(String::from);
    let guid = match item.guid() {
        Some(guid) => guid.value().to_string(),
        None => link.clone().unwrap_or_default(),
    };
    // Unparseable dates are dropped rather than failing the whole feed.
    let published = item
        .pub_date()
        .and_then(|raw| DateTime::parse_from_rfc2822(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    FeedItem {
        guid,
        title: item.title().unwrap_or("(untitled)").to_string(),
        description: item.description().map(String::from),
        link,
        published,
    }
}

impl FeedFetcher for RssFetcher {
    fn fetch(&self, link: &str) -> Result<Feed, FeedError> {
        let body = reqwest::blocking::get(link)?.error_for_status()?.bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Feed {
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        RssFetcher::parse_channel(&channel)
    }

    #[test]
    fn parse_channel_extracts_feed_and_items() {
        let feed = parse(
            r#"<rss version="2.0"><channel>
  <title>Harbour News</title>
  <description>Daily port reports</description>
  <item>
    <title>Ferry schedule changes</title>
    <link>https://harbour.example/ferry</link>
    <guid>harbour-17</guid>
    <pubDate>Sat, 06 Apr 2024 08:30:00 +0000</pubDate>
    <description>Winter timetable ends</description>
  </item>
  <item>
    <title>Crane maintenance</title>
    <link>https://harbour.example/crane</link>
    <guid>harbour-18</guid>
    <pubDate>Sun, 07 Apr 2024 09:00:00 +0000</pubDate>
  </item>
</channel></rss>"#,
        );

        assert_eq!(feed.title, "Harbour News");
        assert_eq!(feed.description, "Daily port reports");

        let guids: Vec<_> = feed.items.iter().map(|i| i.guid.as_str()).collect();
        assert_eq!(guids, ["harbour-18", "harbour-17"], "newest first");
        assert!(feed.items[0].description.is_none());
        assert_eq!(feed.items[1].link.as_deref(), Some("https://harbour.example/ferry"));
        assert_eq!(feed.items[1].description.as_deref(), Some("Winter timetable ends"));
        assert!(feed.items[1].published.is_some());
    }

    #[test]
    fn guid_defaults_to_link() {
        let feed = parse(
            r#"<rss version="2.0"><channel><title>t</title>
  <item><title>Tide tables</title><link>https://harbour.example/tides</link></item>
</channel></rss>"#,
        );
        assert_eq!(feed.items[0].guid, "https://harbour.example/tides");
    }

    #[test]
    fn tolerates_missing_title_and_bad_date() {
        let feed = parse(
            r#"<rss version="2.0"><channel><title>t</title>
  <item><guid>x</guid><pubDate>yesterday-ish</pubDate></item>
</channel></rss>"#,
        );
        assert_eq!(feed.items[0].title, "(untitled)");
        assert!(feed.items[0].published.is_none());
    }

    #[test]
    fn html_page_is_a_parse_error() {
        let err: FeedError = rss::Channel::read_from("<html><body/></html>".as_bytes())
            .unwrap_err()
            .into();
        assert_eq!(err.key(), "form.error.parse");
        assert_eq!(err.name(), "ParseError");
    }
}
