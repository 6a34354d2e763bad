//! Application intents.
//!
//! [`App`] owns the [`Store`] (and through it the [`Renderer`]), remembers
//! which pane has focus and where the cursors are, and translates user
//! intents and poller results into store mutations.

use std::sync::mpsc::Sender;
use std::time::Duration;

use chrono::Utc;
use ratatui::widgets::ListState;
use reqwest::Url;
use tracing::{info, warn};

use crate::browser::{LinkOpener, SystemBrowser};
use crate::error::{StateError, ValidationError};
use crate::i18n::{self, Translate};
use crate::poll::{self, Origin, PollCmd, PollMsg};
use crate::render::{Renderer, Surface};
use crate::state::{AppState, OutOfBandError, Post, ProcessState, Store};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Sources,
    Posts,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Sources,
            Focus::Sources => Focus::Posts,
            Focus::Posts => Focus::Input,
        }
    }
}

/// A link is acceptable when it parses as an http(s) URL and is not
/// followed yet.
pub fn validate_link(link: &str, state: &AppState) -> Result<(), ValidationError> {
    let url = Url::parse(link).map_err(|_| ValidationError::Malformed)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ValidationError::Malformed);
    }
    if state.has_link(link) {
        return Err(ValidationError::Duplicate);
    }
    Ok(())
}

pub struct App {
    store: Store<Renderer>,
    commands: Sender<PollCmd>,
    opener: Box<dyn LinkOpener>,
    pub focus: Focus,
    pub source_cursor: ListState,
    pub post_cursor: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(language: &str, i18n: Box<dyn Translate>, commands: Sender<PollCmd>) -> Self {
        let state = AppState::new(language);
        let renderer = Renderer::new(&state, i18n);
        Self {
            store: Store::new(state, renderer),
            commands,
            opener: Box::new(SystemBrowser),
            focus: Focus::default(),
            source_cursor: ListState::default(),
            post_cursor: ListState::default(),
            quit: false,
        }
    }

    /// Replace the launcher used by [`App::open_link`].
    pub fn with_opener(mut self, opener: Box<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn surface(&self) -> &Surface {
        self.store.observer().surface()
    }

    fn send(&self, cmd: PollCmd) {
        if self.commands.send(cmd).is_err() {
            warn!("poller is gone; command dropped");
        }
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.store.parts_mut().1.tick(elapsed);
    }

    // -- form ----------------------------------------------------------------

    pub fn type_char(&mut self, c: char) {
        let mut text = self.surface().input.clone();
        text.push(c);
        self.input_changed(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.surface().input.clone();
        if text.pop().is_some() {
            self.input_changed(text);
        }
    }

    fn input_changed(&mut self, text: String) {
        self.store.parts_mut().1.edit_input(&text);
        let verdict = if text.trim().is_empty() {
            Err(None)
        } else {
            validate_link(text.trim(), self.state()).map_err(Some)
        };
        self.store.set_input(text);

        match verdict {
            Ok(()) => {
                self.store.set_form_valid(true);
                self.store.set_form_error(None);
            }
            Err(error) => {
                self.store.set_form_valid(false);
                self.store
                    .set_form_error(error.map(|e| e.key().to_string()));
            }
        }
    }

    /// Ask the poller to subscribe to the link in the form.
    pub fn submit(&mut self) {
        let form = &self.state().form;
        if !form.valid || form.process_state == ProcessState::Sending {
            return;
        }
        let link = form.fields.input.trim().to_string();
        self.store.set_process_state(ProcessState::Sending);
        self.send(PollCmd::Subscribe {
            link,
            origin: Origin::Form,
        });
    }

    /// Subscribe to a link without going through the form.
    pub fn subscribe(&self, link: &str) {
        self.send(PollCmd::Subscribe {
            link: link.to_string(),
            origin: Origin::Startup,
        });
    }

    // -- poller --------------------------------------------------------------

    pub fn handle_poll(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Subscribed { link, origin, feed } => {
                let posts = poll::fresh_items(&[], "", feed.items);
                let added = self.store.add_source(
                    feed.title,
                    feed.description,
                    link.clone(),
                    posts,
                    Utc::now(),
                );
                match added {
                    Ok(source_id) => {
                        self.send(PollCmd::Track { source_id, link });
                        if origin == Origin::Form {
                            self.store.set_input("");
                            self.store.set_form_valid(false);
                            self.store.set_process_state(ProcessState::Filling);
                        }
                    }
                    Err(err) => {
                        warn!(%link, %err, "subscription not added");
                        if origin == Origin::Form {
                            self.store.set_process_state(ProcessState::Failed);
                            self.store
                                .set_form_error(Some(ValidationError::Duplicate.key().to_string()));
                        }
                    }
                }
            }
            PollMsg::SubscribeFailed { link, origin, error } => {
                warn!(%link, %error, "subscribe failed");
                match origin {
                    Origin::Form => {
                        self.store.set_process_state(ProcessState::Failed);
                        self.store.set_form_error(Some(error.key().to_string()));
                    }
                    Origin::Startup => self
                        .store
                        .report_error(OutOfBandError::new(error.name(), format!("{link}: {error}"))),
                }
            }
            PollMsg::Polled { source_id, items } => {
                // The source may have been deleted while the fetch was running.
                if self.state().source(&source_id).is_none() {
                    return;
                }
                let fresh = poll::fresh_items(&self.state().posts, &source_id, items);
                let delivered = self
                    .store
                    .touch_source(&source_id, Utc::now())
                    .and_then(|()| self.store.deliver_update(&source_id, fresh));
                if let Err(err) = delivered {
                    warn!(%err, "poll result dropped");
                }
            }
            PollMsg::PollFailed { source_id, error } => {
                let Some(source) = self.state().source(&source_id) else {
                    return;
                };
                let message = format!("{}: {error}", source.title);
                self.store
                    .report_error(OutOfBandError::new(error.name(), message));
            }
        }
        self.clamp_cursors();
    }

    /// Entry point for a scheduler that already did its own de-duplication.
    pub fn deliver_update(
        &mut self,
        source_id: &str,
        new_posts: Vec<Post>,
    ) -> Result<(), StateError> {
        self.store.deliver_update(source_id, new_posts)
    }

    // -- sources and posts ---------------------------------------------------

    pub fn delete_source(&mut self, id: &str) -> Result<(), StateError> {
        self.store.delete_source(id)?;
        self.send(PollCmd::Untrack(id.to_string()));
        self.clamp_cursors();
        Ok(())
    }

    pub fn select_source(&mut self, id: &str) -> Result<(), StateError> {
        self.store.select_source(id)?;
        self.post_cursor.select(None);
        self.clamp_cursors();
        Ok(())
    }

    /// Show the detail view and mark the post read.
    pub fn open_post(&mut self, id: &str) -> Result<(), StateError> {
        let (state, renderer) = self.store.parts_mut();
        if !renderer.open_detail(state, id) {
            return Err(StateError::UnknownPost(id.to_string()));
        }
        self.store.mark_post_read(id)
    }

    pub fn mark_post_read(&mut self, id: &str) -> Result<(), StateError> {
        self.store.mark_post_read(id)
    }

    pub fn close_detail(&mut self) {
        self.store.parts_mut().1.close_detail();
    }

    /// Open the link of the post in the detail view, then close the view.
    /// A launcher failure is reported as a toast.
    pub fn open_link(&mut self) {
        let Some(link) = self.surface().detail.as_ref().map(|d| d.link.clone()) else {
            return;
        };
        match self.opener.open(&link) {
            Ok(()) => info!(%link, "link opened"),
            Err(err) => {
                warn!(%link, %err, "link not opened");
                self.store
                    .report_error(OutOfBandError::new("BrowserError", format!("{link}: {err}")));
            }
        }
        self.close_detail();
    }

    pub fn dismiss_banner(&mut self) {
        let (state, renderer) = self.store.parts_mut();
        renderer.dismiss_banner(state);
        self.clamp_cursors();
    }

    pub fn set_language(&mut self, tag: &str) {
        match self.store.set_language(tag) {
            Ok(()) => info!(language = self.store.observer().language(), "language switched"),
            Err(err) => warn!(%err, "language not switched"),
        }
    }

    pub fn cycle_language(&mut self) {
        let next = i18n::next_language(&self.state().language);
        self.set_language(next);
    }

    // -- navigation ----------------------------------------------------------

    pub fn highlighted_source(&self) -> Option<&str> {
        let cards = self.surface().source_cards();
        self.source_cursor
            .selected()
            .and_then(|i| cards.get(i))
            .map(|c| c.id.as_str())
    }

    pub fn highlighted_post(&self) -> Option<&str> {
        let cards = self.surface().post_cards();
        self.post_cursor
            .selected()
            .and_then(|i| cards.get(i))
            .map(|c| c.id.as_str())
    }

    fn focused_list(&mut self) -> Option<(&mut ListState, usize)> {
        match self.focus {
            Focus::Input => None,
            Focus::Sources => {
                let len = self.store.observer().surface().source_cards().len();
                Some((&mut self.source_cursor, len))
            }
            Focus::Posts => {
                let len = self.store.observer().surface().post_cards().len();
                Some((&mut self.post_cursor, len))
            }
        }
    }

    pub fn select_next(&mut self) {
        let Some((cursor, len)) = self.focused_list() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match cursor.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        cursor.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        let Some((cursor, len)) = self.focused_list() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match cursor.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        cursor.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if let Some((cursor, len)) = self.focused_list() {
            if len > 0 {
                cursor.select(Some(0));
            }
        }
    }

    pub fn select_last(&mut self) {
        if let Some((cursor, len)) = self.focused_list() {
            if len > 0 {
                cursor.select(Some(len - 1));
            }
        }
    }

    fn clamp_cursors(&mut self) {
        let sources = self.surface().source_cards().len();
        let posts = self.surface().post_cards().len();
        clamp(&mut self.source_cursor, sources);
        clamp(&mut self.post_cursor, posts);
    }

    /// `Enter`: submit, activate the highlighted source, or view the
    /// highlighted post, depending on focus.
    pub fn activate(&mut self) -> Result<(), StateError> {
        match self.focus {
            Focus::Input => {
                self.submit();
                Ok(())
            }
            Focus::Sources => match self.highlighted_source().map(String::from) {
                Some(id) => self.select_source(&id),
                None => Ok(()),
            },
            Focus::Posts => match self.highlighted_post().map(String::from) {
                Some(id) => self.open_post(&id),
                None => Ok(()),
            },
        }
    }
}

fn clamp(cursor: &mut ListState, len: usize) {
    match cursor.selected() {
        Some(_) if len == 0 => cursor.select(None),
        Some(i) if i >= len => cursor.select(Some(len - 1)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::feed::{Feed, FeedError, FeedItem};
    use crate::i18n::Catalog;
    use crate::notify::unread_count;
    use crate::render::{Content, FeedbackKind, DISMISS_AFTER};

    fn app() -> (App, Receiver<PollCmd>) {
        let (tx, rx) = mpsc::channel();
        (App::new("en", Box::new(Catalog::new("en")), tx), rx)
    }

    fn item(link: &str) -> FeedItem {
        FeedItem {
            guid: link.to_string(),
            title: format!("Title {link}"),
            description: Some(format!("About {link}")),
            link: Some(link.to_string()),
            published: None,
        }
    }

    fn feed(title: &str, links: &[&str]) -> Feed {
        Feed {
            title: title.to_string(),
            description: format!("{title} feed"),
            items: links.iter().map(|l| item(l)).collect(),
        }
    }

    fn subscribed(app: &mut App, link: &str, links: &[&str]) -> String {
        app.handle_poll(PollMsg::Subscribed {
            link: link.to_string(),
            origin: Origin::Startup,
            feed: feed(link, links),
        });
        app.state()
            .sources
            .iter()
            .find(|s| s.link == link)
            .map(|s| s.id.clone())
            .expect("source added")
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.type_char(c);
        }
    }

    fn assert_badges_match(app: &App) {
        for source in &app.state().sources {
            assert_eq!(
                app.surface().badge(&source.id).unwrap_or(0),
                unread_count(&app.state().posts, &source.id),
                "badge for {}",
                source.id
            );
        }
    }

    #[test]
    fn new_app_shows_start_prompt() {
        let (app, _rx) = app();
        assert_eq!(app.surface().content, Content::Start);
        assert!(!app.surface().submit.enabled);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn validate_link_rules() {
        let mut state = AppState::new("en");
        assert_eq!(validate_link("not a url", &state), Err(ValidationError::Malformed));
        assert_eq!(validate_link("ftp://x.example/rss", &state), Err(ValidationError::Malformed));
        assert_eq!(validate_link("https://x.example/rss", &state), Ok(()));

        state.sources.push(crate::state::Source {
            id: "s1".into(),
            title: "x".into(),
            description: String::new(),
            link: "https://x.example/rss".into(),
            last_polled_at: Utc::now(),
        });
        assert_eq!(validate_link("https://x.example/rss", &state), Err(ValidationError::Duplicate));
    }

    #[test]
    fn typing_validates_and_toggles_submit() {
        let (mut app, _rx) = app();
        type_text(&mut app, "htt");
        assert!(!app.state().form.valid);
        assert_eq!(app.state().form.error.as_deref(), Some("form.error.url"));
        assert!(!app.surface().submit.enabled);

        type_text(&mut app, "ps://a.example/rss");
        assert!(app.state().form.valid);
        assert!(app.state().form.error.is_none());
        assert!(app.surface().submit.enabled);
        assert!(app.surface().feedback.is_none());
        assert_eq!(app.surface().input, "https://a.example/rss");
    }

    #[test]
    fn clearing_input_removes_message() {
        let (mut app, _rx) = app();
        type_text(&mut app, "x");
        assert!(app.surface().feedback.is_some());
        app.backspace();
        assert!(app.surface().feedback.is_none());
        assert!(!app.state().form.valid);
    }

    #[test]
    fn submit_round_trip_adds_source_and_resets_form() {
        let (mut app, rx) = app();
        type_text(&mut app, "https://a.example/rss");
        app.submit();

        assert_eq!(app.state().form.process_state, ProcessState::Sending);
        assert!(app.surface().submit.loading);
        match rx.try_recv().unwrap() {
            PollCmd::Subscribe { link, origin } => {
                assert_eq!(link, "https://a.example/rss");
                assert_eq!(origin, Origin::Form);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        app.handle_poll(PollMsg::Subscribed {
            link: "https://a.example/rss".into(),
            origin: Origin::Form,
            feed: feed("A", &["l1", "l2"]),
        });

        assert_eq!(app.state().form.process_state, ProcessState::Filling);
        assert!(app.surface().submit.enabled);
        assert!(app.surface().input.is_empty());
        assert_eq!(
            app.surface().feedback.as_ref().map(|f| &f.kind),
            Some(&FeedbackKind::Success)
        );
        assert!(matches!(rx.try_recv().unwrap(), PollCmd::Track { .. }));

        let id = app.state().sources[0].id.clone();
        assert_eq!(app.state().active_source_id.as_deref(), Some(id.as_str()));
        assert_eq!(app.surface().badge(&id), Some(2));
        assert_eq!(app.surface().post_cards().len(), 2);

        app.tick(DISMISS_AFTER);
        assert!(app.surface().feedback.is_none());
    }

    #[test]
    fn submit_is_ignored_while_invalid_or_sending() {
        let (mut app, rx) = app();
        app.submit();
        assert!(rx.try_recv().is_err());

        type_text(&mut app, "https://a.example/rss");
        app.submit();
        app.submit();
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failed_subscribe_shows_error_and_reenables() {
        let (mut app, _rx) = app();
        type_text(&mut app, "https://a.example/rss");
        app.submit();

        let error: FeedError = rss::Channel::read_from("<html/>".as_bytes())
            .unwrap_err()
            .into();
        app.handle_poll(PollMsg::SubscribeFailed {
            link: "https://a.example/rss".into(),
            origin: Origin::Form,
            error,
        });

        assert_eq!(app.state().form.process_state, ProcessState::Failed);
        assert!(app.surface().submit.enabled);
        assert!(!app.surface().submit.loading);
        let feedback = app.surface().feedback.clone().expect("feedback");
        assert_eq!(feedback.kind, FeedbackKind::Invalid);
        assert_eq!(feedback.text, "This resource does not contain a valid feed");
    }

    #[test]
    fn poll_delivers_only_new_links() {
        let (mut app, _rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &["l1"]);

        app.handle_poll(PollMsg::Polled {
            source_id: a.clone(),
            items: vec![item("l1"), item("l2")],
        });

        assert_eq!(app.state().posts.len(), 2);
        assert_eq!(app.surface().badge(&a), Some(2));
        assert_eq!(app.surface().banner.as_ref().map(|b| b.count), Some(1));
        assert_badges_match(&app);

        app.dismiss_banner();
        assert_eq!(app.surface().post_cards().len(), 2);
        assert!(app.surface().banner.is_none());
        assert_eq!(app.surface().badge(&a), Some(2));
    }

    #[test]
    fn poll_for_deleted_source_is_ignored() {
        let (mut app, rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &[]);
        app.delete_source(&a).unwrap();

        let untracked = rx.try_iter().any(|cmd| matches!(cmd, PollCmd::Untrack(id) if id == a));
        assert!(untracked);

        app.handle_poll(PollMsg::Polled {
            source_id: a,
            items: vec![item("l1")],
        });
        assert!(app.state().posts.is_empty());
    }

    #[test]
    fn poll_failure_raises_toast_only() {
        let (mut app, _rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &["l1"]);
        let before = app.state().clone();

        let error: FeedError = rss::Channel::read_from("nope".as_bytes()).unwrap_err().into();
        app.handle_poll(PollMsg::PollFailed { source_id: a, error });

        assert_eq!(app.state(), &before);
        let toast = app.surface().toast.clone().expect("toast");
        assert_eq!(toast.title, "ParseError");
        app.tick(DISMISS_AFTER);
        assert!(app.surface().toast.is_none());
    }

    #[test]
    fn deliver_update_scenario() {
        let (mut app, _rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &["p1"]);

        let new_post = Post {
            id: "2".into(),
            source_id: a.clone(),
            title: "two".into(),
            description: String::new(),
            link: "p2".into(),
            published: None,
            unread: true,
        };
        app.deliver_update(&a, vec![new_post]).unwrap();

        assert_eq!(app.surface().badge(&a), Some(2));
        let banner = app.surface().banner.clone().expect("banner above the posts");
        assert_eq!(banner.count, 1);
        assert_eq!(banner.text(), "Show 1 new posts");

        app.dismiss_banner();
        let titles: Vec<_> = app.surface().post_cards().iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, ["Title p1", "two"]);
        assert_eq!(app.surface().badge(&a), Some(2));
    }

    #[test]
    fn open_post_marks_read_and_shows_detail() {
        let (mut app, _rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &["l1", "l2"]);
        app.focus = Focus::Posts;
        app.select_first();
        app.activate().unwrap();

        let detail = app.surface().detail.clone().expect("detail open");
        assert_eq!(detail.link, "l1");
        assert_eq!(app.surface().badge(&a), Some(1));
        assert!(!app.surface().post_cards()[0].unread);

        app.close_detail();
        assert!(app.surface().detail.is_none());

        let second = app.surface().post_cards()[1].id.clone();
        app.mark_post_read(&second).unwrap();
        app.mark_post_read(&second).unwrap();
        assert_eq!(app.surface().badge(&a), None);
        assert!(app.surface().detail.is_none());
        assert_badges_match(&app);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (mut app, _rx) = app();
        assert_eq!(app.open_post("ghost"), Err(StateError::UnknownPost("ghost".into())));
        assert_eq!(app.select_source("ghost"), Err(StateError::UnknownSource("ghost".into())));
        assert_eq!(app.delete_source("ghost"), Err(StateError::UnknownSource("ghost".into())));
    }

    #[test]
    fn selecting_sources_filters_posts() {
        let (mut app, _rx) = app();
        let _a = subscribed(&mut app, "https://a.example/rss", &["a1", "a2"]);
        let b = subscribed(&mut app, "https://b.example/rss", &["b1"]);

        app.focus = Focus::Sources;
        app.select_last();
        assert_eq!(app.highlighted_source(), Some(b.as_str()));
        app.activate().unwrap();

        assert_eq!(app.state().active_source_id.as_deref(), Some(b.as_str()));
        let titles: Vec<_> = app.surface().post_cards().iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, ["Title b1"]);
    }

    #[test]
    fn deleting_sources_keeps_invariants() {
        let (mut app, _rx) = app();
        let a = subscribed(&mut app, "https://a.example/rss", &["a1"]);
        let b = subscribed(&mut app, "https://b.example/rss", &["b1", "b2"]);
        app.select_source(&b).unwrap();

        app.delete_source(&b).unwrap();
        assert_eq!(app.state().active_source_id.as_deref(), Some(a.as_str()));
        assert!(app.state().posts.iter().all(|p| p.source_id == a));
        assert_badges_match(&app);

        app.delete_source(&a).unwrap();
        assert_eq!(app.state().active_source_id, None);
        assert_eq!(app.surface().content, Content::Start);
        assert!(app.source_cursor.selected().is_none());
    }

    #[test]
    fn cycle_language_relabels() {
        let (mut app, _rx) = app();
        app.cycle_language();
        assert_eq!(app.state().language, "ru");
        assert_eq!(app.surface().labels.submit, "Добавить");
        app.set_language("xx");
        assert_eq!(app.state().language, "ru");
    }

    #[test]
    fn navigation_on_empty_lists_is_noop() {
        let (mut app, _rx) = app();
        for focus in [Focus::Input, Focus::Sources, Focus::Posts] {
            app.focus = focus;
            app.select_next();
            app.select_previous();
            app.select_first();
            app.select_last();
        }
        assert!(app.source_cursor.selected().is_none());
        assert!(app.post_cursor.selected().is_none());
    }

    #[test]
    fn navigation_clamps() {
        let (mut app, _rx) = app();
        subscribed(&mut app, "https://a.example/rss", &["1", "2", "3"]);
        app.focus = Focus::Posts;

        app.select_next();
        assert_eq!(app.post_cursor.selected(), Some(0));
        app.select_previous();
        assert_eq!(app.post_cursor.selected(), Some(0));
        app.select_last();
        app.select_next();
        assert_eq!(app.post_cursor.selected(), Some(2));
    }
}
