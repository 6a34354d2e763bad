//! The state owner.
//!
//! [`Store`] is the only way to mutate an [`AppState`].  Each setter commits
//! its write first and then hands exactly one [`Change`] to the observer, in
//! program order.  There is no batching: two writes, two notifications.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::model::{
    AppState, OutOfBandError, Post, PostId, ProcessState, Source, SourceId, Update,
};
use crate::error::StateError;
use crate::i18n;

/// One committed write, tagged by the field it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ProcessState,
    FormValid,
    FormError,
    Input,
    Sources,
    ActiveSource,
    Posts,
    PostRead { post_id: PostId, source_id: SourceId },
    SourcePolled(SourceId),
    LastUpdate,
    Language,
    /// Not stored in the state; only observed.
    Error(OutOfBandError),
}

/// Receives every [`Change`] after it has been committed.
pub trait Observer {
    fn observe(&mut self, change: &Change, state: &AppState);
}

/// Owns the application state and its observer.
pub struct Store<O: Observer> {
    state: AppState,
    observer: O,
    next_id: u64,
}

impl<O: Observer> Store<O> {
    pub fn new(state: AppState, observer: O) -> Self {
        Self {
            state,
            observer,
            next_id: 1,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Borrow the observer mutably alongside a read-only view of the state,
    /// for presentation-only actions that need both.
    pub fn parts_mut(&mut self) -> (&AppState, &mut O) {
        (&self.state, &mut self.observer)
    }

    fn emit(&mut self, change: Change) {
        debug!(?change, "state changed");
        self.observer.observe(&change, &self.state);
    }

    fn mint(&mut self, prefix: char) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    // -- form ----------------------------------------------------------------

    pub fn set_process_state(&mut self, process_state: ProcessState) {
        debug!(state = %process_state, "form process state");
        self.state.form.process_state = process_state;
        self.emit(Change::ProcessState);
    }

    pub fn set_form_valid(&mut self, valid: bool) {
        self.state.form.valid = valid;
        self.emit(Change::FormValid);
    }

    pub fn set_form_error(&mut self, error: Option<String>) {
        self.state.form.error = error;
        self.emit(Change::FormError);
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.state.form.fields.input = input.into();
        self.emit(Change::Input);
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), StateError> {
        if !i18n::is_supported(language) {
            return Err(StateError::UnsupportedLanguage(language.to_string()));
        }
        self.state.language = language.to_string();
        self.emit(Change::Language);
        Ok(())
    }

    // -- sources -------------------------------------------------------------

    /// Add a new source together with its initial posts.
    ///
    /// `posts` get fresh ids and are re-parented onto the new source.  The
    /// new source becomes active when nothing else is.  Returns the new id.
    pub fn add_source(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        posts: Vec<Post>,
        now: DateTime<Utc>,
    ) -> Result<SourceId, StateError> {
        let link = link.into();
        if self.state.has_link(&link) {
            return Err(StateError::DuplicateSource(link));
        }

        let id = self.mint('s');
        let source = Source {
            id: id.clone(),
            title: title.into(),
            description: description.into(),
            link,
            last_polled_at: now,
        };
        info!(source = %id, link = %source.link, "source added");

        // Source and posts land in one commit, so no observer ever sees a
        // post whose source is missing.
        let posts = self.adopt(&id, posts);
        self.state.sources.push(source);
        self.state.posts.extend(posts);
        self.emit(Change::Sources);
        self.emit(Change::Posts);

        if self.state.active_source_id.is_none() {
            self.state.active_source_id = Some(id.clone());
            self.emit(Change::ActiveSource);
        }
        Ok(id)
    }

    /// Remove a source and every post it owns.
    ///
    /// If it was active, activation falls to the first remaining source, or
    /// to none when the collection is now empty.
    pub fn delete_source(&mut self, id: &str) -> Result<(), StateError> {
        let Some(index) = self.state.sources.iter().position(|s| s.id == id) else {
            return Err(StateError::UnknownSource(id.to_string()));
        };
        info!(source = %id, "source deleted");

        self.state.posts.retain(|p| p.source_id != id);
        self.emit(Change::Posts);

        let was_active = self.state.is_active(id);
        self.state.sources.remove(index);

        if self.state.sources.is_empty() {
            self.state.active_source_id = None;
            self.emit(Change::ActiveSource);
        } else if was_active {
            self.state.active_source_id = Some(self.state.sources[0].id.clone());
            self.emit(Change::ActiveSource);
        }

        self.emit(Change::Sources);
        Ok(())
    }

    /// Activate a source.  Selecting the already active source is a no-op.
    pub fn select_source(&mut self, id: &str) -> Result<(), StateError> {
        if self.state.source(id).is_none() {
            return Err(StateError::UnknownSource(id.to_string()));
        }
        if self.state.is_active(id) {
            return Ok(());
        }
        self.state.active_source_id = Some(id.to_string());
        self.emit(Change::ActiveSource);
        Ok(())
    }

    pub fn touch_source(&mut self, id: &str, at: DateTime<Utc>) -> Result<(), StateError> {
        let source = self
            .state
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StateError::UnknownSource(id.to_string()))?;
        source.last_polled_at = at;
        self.emit(Change::SourcePolled(id.to_string()));
        Ok(())
    }

    // -- posts ---------------------------------------------------------------

    /// Mark a post read.  Marking an already read post changes nothing.
    pub fn mark_post_read(&mut self, id: &str) -> Result<(), StateError> {
        let post = self
            .state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StateError::UnknownPost(id.to_string()))?;
        if !post.unread {
            return Ok(());
        }
        post.unread = false;
        let source_id = post.source_id.clone();
        self.emit(Change::PostRead {
            post_id: id.to_string(),
            source_id,
        });
        Ok(())
    }

    /// Record posts discovered by one poll cycle and announce them.
    ///
    /// Posts are appended to the collection first, then `last_update` is set
    /// and observed, then cleared again without a further notification.
    /// An empty batch changes nothing.
    pub fn deliver_update(
        &mut self,
        source_id: &str,
        new_posts: Vec<Post>,
    ) -> Result<(), StateError> {
        if self.state.source(source_id).is_none() {
            return Err(StateError::UnknownSource(source_id.to_string()));
        }
        if let Some(foreign) = new_posts
            .iter()
            .find(|p| !p.source_id.is_empty() && p.source_id != source_id)
        {
            return Err(StateError::ForeignPost {
                post: foreign.id.clone(),
                source_id: source_id.to_string(),
            });
        }
        if new_posts.is_empty() {
            return Ok(());
        }

        let new_posts = self.adopt(source_id, new_posts);
        debug!(source = %source_id, count = new_posts.len(), "update delivered");

        self.state.posts.extend(new_posts.iter().cloned());
        self.emit(Change::Posts);

        self.state.last_update = Some(Update {
            source_id: source_id.to_string(),
            new_posts,
        });
        self.emit(Change::LastUpdate);
        self.state.last_update = None;
        Ok(())
    }

    /// Surface a failure from outside the core.  The state is not touched.
    pub fn report_error(&mut self, error: OutOfBandError) {
        self.emit(Change::Error(error));
    }

    /// Give incoming posts store-minted ids, re-parent them onto
    /// `source_id` and mark them unread.
    fn adopt(&mut self, source_id: &str, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .map(|mut post| {
                post.id = self.mint('p');
                post.source_id = source_id.to_string();
                post.unread = true;
                post
            })
            .collect()
    }
}
