//! Render dispatch.
//!
//! [`Renderer`] observes the [`Store`](crate::state::Store) and keeps the
//! [`Surface`] in step with the state.  Each [`Change`] selects exactly one
//! handler; handlers re-derive what they show from the current state rather
//! than from the change, so running one twice leaves the same surface.

mod surface;
mod timer;

pub use surface::{Content, FeedbackKind, FragmentId, Mount, Surface};
pub use timer::{Dismiss, Timers, DISMISS_AFTER};

use std::time::Duration;

use tracing::{debug, warn};

use crate::i18n::Translate;
use crate::notify::{self, unread_count};
use crate::state::{AppState, Change, Observer, ProcessState};
use crate::view::{self, PostCard};

pub struct Renderer {
    surface: Surface,
    i18n: Box<dyn Translate>,
    timers: Timers,
}

impl Renderer {
    pub fn new(state: &AppState, mut i18n: Box<dyn Translate>) -> Self {
        if !i18n.set_language(&state.language) {
            warn!(language = %state.language, "unsupported language, keeping default");
        }
        Self {
            surface: Surface::new(state, i18n.as_ref()),
            i18n,
            timers: Timers::default(),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn language(&self) -> &str {
        self.i18n.current_language()
    }

    /// Advance the dismissal clock and drop whatever expired.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.timers.is_idle() {
            return;
        }
        for dismiss in self.timers.advance(elapsed) {
            if self.surface.remove_fragment(dismiss.mount, dismiss.id) {
                debug!(mount = ?dismiss.mount, "fragment dismissed");
            }
        }
    }

    // -- presentation-only actions -------------------------------------------

    /// Text typed into the input widget.
    pub fn edit_input(&mut self, text: &str) {
        self.surface.input = text.to_string();
    }

    /// Show the newly arrived posts: fresh post list, no banner.  Posts stay
    /// unread.
    pub fn dismiss_banner(&mut self, state: &AppState) {
        if self.surface.banner.take().is_some() {
            self.surface.rebuild_posts(state, self.i18n.as_ref());
        }
    }

    pub fn open_detail(&mut self, state: &AppState, post_id: &str) -> bool {
        match state.post(post_id) {
            Some(post) => {
                self.surface.detail = Some(view::detail::build(post, self.i18n.as_ref()));
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.surface.detail = None;
    }

    // -- handlers ------------------------------------------------------------

    fn schedule_dismiss(&mut self, mount: Mount, id: FragmentId) {
        self.timers.schedule(DISMISS_AFTER, Dismiss { mount, id });
    }

    fn render_process_state(&mut self, process_state: ProcessState) {
        let submit = &mut self.surface.submit;
        match process_state {
            ProcessState::Filling => {
                submit.enabled = true;
                submit.loading = false;
                let text = self.i18n.translate("form.success");
                let id = self.surface.show_feedback(FeedbackKind::Success, text);
                self.schedule_dismiss(Mount::InlineFeedback, id);
                self.surface.input.clear();
            }
            ProcessState::Sending => {
                submit.enabled = false;
                submit.loading = true;
            }
            ProcessState::Failed => {
                submit.loading = false;
                submit.enabled = true;
            }
        }
    }

    fn render_form_error(&mut self, error: Option<&str>) {
        self.surface.feedback = None;
        if let Some(key) = error {
            let text = self.i18n.translate(key);
            self.surface.show_feedback(FeedbackKind::Invalid, text);
        }
    }

    fn render_post_read(&mut self, state: &AppState, post_id: &str, source_id: &str) {
        if let Some(card) = self.surface.post_card_mut(post_id) {
            card.mark_read();
        }
        if let Some(card) = self.surface.source_card_mut(source_id) {
            card.set_badge(unread_count(&state.posts, source_id));
        }
    }

    fn render_language(&mut self, state: &AppState) {
        if !self.i18n.set_language(&state.language) {
            warn!(language = %state.language, "unsupported language ignored");
            return;
        }
        let i18n = self.i18n.as_ref();
        let surface = &mut self.surface;

        surface.labels = view::labels(i18n);
        if let Content::Feeds { posts, .. } = &mut surface.content {
            for card in posts.iter_mut() {
                if let Some(post) = state.post(&card.id) {
                    *card = PostCard::from_post(post, i18n);
                }
            }
        }
        if let Some(banner) = &mut surface.banner {
            banner.relabel(i18n);
        }
        if let Some(feedback) = &mut surface.feedback {
            feedback.text = match (&feedback.kind, &state.form.error) {
                (FeedbackKind::Invalid, Some(key)) => i18n.translate(key),
                _ => i18n.translate("form.success"),
            };
        }
        if let Some(detail) = &mut surface.detail {
            detail.open_hint = i18n.translate("detail.open");
            detail.close_hint = i18n.translate("detail.close");
        }
    }

    fn render_error(&mut self, title: &str, message: &str) {
        let id = self.surface.show_toast(title.to_string(), message.to_string());
        self.schedule_dismiss(Mount::ToastAlert, id);
    }
}

impl Observer for Renderer {
    fn observe(&mut self, change: &Change, state: &AppState) {
        match change {
            Change::ProcessState => self.render_process_state(state.form.process_state),
            Change::FormValid => self.surface.submit.enabled = state.form.valid,
            Change::FormError => self.render_form_error(state.form.error.as_deref()),
            Change::Sources | Change::ActiveSource => {
                self.surface.rebuild(state, self.i18n.as_ref());
            }
            Change::PostRead { post_id, source_id } => {
                self.render_post_read(state, post_id, source_id);
            }
            Change::LastUpdate => {
                if let Some(update) = &state.last_update {
                    notify::aggregate(&mut self.surface, state, update, self.i18n.as_ref());
                }
            }
            Change::Language => self.render_language(state),
            Change::Error(error) => self.render_error(&error.name, &error.message),
            Change::Input | Change::Posts | Change::SourcePolled(_) => {}
        }
    }
}
