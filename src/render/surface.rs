//! The presentation surface: what is currently on screen, as plain data.
//!
//! Handlers in [`super::Renderer`] replace or patch these fragments; the
//! terminal adapter in [`crate::ui`] only reads them.

use crate::i18n::Translate;
use crate::state::AppState;
use crate::view::{self, Banner, Labels, PostCard, PostDetail, SourceCard};

/// Named places fragments attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    SourceList,
    PostList,
    NotificationBanner,
    InlineFeedback,
    ToastAlert,
}

/// Identity of a transient fragment, so a late dismissal can tell whether
/// the fragment it was scheduled for is still the one on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// No sources yet: the start prompt.
    Start,
    Feeds {
        sources: Vec<SourceCard>,
        posts: Vec<PostCard>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Invalid,
}

/// Message beneath the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FragmentId,
    pub kind: FeedbackKind,
    pub text: String,
}

/// Transient alert for failures outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: FragmentId,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub labels: Labels,
    pub content: Content,
    pub banner: Option<Banner>,
    pub submit: SubmitControl,
    /// Text currently in the input widget.
    pub input: String,
    pub feedback: Option<Feedback>,
    pub toast: Option<Toast>,
    pub detail: Option<PostDetail>,
    next_fragment: u64,
}

impl Surface {
    pub fn new(state: &AppState, i18n: &dyn Translate) -> Self {
        let mut surface = Self {
            labels: view::labels(i18n),
            content: Content::Start,
            banner: None,
            submit: SubmitControl {
                enabled: state.form.valid,
                loading: false,
            },
            input: state.form.fields.input.clone(),
            feedback: None,
            toast: None,
            detail: None,
            next_fragment: 1,
        };
        surface.rebuild(state, i18n);
        surface
    }

    pub fn fragment_id(&mut self) -> FragmentId {
        let id = FragmentId(self.next_fragment);
        self.next_fragment += 1;
        id
    }

    /// Replace both lists with a fresh render of `state`.
    ///
    /// The banner lives above the post list and goes with it.
    pub fn rebuild(&mut self, state: &AppState, i18n: &dyn Translate) {
        self.content = if state.sources.is_empty() {
            Content::Start
        } else {
            Content::Feeds {
                sources: view::source_list::build(state),
                posts: view::post_list::build(state, i18n),
            }
        };
        self.banner = None;
        if let Some(detail) = &self.detail {
            if state.post(&detail.post_id).is_none() {
                self.detail = None;
            }
        }
    }

    /// Replace only the post list.
    pub fn rebuild_posts(&mut self, state: &AppState, i18n: &dyn Translate) {
        if let Content::Feeds { posts, .. } = &mut self.content {
            *posts = view::post_list::build(state, i18n);
        }
    }

    pub fn source_cards(&self) -> &[SourceCard] {
        match &self.content {
            Content::Start => &[],
            Content::Feeds { sources, .. } => sources,
        }
    }

    pub fn post_cards(&self) -> &[PostCard] {
        match &self.content {
            Content::Start => &[],
            Content::Feeds { posts, .. } => posts,
        }
    }

    pub fn source_card_mut(&mut self, id: &str) -> Option<&mut SourceCard> {
        match &mut self.content {
            Content::Start => None,
            Content::Feeds { sources, .. } => sources.iter_mut().find(|c| c.id == id),
        }
    }

    pub fn post_card_mut(&mut self, id: &str) -> Option<&mut PostCard> {
        match &mut self.content {
            Content::Start => None,
            Content::Feeds { posts, .. } => posts.iter_mut().find(|c| c.id == id),
        }
    }

    pub fn badge(&self, source_id: &str) -> Option<usize> {
        self.source_cards()
            .iter()
            .find(|c| c.id == source_id)
            .and_then(|c| c.badge)
    }

    pub fn show_feedback(&mut self, kind: FeedbackKind, text: String) -> FragmentId {
        let id = self.fragment_id();
        self.feedback = Some(Feedback { id, kind, text });
        id
    }

    pub fn show_toast(&mut self, title: String, message: String) -> FragmentId {
        let id = self.fragment_id();
        self.toast = Some(Toast { id, title, message });
        id
    }

    /// Remove the fragment `id` from `mount` if it is still there.
    ///
    /// Returns whether anything was removed; removing a fragment that is
    /// already gone (or was replaced) is a no-op.
    pub fn remove_fragment(&mut self, mount: Mount, id: FragmentId) -> bool {
        match mount {
            Mount::InlineFeedback if self.feedback.as_ref().is_some_and(|f| f.id == id) => {
                self.feedback = None;
                true
            }
            Mount::ToastAlert if self.toast.as_ref().is_some_and(|t| t.id == id) => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }
}
