//! Presentation builders.
//!
//! Pure functions from [`AppState`](crate::state::AppState) (plus a
//! [`Translate`]) to plain display data.  Nothing here knows about the
//! terminal; [`crate::ui`] turns these values into widgets.

pub mod banner;
pub mod detail;
pub mod post_list;
pub mod source_list;

pub use banner::Banner;
pub use detail::PostDetail;
pub use post_list::PostCard;
pub use source_list::SourceCard;

use crate::i18n::Translate;

/// Fixed strings of the chrome around the lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub app_title: String,
    pub form_title: String,
    pub placeholder: String,
    pub submit: String,
    pub loading: String,
    pub start_prompt: String,
    pub sources_title: String,
    pub posts_title: String,
    pub delete: String,
    pub help: String,
}

pub fn labels(i18n: &dyn Translate) -> Labels {
    Labels {
        app_title: i18n.translate("app.title"),
        form_title: i18n.translate("form.title"),
        placeholder: i18n.translate("form.placeholder"),
        submit: i18n.translate("form.submit"),
        loading: i18n.translate("form.loading"),
        start_prompt: i18n.translate("start.prompt"),
        sources_title: i18n.translate("sources.title"),
        posts_title: i18n.translate("posts.title"),
        delete: i18n.translate("sources.delete"),
        help: i18n.translate("status.help"),
    }
}
