use crate::i18n::Translate;
use crate::state::{Post, PostId};

use super::post_list::plain_text;

/// Full view of one post, opened by the "view" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post_id: PostId,
    pub title: String,
    pub body: String,
    pub link: String,
    pub open_hint: String,
    pub close_hint: String,
}

pub fn build(post: &Post, i18n: &dyn Translate) -> PostDetail {
    PostDetail {
        post_id: post.id.clone(),
        title: post.title.clone(),
        body: plain_text(&post.description),
        link: post.link.clone(),
        open_hint: i18n.translate("detail.open"),
        close_hint: i18n.translate("detail.close"),
    }
}
