use crate::i18n::Translate;
use crate::state::{AppState, Post, PostId};

/// Characters of description shown on a card before the ellipsis.
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub preview: String,
    pub unread: bool,
    /// "new" marker, only on unread cards.
    pub new_label: Option<String>,
    pub view_label: String,
    /// Only unread cards offer an explicit "mark as read" action.
    pub mark_read_label: Option<String>,
}

impl PostCard {
    pub fn from_post(post: &Post, i18n: &dyn Translate) -> Self {
        let mut card = Self {
            id: post.id.clone(),
            title: post.title.clone(),
            preview: preview(&post.description),
            unread: false,
            new_label: None,
            view_label: i18n.translate("post.view"),
            mark_read_label: None,
        };
        if post.unread {
            card.unread = true;
            card.new_label = Some(i18n.translate("post.new"));
            card.mark_read_label = Some(i18n.translate("post.markAsRead"));
        }
        card
    }

    /// Drop the unread styling and the mark-read action.
    pub fn mark_read(&mut self) {
        self.unread = false;
        self.new_label = None;
        self.mark_read_label = None;
    }
}

/// Cards for the posts of the active source; empty when none is active.
pub fn build(state: &AppState, i18n: &dyn Translate) -> Vec<PostCard> {
    state
        .active_posts()
        .map(|post| PostCard::from_post(post, i18n))
        .collect()
}

fn preview(description: &str) -> String {
    let text = plain_text(description);
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{head} ...")
}

/// Strip markup tags, decode character references and collapse whitespace.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the XML entities, `&nbsp;` and numeric references.  Anything
/// unrecognised is left as written.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| entity(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
