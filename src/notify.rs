//! Unread counting and "new posts" aggregation.
//!
//! A poll delivery bumps the source's badge and, when the source is the
//! active one, the banner above the post list.  The new posts themselves are
//! not shown until the banner is dismissed.

use tracing::debug;

use crate::i18n::Translate;
use crate::render::Surface;
use crate::state::{AppState, Post, Update};
use crate::view;

pub fn unread_count(posts: &[Post], source_id: &str) -> usize {
    posts
        .iter()
        .filter(|p| p.source_id == source_id && p.unread)
        .count()
}

/// Apply one delivered update to the surface.
pub fn aggregate(surface: &mut Surface, state: &AppState, update: &Update, i18n: &dyn Translate) {
    let n = update.new_posts.len();
    if n == 0 {
        return;
    }

    if let Some(card) = surface.source_card_mut(&update.source_id) {
        card.bump_badge(n);
    }

    if !state.is_active(&update.source_id) {
        return;
    }
    match &mut surface.banner {
        Some(banner) => banner.count += n,
        None => surface.banner = Some(view::banner::build(n, i18n)),
    }
    debug!(source = %update.source_id, added = n, "banner updated");
}
