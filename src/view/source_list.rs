use crate::notify::unread_count;
use crate::state::{AppState, SourceId};

/// What one entry of the source list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCard {
    pub id: SourceId,
    pub title: String,
    pub description: String,
    /// Unread counter; absent when there is nothing unread.
    pub badge: Option<usize>,
    pub active: bool,
}

impl SourceCard {
    /// Add `n` to the badge, creating it if absent.
    pub fn bump_badge(&mut self, n: usize) {
        self.badge = Some(self.badge.unwrap_or(0) + n);
    }

    /// Show `count` on the badge, dropping it at zero.
    pub fn set_badge(&mut self, count: usize) {
        self.badge = (count > 0).then_some(count);
    }
}

pub fn build(state: &AppState) -> Vec<SourceCard> {
    state
        .sources
        .iter()
        .map(|source| {
            let mut card = SourceCard {
                id: source.id.clone(),
                title: source.title.clone(),
                description: source.description.clone(),
                badge: None,
                active: state.is_active(&source.id),
            };
            card.set_badge(unread_count(&state.posts, &source.id));
            card
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::{sample_state, with_read};

    #[test]
    fn marks_active_card() {
        let state = sample_state();
        let cards = build(&state);
        assert_eq!(cards.len(), 2);
        assert!(cards[0].active);
        assert!(!cards[1].active);
    }

    #[test]
    fn badge_is_live_unread_count() {
        let state = sample_state();
        let cards = build(&state);
        assert_eq!(cards[0].badge, Some(2));
        assert_eq!(cards[1].badge, Some(1));
    }

    #[test]
    fn badge_absent_when_everything_read() {
        let state = with_read(sample_state(), &["p1", "p2"]);
        let cards = build(&state);
        assert_eq!(cards[0].badge, None);
    }

    #[test]
    fn bump_creates_missing_badge() {
        let mut card = build(&with_read(sample_state(), &["p1", "p2"])).remove(0);
        card.bump_badge(3);
        assert_eq!(card.badge, Some(3));
        card.bump_badge(1);
        assert_eq!(card.badge, Some(4));
    }
}
