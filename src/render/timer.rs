//! Deferred dismissal of transient fragments.
//!
//! Time is virtual: the main loop feeds elapsed wall time in through
//! [`Timers::advance`], tests feed whatever they like.

use std::time::Duration;

use super::surface::{FragmentId, Mount};

/// How long success feedback and error toasts stay up.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dismiss {
    pub mount: Mount,
    pub id: FragmentId,
}

#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    pending: Vec<(Duration, Dismiss)>,
}

impl Timers {
    pub fn schedule(&mut self, after: Duration, dismiss: Dismiss) {
        self.pending.push((self.now + after, dismiss));
    }

    /// Move the clock forward and return every dismissal now due, oldest
    /// deadline first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Dismiss> {
        self.now += elapsed;
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, dismiss)| dismiss).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
