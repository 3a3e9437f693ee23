//! Runtime state for a fade-in item.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::easing::EasingFunction;

/// One-way visibility flag plus the moment it flipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FadeState {
    shown_at: Option<Duration>,
}

impl FadeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.shown_at.is_some()
    }

    pub fn shown_at(&self) -> Option<Duration> {
        self.shown_at
    }

    /// Mark visible at `now`. Returns `false` if it already was; the first
    /// timestamp is kept.
    pub fn show(&mut self, now: Duration) -> bool {
        if self.shown_at.is_some() {
            return false;
        }
        self.shown_at = Some(now);
        true
    }

    /// Opacity at `now` for a fade of the given length.
    pub fn opacity(&self, now: Duration, duration: Duration, easing: EasingFunction) -> f64 {
        match self.shown_at {
            None => 0.0,
            Some(start) => transition_progress(start, now, duration, easing),
        }
    }
}

/// Eased progress of a transition that started at `start`.
pub(crate) fn transition_progress(
    start: Duration,
    now: Duration,
    duration: Duration,
    easing: EasingFunction,
) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    easing.evaluate(elapsed.as_secs_f64() / duration.as_secs_f64())
}
