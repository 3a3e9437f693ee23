//! Scroll-scrubbed values.
//!
//! Unlike a reveal, a scrub has no clock: its value is a pure function of the
//! scroll position, so scrolling back up runs it backwards.

use serde::{Deserialize, Serialize};

/// Linear mapping from a scroll range onto a value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollScrub {
    /// Scroll offset where the value equals `from`.
    pub start: f64,
    /// Scroll offset where the value reaches `to`.
    pub end: f64,
    pub from: f64,
    pub to: f64,
}

impl ScrollScrub {
    pub fn new(start: f64, end: f64, from: f64, to: f64) -> Self {
        Self {
            start,
            end,
            from,
            to,
        }
    }

    /// One full turn over the page's scroll range.
    ///
    /// The page's bottom can only get as close to the top of the viewport
    /// as the deepest scroll offset allows, so the turn completes there.
    pub fn gear_rotation(document_height: f64, viewport_height: f64) -> Self {
        let max_scroll = (document_height - viewport_height).max(0.0);
        Self::new(0.0, max_scroll, 0.0, 360.0)
    }

    /// Linear progress through the scroll range, in [0, 1].
    pub fn progress(&self, scroll_y: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, scroll_y: f64) -> f64 {
        self.from + (self.to - self.from) * self.progress(scroll_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gear_rotation() {
        let gear = ScrollScrub::gear_rotation(4800.0, 800.0);
        assert_eq!(gear.value_at(0.0), 0.0);
        assert_eq!(gear.value_at(2000.0), 180.0);
        assert_eq!(gear.value_at(4000.0), 360.0);
        assert_eq!(gear.value_at(4800.0), 360.0);
    }

    #[test]
    fn test_clamped_outside_range() {
        let scrub = ScrollScrub::new(100.0, 300.0, 1.0, 0.0);
        assert_eq!(scrub.value_at(-50.0), 1.0);
        assert_eq!(scrub.value_at(200.0), 0.5);
        assert_eq!(scrub.value_at(9000.0), 0.0);
    }

    #[test]
    fn test_reversible() {
        let gear = ScrollScrub::gear_rotation(1800.0, 800.0);
        let down = gear.value_at(750.0);
        let up = gear.value_at(250.0);
        assert!(up < down);
        assert_eq!(gear.value_at(750.0), down);
    }

    #[test]
    fn test_empty_range_snaps() {
        let scrub = ScrollScrub::new(50.0, 50.0, 0.0, 10.0);
        assert_eq!(scrub.value_at(49.0), 0.0);
        assert_eq!(scrub.value_at(50.0), 10.0);
        assert_eq!(ScrollScrub::gear_rotation(600.0, 800.0).value_at(0.0), 360.0);
    }
}
