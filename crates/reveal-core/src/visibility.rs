//! Visibility geometry and the signal abstraction the sequencer consumes.
//!
//! The sequencer only needs "how much of this container is visible"; where
//! that number comes from is up to the host. [`ScrolledViewport`] derives it
//! from page geometry the way a viewport intersection observer would.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Overlapping region, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Adjustment applied to the viewport before intersecting.
///
/// Positive values grow the viewport (containers trigger earlier), negative
/// values shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub fn bottom(px: f64) -> Self {
        Self {
            bottom: px,
            ..Self::default()
        }
    }

    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn scrolled_to(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    /// Viewport box in page coordinates with `margin` applied.
    pub fn root_box(&self, margin: RootMargin) -> Rect {
        Rect::new(
            -margin.left,
            self.scroll_y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }
}

/// Fraction of `container` inside the margin-adjusted viewport, in [0, 1].
///
/// Zero-area containers report 1.0 when their origin lies inside the root
/// box and 0.0 otherwise.
pub fn intersection_ratio(container: &Rect, viewport: &Viewport, margin: RootMargin) -> f64 {
    let root = viewport.root_box(margin);
    let area = container.area();
    if area <= 0.0 {
        return if root.contains_point(container.x, container.y) {
            1.0
        } else {
            0.0
        };
    }
    container
        .intersection(&root)
        .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Anything that can say how visible a container is.
pub trait VisibilitySource {
    /// Visible fraction of `container`, in [0, 1].
    fn visibility_ratio(&self, container: &Rect) -> f64;
}

/// Geometry-backed visibility: a scrolled viewport plus a root margin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrolledViewport {
    pub viewport: Viewport,
    pub margin: RootMargin,
}

impl ScrolledViewport {
    pub fn new(viewport: Viewport, margin: RootMargin) -> Self {
        Self { viewport, margin }
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }
}

impl VisibilitySource for ScrolledViewport {
    fn visibility_ratio(&self, container: &Rect) -> f64 {
        intersection_ratio(container, &self.viewport, self.margin)
    }
}

/// Fixed ratio for every container; handy for hosts that already know.
impl VisibilitySource for f64 {
    fn visibility_ratio(&self, _container: &Rect) -> f64 {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_inside() {
        let viewport = Viewport::new(1280.0, 800.0);
        let card = Rect::new(100.0, 100.0, 400.0, 300.0);
        assert_eq!(intersection_ratio(&card, &viewport, RootMargin::default()), 1.0);
    }

    #[test]
    fn test_partially_below_fold() {
        let viewport = Viewport::new(1280.0, 800.0);
        let card = Rect::new(0.0, 700.0, 400.0, 400.0);
        let ratio = intersection_ratio(&card, &viewport, RootMargin::default());
        assert!((ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_scrolled_out_of_view() {
        let viewport = Viewport::new(1280.0, 800.0).scrolled_to(2000.0);
        let card = Rect::new(0.0, 100.0, 400.0, 400.0);
        assert_eq!(intersection_ratio(&card, &viewport, RootMargin::default()), 0.0);
    }

    #[test]
    fn test_bottom_margin_triggers_early() {
        let viewport = Viewport::new(1280.0, 800.0);
        // Top edge 40px below the fold.
        let card = Rect::new(0.0, 840.0, 400.0, 20.0);

        assert_eq!(intersection_ratio(&card, &viewport, RootMargin::default()), 0.0);
        let ratio = intersection_ratio(&card, &viewport, RootMargin::bottom(50.0));
        assert!((ratio - 0.5).abs() < 1e-9);
        assert!(ratio >= 0.3);
    }

    #[test]
    fn test_negative_margin_shrinks() {
        let viewport = Viewport::new(1280.0, 800.0);
        let card = Rect::new(0.0, 760.0, 400.0, 40.0);
        assert_eq!(intersection_ratio(&card, &viewport, RootMargin::default()), 1.0);
        assert_eq!(intersection_ratio(&card, &viewport, RootMargin::bottom(-50.0)), 0.0);
    }

    #[test]
    fn test_zero_area_container() {
        let viewport = Viewport::new(1280.0, 800.0);
        let inside = Rect::new(10.0, 10.0, 0.0, 0.0);
        let outside = Rect::new(10.0, 900.0, 0.0, 0.0);
        assert_eq!(intersection_ratio(&inside, &viewport, RootMargin::default()), 1.0);
        assert_eq!(intersection_ratio(&outside, &viewport, RootMargin::default()), 0.0);
    }

    #[test]
    fn test_scrolled_viewport_source() {
        let mut source = ScrolledViewport::new(Viewport::new(1280.0, 800.0), RootMargin::default());
        let card = Rect::new(0.0, 1200.0, 400.0, 400.0);
        assert_eq!(source.visibility_ratio(&card), 0.0);
        source.scroll_to(800.0);
        assert_eq!(source.visibility_ratio(&card), 1.0);
        assert_eq!(0.42_f64.visibility_ratio(&card), 0.42);
    }
}
