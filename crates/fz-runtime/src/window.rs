//! Window
//!
//! Viewport size, vertical scroll position and smooth scrolling.

use fz_dom::DOMRect;

/// `scrollIntoView` / `scrollTo` behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// Smooth scroll with exponential ease-out.
///
/// The remaining distance to the target decays by `speed` each frame until
/// it is under half a pixel, then snaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScroll {
    target: f64,
    /// Signed distance still to travel (current - target)
    offset: f64,
    speed: f64,
}

impl SmoothScroll {
    pub fn new(from: f64, target: f64, speed: f64) -> Self {
        Self {
            target,
            offset: from - target,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Advance one frame, returning the new position
    pub fn tick(&mut self) -> f64 {
        self.offset *= 1.0 - self.speed;
        if self.offset.abs() < 0.5 {
            self.offset = 0.0;
        }
        self.target + self.offset
    }

    pub fn is_settled(&self) -> bool {
        self.offset == 0.0
    }
}

/// Browser window state
#[derive(Debug, Clone)]
pub struct Window {
    inner_width: f64,
    inner_height: f64,
    scroll_y: f64,
    /// Total document height once laid out
    document_height: Option<f64>,
    supports_intersection_observer: bool,
    smooth: Option<SmoothScroll>,
    smooth_speed: f64,
}

impl Window {
    pub fn new(inner_width: f64, inner_height: f64) -> Self {
        Self {
            inner_width,
            inner_height,
            scroll_y: 0.0,
            document_height: None,
            supports_intersection_observer: true,
            smooth: None,
            smooth_speed: 0.25,
        }
    }

    /// Disable `IntersectionObserver`, as on old engines
    pub fn without_intersection_observer(mut self) -> Self {
        self.supports_intersection_observer = false;
        self
    }

    pub fn with_smooth_speed(mut self, speed: f64) -> Self {
        self.smooth_speed = speed;
        self
    }

    pub fn inner_width(&self) -> f64 {
        self.inner_width
    }

    pub fn inner_height(&self) -> f64 {
        self.inner_height
    }

    /// `window.scrollY`
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn supports_intersection_observer(&self) -> bool {
        self.supports_intersection_observer
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = Some(height);
    }

    /// Largest reachable scroll offset, if the document was laid out
    pub fn max_scroll(&self) -> Option<f64> {
        self.document_height.map(|h| (h - self.inner_height).max(0.0))
    }

    /// Viewport in client coordinates
    pub fn viewport(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, self.inner_width, self.inner_height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner_width = width;
        self.inner_height = height;
        self.scroll_y = self.clamp(self.scroll_y);
    }

    fn clamp(&self, y: f64) -> f64 {
        let y = y.max(0.0);
        match self.max_scroll() {
            Some(max) => y.min(max),
            None => y,
        }
    }

    /// Jump to `y`, cancelling any smooth scroll. Returns true if the
    /// position changed.
    pub fn scroll_to(&mut self, y: f64) -> bool {
        self.smooth = None;
        let y = self.clamp(y);
        let changed = y != self.scroll_y;
        self.scroll_y = y;
        changed
    }

    /// Start a smooth scroll towards `y`
    pub fn smooth_scroll_to(&mut self, y: f64) {
        let target = self.clamp(y);
        if target == self.scroll_y {
            self.smooth = None;
            return;
        }
        self.smooth = Some(SmoothScroll::new(self.scroll_y, target, self.smooth_speed));
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Advance a running smooth scroll by one frame. Returns true if the
    /// position changed.
    pub fn step_smooth_scroll(&mut self) -> bool {
        let Some(smooth) = self.smooth.as_mut() else {
            return false;
        };
        let y = smooth.tick();
        if smooth.is_settled() {
            self.smooth = None;
        }
        let changed = y != self.scroll_y;
        self.scroll_y = y;
        changed
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamped_to_document() {
        let mut window = Window::new(800.0, 600.0);
        assert!(window.scroll_to(5000.0));
        assert_eq!(window.scroll_y(), 5000.0);

        window.set_document_height(1000.0);
        window.scroll_to(5000.0);
        assert_eq!(window.scroll_y(), 400.0);
        window.scroll_to(-20.0);
        assert_eq!(window.scroll_y(), 0.0);
    }

    #[test]
    fn test_smooth_scroll_settles_on_target() {
        let mut window = Window::new(800.0, 600.0);
        window.smooth_scroll_to(1200.0);

        let mut frames = 0;
        let mut last = 0.0;
        while window.is_smooth_scrolling() {
            assert!(window.step_smooth_scroll());
            assert!(window.scroll_y() > last);
            last = window.scroll_y();
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(window.scroll_y(), 1200.0);
        assert!(frames > 1);
    }

    #[test]
    fn test_jump_cancels_smooth_scroll() {
        let mut window = Window::new(800.0, 600.0);
        window.smooth_scroll_to(900.0);
        window.scroll_to(10.0);
        assert!(!window.is_smooth_scrolling());
        assert!(!window.step_smooth_scroll());
    }
}
