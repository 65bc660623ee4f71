//! Window and scrolling
//!
//! Viewport size and scroll offset, including smooth scrolling animated one
//! frame at a time.

use vitrine_dom::DOMRect;

/// Scroll behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
    Instant,
}

/// Scroll options
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollToOptions {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub behavior: ScrollBehavior,
}

impl ScrollToOptions {
    /// Smooth scroll to the top of the page
    pub fn smooth_top() -> Self {
        Self {
            top: Some(0.0),
            left: None,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SmoothScroll {
    from: (f64, f64),
    to: (f64, f64),
    elapsed: f64,
}

/// Browser window
#[derive(Debug)]
pub struct Window {
    width: f64,
    height: f64,
    scroll_x: f64,
    scroll_y: f64,
    smooth: Option<SmoothScroll>,
    smooth_duration: f64,
}

impl Window {
    pub fn new(width: f64, height: f64, smooth_duration_ms: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            smooth: None,
            smooth_duration: smooth_duration_ms.max(0.0),
        }
    }

    /// `window.scrollY`
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Viewport in viewport coordinates
    pub fn viewport(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, self.width, self.height)
    }

    /// Map a document-space rect into viewport coordinates
    pub fn to_viewport(&self, rect: DOMRect) -> DOMRect {
        rect.translate(-self.scroll_x, -self.scroll_y)
    }

    pub fn is_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Scroll to a position.
    ///
    /// Returns true when the offset changed immediately (the caller fires a
    /// scroll event). Smooth scrolls start an animation driven by `step`.
    pub fn scroll_to(&mut self, options: ScrollToOptions) -> bool {
        let target = (
            options.left.unwrap_or(self.scroll_x).max(0.0),
            options.top.unwrap_or(self.scroll_y).max(0.0),
        );

        match options.behavior {
            ScrollBehavior::Smooth if self.smooth_duration > 0.0 => {
                if target == (self.scroll_x, self.scroll_y) {
                    self.smooth = None;
                    return false;
                }
                self.smooth = Some(SmoothScroll {
                    from: (self.scroll_x, self.scroll_y),
                    to: target,
                    elapsed: 0.0,
                });
                false
            }
            _ => {
                self.smooth = None;
                let changed = target != (self.scroll_x, self.scroll_y);
                (self.scroll_x, self.scroll_y) = target;
                changed
            }
        }
    }

    /// Advance a smooth scroll by one frame. Returns true if the offset moved.
    pub fn step(&mut self, delta_ms: f64) -> bool {
        let Some(mut anim) = self.smooth else {
            return false;
        };

        anim.elapsed += delta_ms;
        let progress = (anim.elapsed / self.smooth_duration).min(1.0);
        // Ease-out cubic
        let t = 1.0 - (1.0 - progress).powi(3);

        let before = (self.scroll_x, self.scroll_y);
        if progress >= 1.0 {
            (self.scroll_x, self.scroll_y) = anim.to;
            self.smooth = None;
        } else {
            self.scroll_x = anim.from.0 + (anim.to.0 - anim.from.0) * t;
            self.scroll_y = anim.from.1 + (anim.to.1 - anim.from.1) * t;
            self.smooth = Some(anim);
        }
        before != (self.scroll_x, self.scroll_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_scroll() {
        let mut window = Window::new(800.0, 600.0, 300.0);
        assert!(window.scroll_to(ScrollToOptions {
            top: Some(120.0),
            ..Default::default()
        }));
        assert_eq!(window.scroll_y(), 120.0);
        // Same position: nothing to report
        assert!(!window.scroll_to(ScrollToOptions {
            top: Some(120.0),
            ..Default::default()
        }));
    }

    #[test]
    fn test_negative_offset_clamps() {
        let mut window = Window::new(800.0, 600.0, 300.0);
        window.scroll_to(ScrollToOptions {
            top: Some(-40.0),
            ..Default::default()
        });
        assert_eq!(window.scroll_y(), 0.0);
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let mut window = Window::new(800.0, 600.0, 300.0);
        window.scroll_to(ScrollToOptions {
            top: Some(900.0),
            ..Default::default()
        });

        assert!(!window.scroll_to(ScrollToOptions::smooth_top()));
        assert!(window.is_scrolling());

        assert!(window.step(16.0));
        let mid = window.scroll_y();
        assert!(mid > 0.0 && mid < 900.0);

        while window.is_scrolling() {
            window.step(16.0);
        }
        assert_eq!(window.scroll_y(), 0.0);
        assert!(!window.step(16.0));
    }

    #[test]
    fn test_smooth_scroll_to_current_position_is_noop() {
        let mut window = Window::new(800.0, 600.0, 300.0);
        assert!(!window.scroll_to(ScrollToOptions::smooth_top()));
        assert!(!window.is_scrolling());
    }

    #[test]
    fn test_to_viewport() {
        let mut window = Window::new(800.0, 600.0, 0.0);
        window.scroll_to(ScrollToOptions {
            top: Some(500.0),
            behavior: ScrollBehavior::Smooth,
            ..Default::default()
        });
        // Zero duration makes smooth scrolls instant
        assert_eq!(window.scroll_y(), 500.0);
        let rect = window.to_viewport(DOMRect::from_xywh(0.0, 700.0, 10.0, 10.0));
        assert_eq!(rect.top(), 200.0);
    }
}
