//! Site Configuration

use serde::Deserialize;

/// Tunables for the site behaviors
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Header gets `scrolled` when the page is scrolled past this (px)
    pub header_scroll_threshold: f64,

    /// Carousel auto-advance period (ms)
    pub carousel_interval_ms: u64,

    /// Stat counter count-up duration (ms)
    pub counter_duration_ms: f64,

    /// Visible fraction that counts as "in view"
    pub visibility_threshold: f64,

    /// Rendering frame period (ms)
    pub frame_interval_ms: u64,

    /// Duration of smooth `scroll_to` (ms)
    pub smooth_scroll_duration_ms: f64,

    /// Initial viewport width (px)
    pub viewport_width: f64,

    /// Initial viewport height (px)
    pub viewport_height: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_scroll_threshold: 50.0,
            carousel_interval_ms: 5000,
            counter_duration_ms: 2000.0,
            visibility_threshold: 0.1,
            frame_interval_ms: 16, // ~60fps
            smooth_scroll_duration_ms: 300.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}
