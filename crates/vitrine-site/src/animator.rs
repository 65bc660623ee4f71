//! Visibility-triggered animations
//!
//! `.fade-in` elements get `visible` and `.stat-number` elements count up
//! from zero the first time they scroll into view. Every element is
//! unobserved on its first trigger, so nothing replays.

use std::collections::HashMap;

use vitrine_dom::{DOMRect, Document, IntersectionObserver, IntersectionObserverOptions, NodeId};

use crate::event_loop::{EventLoop, Task};
use crate::{SiteError, SiteResult};

/// Attribute holding a stat counter's final value
pub const COUNTER_TARGET_ATTR: &str = "data-target";

/// How a counter renders its live value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFormat {
    Percent,
    Plus,
    Plain,
}

impl CounterFormat {
    /// Infer from the element's text before the count-up starts
    pub fn infer(initial_text: &str) -> Self {
        if initial_text.contains('%') {
            Self::Percent
        } else if initial_text.contains('+') {
            Self::Plus
        } else {
            Self::Plain
        }
    }

    pub fn render(self, value: i64) -> String {
        match self {
            Self::Percent => format!("{value}%"),
            Self::Plus => format!("{value}+"),
            Self::Plain => value.to_string(),
        }
    }
}

/// In-flight count-up
#[derive(Debug, Clone)]
struct CountUp {
    target: i64,
    format: CounterFormat,
    start: Option<f64>,
}

/// What a visibility check triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FadeIn(NodeId),
    Counter(NodeId),
}

/// Parse like `parseInt(s, 10)`: leading whitespace, optional sign, then
/// as many digits as are present.
pub fn parse_counter_target(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Drives fade-ins and stat counters
#[derive(Debug)]
pub struct VisibilityAnimator {
    observer: IntersectionObserver,
    counters: HashMap<NodeId, CountUp>,
    duration_ms: f64,
}

impl VisibilityAnimator {
    /// Observe every `.fade-in`, then every `.stat-number`
    pub fn new(doc: &Document, threshold: f64, duration_ms: f64) -> Self {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(threshold));
        let fade_ins = doc.get_elements_by_class_name("fade-in");
        let stats = doc.get_elements_by_class_name("stat-number");
        for &el in fade_ins.iter().chain(&stats) {
            observer.observe(el);
        }
        tracing::debug!("Observing {} fade-ins and {} counters", fade_ins.len(), stats.len());

        Self {
            observer,
            counters: HashMap::new(),
            duration_ms,
        }
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observer.is_observing(node)
    }

    /// Number of count-ups still running
    pub fn running_counters(&self) -> usize {
        self.counters.len()
    }

    /// Update intersections and fire one-shot animations.
    ///
    /// `rect_of` gives element rects in viewport coordinates. A counter
    /// with an unparseable target is unobserved, logged and skipped.
    pub fn check<F>(
        &mut self,
        doc: &mut Document,
        viewport: DOMRect,
        rect_of: F,
        time: f64,
        event_loop: &mut EventLoop,
    ) -> SiteResult<Vec<Trigger>>
    where
        F: Fn(NodeId) -> Option<DOMRect>,
    {
        self.observer.check_intersections(viewport, rect_of, time);
        let mut triggered = Vec::new();

        for entry in self.observer.take_entries() {
            if !entry.is_intersecting {
                continue;
            }
            let target = entry.target;

            if doc.has_class(target, "fade-in") {
                doc.add_class(target, "visible")?;
                self.observer.unobserve(target);
                triggered.push(Trigger::FadeIn(target));
            }

            if doc.has_class(target, "stat-number") {
                self.observer.unobserve(target);
                match self.start_counter(doc, target, event_loop) {
                    Ok(()) => triggered.push(Trigger::Counter(target)),
                    Err(e) => tracing::warn!("Counter not started: {}", e),
                }
            }
        }

        Ok(triggered)
    }

    fn start_counter(&mut self, doc: &Document, node: NodeId, event_loop: &mut EventLoop) -> SiteResult<()> {
        let raw = doc.get_attribute(node, COUNTER_TARGET_ATTR).unwrap_or_default();
        let target = parse_counter_target(&raw).ok_or(SiteError::InvalidCounterTarget { node, value: raw })?;
        let format = CounterFormat::infer(&doc.text_content(node));

        tracing::debug!("Counting {} up to {}", node, target);
        self.counters.insert(
            node,
            CountUp {
                target,
                format,
                start: None,
            },
        );
        event_loop.request_animation_frame(Task::CounterFrame(node));
        Ok(())
    }

    /// One animation frame of a count-up
    pub fn on_frame(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        timestamp: f64,
        event_loop: &mut EventLoop,
    ) -> SiteResult<()> {
        let Some(counter) = self.counters.get_mut(&node) else {
            return Ok(());
        };

        let start = *counter.start.get_or_insert(timestamp);
        let progress = if self.duration_ms > 0.0 {
            ((timestamp - start) / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let value = (progress * counter.target as f64).floor() as i64;
        let text = counter.format.render(value);

        if progress < 1.0 {
            event_loop.request_animation_frame(Task::CounterFrame(node));
        } else {
            self.counters.remove(&node);
        }
        doc.set_text_content(node, &text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counter_target() {
        assert_eq!(parse_counter_target("250"), Some(250));
        assert_eq!(parse_counter_target("  98%"), Some(98));
        assert_eq!(parse_counter_target("-12px"), Some(-12));
        assert_eq!(parse_counter_target("+7"), Some(7));
        assert_eq!(parse_counter_target("abc"), None);
        assert_eq!(parse_counter_target(""), None);
        assert_eq!(parse_counter_target("-"), None);
    }

    #[test]
    fn test_format_inference() {
        assert_eq!(CounterFormat::infer("0%"), CounterFormat::Percent);
        assert_eq!(CounterFormat::infer("0+"), CounterFormat::Plus);
        assert_eq!(CounterFormat::infer("+%"), CounterFormat::Percent);
        assert_eq!(CounterFormat::infer("0"), CounterFormat::Plain);
        assert_eq!(CounterFormat::Plus.render(250), "250+");
        assert_eq!(CounterFormat::Plain.render(-3), "-3");
    }

    fn run_to_end(doc: &mut Document, animator: &mut VisibilityAnimator, event_loop: &mut EventLoop) -> Vec<String> {
        let node = doc.first_by_class("stat-number").unwrap();
        let mut seen = Vec::new();
        while let Some(step) = event_loop.poll(10_000) {
            if let crate::event_loop::Step::Frame { timestamp, callbacks } = step {
                for task in callbacks {
                    if let Task::CounterFrame(n) = task {
                        animator.on_frame(doc, n, timestamp, event_loop).unwrap();
                        seen.push(doc.text_content(node));
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_count_up_reaches_target() {
        let mut doc = vitrine_html::parse(r#"<span class="stat-number" data-target="250">0+</span>"#).unwrap();
        let mut animator = VisibilityAnimator::new(&doc, 0.1, 2000.0);
        let mut event_loop = EventLoop::new(16);
        let node = doc.first_by_class("stat-number").unwrap();

        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let triggered = animator
            .check(&mut doc, viewport, |_| Some(DOMRect::from_xywh(0.0, 0.0, 50.0, 20.0)), 0.0, &mut event_loop)
            .unwrap();
        assert_eq!(triggered, vec![Trigger::Counter(node)]);
        assert!(!animator.is_observing(node));

        let seen = run_to_end(&mut doc, &mut animator, &mut event_loop);
        assert_eq!(seen.first().map(String::as_str), Some("0+"));
        assert_eq!(seen.last().map(String::as_str), Some("250+"));
        assert_eq!(animator.running_counters(), 0);

        // Monotonic
        let values: Vec<i64> = seen.iter().map(|s| parse_counter_target(s).unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_invalid_target_is_skipped_but_unobserved() {
        let mut doc = vitrine_html::parse(r#"<span class="stat-number" data-target="lots">0</span>"#).unwrap();
        let mut animator = VisibilityAnimator::new(&doc, 0.1, 2000.0);
        let mut event_loop = EventLoop::new(16);
        let node = doc.first_by_class("stat-number").unwrap();

        let triggered = animator
            .check(
                &mut doc,
                DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0),
                |_| Some(DOMRect::from_xywh(0.0, 0.0, 50.0, 20.0)),
                0.0,
                &mut event_loop,
            )
            .unwrap();
        assert!(triggered.is_empty());
        assert!(!animator.is_observing(node));
        assert!(!event_loop.has_pending_work());
        assert_eq!(doc.text_content(node), "0");
    }
}
