//! Intersection Observer
//!
//! Tracks how much of each observed element is inside the viewport and
//! queues an entry whenever the visible ratio crosses a threshold.

use crate::{DOMRect, NodeId};

/// Intersection observer options
#[derive(Debug, Clone)]
pub struct IntersectionObserverOptions {
    /// Ratios that trigger an entry when crossed
    pub threshold: Vec<f64>,
}

impl Default for IntersectionObserverOptions {
    fn default() -> Self {
        Self {
            threshold: vec![0.0],
        }
    }
}

impl IntersectionObserverOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: vec![threshold],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

#[derive(Debug, Clone, Copy)]
struct LastReport {
    ratio: f64,
    is_intersecting: bool,
}

/// Intersection observer
///
/// Entries are produced in observation order so callbacks run
/// deterministically.
#[derive(Debug)]
pub struct IntersectionObserver {
    options: IntersectionObserverOptions,
    /// Observed targets with their last reported state
    observed: Vec<(NodeId, Option<LastReport>)>,
    pending_entries: Vec<IntersectionObserverEntry>,
}

impl IntersectionObserver {
    pub fn new(mut options: IntersectionObserverOptions) -> Self {
        if options.threshold.is_empty() {
            options.threshold.push(0.0);
        }
        options.threshold.sort_by(f64::total_cmp);
        Self {
            options,
            observed: Vec::new(),
            pending_entries: Vec::new(),
        }
    }

    /// Observe an element (no-op if already observed)
    pub fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.observed.push((target, None));
        }
    }

    /// Stop observing, dropping any queued entries for it
    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(id, _)| *id != target);
        self.pending_entries.retain(|e| e.target != target);
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observed.iter().any(|(id, _)| *id == target)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Check intersections against the viewport.
    ///
    /// `rect_of` yields each target's rect in viewport coordinates, or
    /// None if the element has no layout box (it is then skipped).
    pub fn check_intersections<F>(&mut self, viewport: DOMRect, rect_of: F, time: f64)
    where
        F: Fn(NodeId) -> Option<DOMRect>,
    {
        let thresholds = &self.options.threshold;
        let min = thresholds[0];

        for (node, last) in &mut self.observed {
            let Some(rect) = rect_of(*node) else {
                continue;
            };
            let intersection = rect.intersection(&viewport);
            // A zero-area target that touches the root is fully visible
            let ratio = match intersection {
                Some(i) if rect.area() > 0.0 => i.area() / rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };
            let is_intersecting = intersection.is_some() && ratio >= min;

            let crossed = match *last {
                Some(state) => {
                    state.is_intersecting != is_intersecting
                        || thresholds
                            .iter()
                            .any(|&t| (state.ratio < t) != (ratio < t))
                }
                None => true,
            };
            if !crossed {
                continue;
            }

            *last = Some(LastReport { ratio, is_intersecting });
            self.pending_entries.push(IntersectionObserverEntry {
                target: *node,
                bounding_client_rect: rect,
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds: viewport,
                intersection_ratio: ratio,
                is_intersecting,
                time,
            });
        }
    }

    /// Take pending entries
    pub fn take_entries(&mut self) -> Vec<IntersectionObserverEntry> {
        std::mem::take(&mut self.pending_entries)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: DOMRect = DOMRect {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_first_check_always_reports() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(0.1));
        observer.observe(NodeId(1));
        observer.observe(NodeId(2));

        observer.check_intersections(
            VIEWPORT,
            |id| match id {
                NodeId(1) => Some(DOMRect::from_xywh(0.0, 100.0, 100.0, 100.0)),
                _ => Some(DOMRect::from_xywh(0.0, 2000.0, 100.0, 100.0)),
            },
            0.0,
        );

        let entries = observer.take_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].intersection_ratio, 1.0);
        assert!(!entries[1].is_intersecting);
    }

    #[test]
    fn test_below_threshold_is_not_intersecting() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(0.1));
        observer.observe(NodeId(1));
        // 5px of a 100px-tall element visible
        observer.check_intersections(
            VIEWPORT,
            |_| Some(DOMRect::from_xywh(0.0, 595.0, 100.0, 100.0)),
            0.0,
        );
        let entries = observer.take_entries();
        assert!(!entries[0].is_intersecting);
    }

    #[test]
    fn test_reports_only_on_threshold_crossing() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(0.1));
        observer.observe(NodeId(1));

        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 700.0, 100.0, 100.0)), 0.0);
        assert_eq!(observer.take_entries().len(), 1);

        // Still outside: no new entry
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 650.0, 100.0, 100.0)), 1.0);
        assert!(!observer.has_pending());

        // Crosses 0.1
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 550.0, 100.0, 100.0)), 2.0);
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].time, 2.0);
    }

    #[test]
    fn test_unobserve_drops_pending() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::default());
        observer.observe(NodeId(3));
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0)), 0.0);
        assert!(observer.has_pending());

        observer.unobserve(NodeId(3));
        assert!(!observer.has_pending());
        assert!(!observer.is_observing(NodeId(3)));
    }

    #[test]
    fn test_elements_without_layout_are_skipped() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::default());
        observer.observe(NodeId(4));
        observer.check_intersections(VIEWPORT, |_| None, 0.0);
        assert!(!observer.has_pending());
        assert_eq!(observer.observed_count(), 1);
    }

    #[test]
    fn test_zero_area_target_inside_root_is_fully_visible() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(0.1));
        observer.observe(NodeId(5));
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 100.0, 800.0, 0.0)), 0.0);
        let entries = observer.take_entries();
        assert_eq!(entries[0].intersection_ratio, 1.0);
        assert!(entries[0].is_intersecting);

        // Leaving the viewport is a crossing
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 900.0, 800.0, 0.0)), 1.0);
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);
        assert_eq!(entries[0].intersection_ratio, 0.0);
    }

    #[test]
    fn test_edge_adjacent_target_is_not_visible_enough() {
        let mut observer = IntersectionObserver::new(IntersectionObserverOptions::with_threshold(0.1));
        observer.observe(NodeId(6));
        // Top edge sits exactly on the viewport's bottom edge
        observer.check_intersections(VIEWPORT, |_| Some(DOMRect::from_xywh(0.0, 600.0, 100.0, 100.0)), 0.0);
        let entries = observer.take_entries();
        assert_eq!(entries[0].intersection_ratio, 0.0);
        assert!(!entries[0].is_intersecting);
    }
}
