//! Image carousel
//!
//! Slides sit side by side in `#sliderContainer`; the visible one is chosen
//! by translating the container by `-index * 100%`. One `.dot` per slide is
//! built at startup and mirrors the index.

use vitrine_dom::{Document, NodeId};

use crate::event_loop::{EventLoop, Task};
use crate::{SiteError, SiteResult};

/// Carousel state and controls
#[derive(Debug)]
pub struct Carousel {
    container: NodeId,
    prev: NodeId,
    next: NodeId,
    dots: Vec<NodeId>,
    slide_count: usize,
    index: usize,
    interval_ms: u64,
    timer: Option<u32>,
}

impl Carousel {
    /// Locate the carousel markup and build its dots
    pub fn new(doc: &mut Document, interval_ms: u64) -> SiteResult<Self> {
        let container = doc
            .get_element_by_id("sliderContainer")
            .ok_or_else(|| SiteError::missing("#sliderContainer"))?;
        let prev = doc
            .first_by_class("slider-prev")
            .ok_or_else(|| SiteError::missing(".slider-prev"))?;
        let next = doc
            .first_by_class("slider-next")
            .ok_or_else(|| SiteError::missing(".slider-next"))?;
        let dot_container = doc
            .get_element_by_id("sliderDots")
            .ok_or_else(|| SiteError::missing("#sliderDots"))?;
        let slide_count = doc.get_elements_by_class_name("slide").len();

        let mut dots = Vec::with_capacity(slide_count);
        for i in 0..slide_count {
            let dot = doc.append_new_element(dot_container, "span")?;
            doc.add_class(dot, "dot")?;
            if i == 0 {
                doc.add_class(dot, "active")?;
            }
            dots.push(dot);
        }
        tracing::debug!("Carousel with {} slides", slide_count);

        Ok(Self {
            container,
            prev,
            next,
            dots,
            slide_count,
            index: 0,
            interval_ms,
            timer: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slide_count
    }

    pub fn is_empty(&self) -> bool {
        self.slide_count == 0
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    pub fn prev_control(&self) -> NodeId {
        self.prev
    }

    pub fn next_control(&self) -> NodeId {
        self.next
    }

    /// Advance one slide, wrapping to the first
    pub fn next(&mut self, doc: &mut Document) -> SiteResult<()> {
        if self.slide_count > 0 {
            self.index = (self.index + 1) % self.slide_count;
        }
        self.render(doc)
    }

    /// Go back one slide, wrapping to the last
    pub fn prev(&mut self, doc: &mut Document) -> SiteResult<()> {
        if self.slide_count > 0 {
            self.index = (self.index + self.slide_count - 1) % self.slide_count;
        }
        self.render(doc)
    }

    /// Jump to a slide (dot click)
    pub fn go_to(&mut self, doc: &mut Document, index: usize) -> SiteResult<()> {
        if index >= self.slide_count {
            return Err(SiteError::SlideOutOfRange {
                index,
                count: self.slide_count,
            });
        }
        self.index = index;
        self.render(doc)
    }

    fn render(&self, doc: &mut Document) -> SiteResult<()> {
        let offset = -(self.index as i64) * 100;
        doc.set_style_property(self.container, "transform", &format!("translateX({offset}%)"))?;
        for (i, &dot) in self.dots.iter().enumerate() {
            doc.toggle_class(dot, "active", Some(i == self.index))?;
        }
        tracing::trace!("Carousel at slide {}", self.index);
        Ok(())
    }

    /// Start auto-advance. Restarting replaces the previous timer.
    pub fn start(&mut self, event_loop: &mut EventLoop) -> u32 {
        self.stop(event_loop);
        let id = event_loop.set_interval(Task::CarouselAutoAdvance, self.interval_ms);
        self.timer = Some(id);
        id
    }

    /// Stop auto-advance. Returns true if it was running.
    pub fn stop(&mut self, event_loop: &mut EventLoop) -> bool {
        self.timer
            .take()
            .is_some_and(|id| event_loop.clear_timer(id))
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}
