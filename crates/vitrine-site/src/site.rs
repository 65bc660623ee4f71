//! Site runtime
//!
//! Owns the document, window and event loop, wires every behavior at load
//! (the DOMContentLoaded handler) and turns host input into DOM events,
//! timer ticks and rendering frames.

use std::collections::HashMap;

use vitrine_dom::{DOMRect, Document, Event, EventDispatcher, EventType, NodeId};

use crate::animator::{Trigger, VisibilityAnimator};
use crate::carousel::Carousel;
use crate::config::SiteConfig;
use crate::event_loop::{EventLoop, Step, Task};
use crate::form::{FormValidator, ValidationReport};
use crate::header::HeaderScrollEffect;
use crate::mobile_menu::MobileMenuToggle;
use crate::navigator::{Navigator, PAGE_TARGET_ATTR};
use crate::window::{ScrollToOptions, Window};
use crate::SiteResult;

/// Registered event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listener {
    /// Navigate to the listener node's `data-page`
    ShowPage,
    ToggleMenu,
    HeaderScroll,
    CarouselPrev,
    CarouselNext,
    CarouselDot(usize),
    SubmitContact,
}

/// A running page
#[derive(Debug)]
pub struct Site {
    document: Document,
    window: Window,
    event_loop: EventLoop,
    config: SiteConfig,
    listeners: Vec<(NodeId, EventType, Listener)>,
    /// Host-supplied layout boxes in document coordinates
    layout: HashMap<NodeId, DOMRect>,

    navigator: Navigator,
    menu: MobileMenuToggle,
    header: HeaderScrollEffect,
    carousel: Carousel,
    animator: VisibilityAnimator,
    form: FormValidator,
    last_report: Option<ValidationReport>,
}

impl Site {
    /// Parse markup and start the page with default settings
    pub fn load(html: &str) -> SiteResult<Self> {
        Self::load_with_config(html, SiteConfig::default())
    }

    pub fn load_with_config(html: &str, config: SiteConfig) -> SiteResult<Self> {
        let document = vitrine_html::parse(html)?;
        Self::from_document(document, config)
    }

    /// Wire all behaviors onto an existing document.
    ///
    /// Fails if any required element is missing from the markup.
    pub fn from_document(mut document: Document, config: SiteConfig) -> SiteResult<Self> {
        let menu = MobileMenuToggle::new(&document)?;
        let navigator = Navigator::new(&document, menu);
        let header = HeaderScrollEffect::new(&document, config.header_scroll_threshold)?;
        let carousel = Carousel::new(&mut document, config.carousel_interval_ms)?;
        let animator = VisibilityAnimator::new(
            &document,
            config.visibility_threshold,
            config.counter_duration_ms,
        );
        let form = FormValidator::new(&document)?;

        let mut listeners = Vec::new();
        for target in Navigator::page_targets(&document) {
            listeners.push((target, EventType::Click, Listener::ShowPage));
        }
        listeners.push((menu.button(), EventType::Click, Listener::ToggleMenu));
        listeners.push((NodeId::ROOT, EventType::Scroll, Listener::HeaderScroll));
        listeners.push((carousel.prev_control(), EventType::Click, Listener::CarouselPrev));
        listeners.push((carousel.next_control(), EventType::Click, Listener::CarouselNext));
        for (i, &dot) in carousel.dots().iter().enumerate() {
            listeners.push((dot, EventType::Click, Listener::CarouselDot(i)));
        }
        listeners.push((form.form(), EventType::Submit, Listener::SubmitContact));

        let mut site = Self {
            window: Window::new(
                config.viewport_width,
                config.viewport_height,
                config.smooth_scroll_duration_ms,
            ),
            event_loop: EventLoop::new(config.frame_interval_ms),
            document,
            config,
            listeners,
            layout: HashMap::new(),
            navigator,
            menu,
            header,
            carousel,
            animator,
            form,
            last_report: None,
        };
        site.carousel.start(&mut site.event_loop);
        site.dispatch_event(Event::content_loaded())?;

        tracing::info!(
            "Site ready: {:?}, {} pages, {} slides, {} listeners",
            site.document.title(),
            site.navigator.pages().len(),
            site.carousel.len(),
            site.listeners.len()
        );
        Ok(site)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn animator(&self) -> &VisibilityAnimator {
        &self.animator
    }

    /// Outcome of the most recent contact-form submit
    pub fn last_validation(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    /// Virtual time since load (ms)
    pub fn now(&self) -> u64 {
        self.event_loop.current_time()
    }

    /// Stop the carousel timer (teardown)
    pub fn stop_carousel(&mut self) -> bool {
        self.carousel.stop(&mut self.event_loop)
    }

    // ------------------------------------------------------------------
    // Host input
    // ------------------------------------------------------------------

    /// Click an element. Returns false if a handler prevented the default.
    pub fn click(&mut self, target: NodeId) -> SiteResult<bool> {
        let event = Event::click(target).at(self.now() as f64);
        self.dispatch_event(event)
    }

    /// Click the element with the given id
    pub fn click_id(&mut self, id: &str) -> SiteResult<bool> {
        let target = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| crate::SiteError::missing(format!("#{id}")))?;
        self.click(target)
    }

    /// Submit a form
    pub fn submit(&mut self, form: NodeId) -> SiteResult<bool> {
        let event = Event::submit(form).at(self.now() as f64);
        self.dispatch_event(event)
    }

    /// Type into a form control
    pub fn input(&mut self, control: NodeId, value: &str) -> SiteResult<()> {
        Ok(self.document.set_control_value(control, value)?)
    }

    /// User scroll (instant)
    pub fn scroll_to(&mut self, y: f64) -> SiteResult<()> {
        let moved = self.window.scroll_to(ScrollToOptions {
            top: Some(y),
            ..Default::default()
        });
        if moved {
            self.dispatch_event(Event::scroll().at(self.now() as f64))?;
        }
        Ok(())
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> SiteResult<()> {
        self.window.set_size(width, height);
        self.dispatch_event(Event::resize().at(self.now() as f64))?;
        Ok(())
    }

    /// Set an element's layout box (document coordinates).
    /// Elements without a box are never considered visible.
    pub fn set_layout_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.layout.insert(node, rect);
        self.event_loop.request_render();
    }

    /// Let `ms` milliseconds pass, running due timers and rendering frames.
    ///
    /// A failing timer or frame callback is logged and the loop moves on,
    /// like an uncaught exception in a browser callback.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now().saturating_add(ms);
        while let Some(step) = self.event_loop.poll(until) {
            let result = match step {
                Step::Timer { task, .. } => self.run_task(task, self.now() as f64),
                Step::Frame { timestamp, callbacks } => self.run_frame(timestamp, callbacks),
            };
            if let Err(e) = result {
                tracing::warn!("Callback aborted: {}", e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn run_task(&mut self, task: Task, timestamp: f64) -> SiteResult<()> {
        match task {
            Task::CarouselAutoAdvance => {
                // Same as clicking the next control
                let next = self.carousel.next_control();
                self.click(next)?;
            }
            Task::CounterFrame(node) => {
                self.animator
                    .on_frame(&mut self.document, node, timestamp, &mut self.event_loop)?;
            }
        }
        Ok(())
    }

    /// Rendering update: scroll animation, animation callbacks, then
    /// intersection observation.
    fn run_frame(&mut self, timestamp: f64, callbacks: Vec<Task>) -> SiteResult<()> {
        if self.window.step(self.event_loop.frame_interval() as f64) {
            self.dispatch_event(Event::scroll().at(timestamp))?;
        }

        for task in callbacks {
            if let Err(e) = self.run_task(task, timestamp) {
                tracing::warn!("Animation frame callback aborted: {}", e);
            }
        }

        self.update_visibility(timestamp)?;
        Ok(())
    }

    fn update_visibility(&mut self, timestamp: f64) -> SiteResult<Vec<Trigger>> {
        let window = &self.window;
        let layout = &self.layout;
        self.animator.check(
            &mut self.document,
            window.viewport(),
            |node| layout.get(&node).map(|r| window.to_viewport(*r)),
            timestamp,
            &mut self.event_loop,
        )
    }

    fn handle(&mut self, listener: Listener, event: &mut Event) -> SiteResult<()> {
        let current = event.current_target.unwrap_or(event.target);
        match listener {
            Listener::ShowPage => {
                event.prevent_default();
                let page_id = self
                    .document
                    .get_attribute(current, PAGE_TARGET_ATTR)
                    .unwrap_or_default();
                if self.navigator.show_page(&mut self.document, &mut self.window, &page_id)? {
                    self.dispatch_event(Event::scroll().at(event.timestamp))?;
                }
            }
            Listener::ToggleMenu => {
                self.menu.toggle(&mut self.document)?;
            }
            Listener::HeaderScroll => {
                self.header.on_scroll(&mut self.document, self.window.scroll_y())?;
            }
            Listener::CarouselPrev => self.carousel.prev(&mut self.document)?,
            Listener::CarouselNext => self.carousel.next(&mut self.document)?,
            Listener::CarouselDot(i) => self.carousel.go_to(&mut self.document, i)?,
            Listener::SubmitContact => {
                event.prevent_default();
                let report = self.form.submit(&mut self.document)?;
                self.last_report = Some(report);
            }
        }
        Ok(())
    }

    /// Nodes an event visits: the target, then ancestors if it bubbles
    fn propagation_path(&self, event: &Event) -> Vec<NodeId> {
        let mut path = vec![event.target];
        if event.bubbles {
            path.extend(self.document.tree().ancestors(event.target));
        }
        path
    }

    /// Browser default actions for events nobody cancelled
    fn run_default_action(&mut self, event: &Event) -> SiteResult<()> {
        if event.event_type != EventType::Click {
            return Ok(());
        }
        let doc = &self.document;
        let submitter = std::iter::once(event.target)
            .chain(doc.tree().ancestors(event.target))
            .find(|&n| {
                doc.tree().element(n).is_ok_and(|e| {
                    (e.is("button") && e.attr("type").unwrap_or("submit") == "submit")
                        || (e.is("input") && e.attr("type") == Some("submit"))
                })
            });
        if let Some(form) = submitter.and_then(|b| doc.closest_tag(b, "form")) {
            self.submit(form)?;
        } else if let Some(link) = doc.closest_tag(event.target, "a") {
            tracing::debug!(
                "Default navigation for {} ignored ({:?})",
                link,
                doc.get_attribute(link, "href")
            );
        }
        Ok(())
    }
}

impl EventDispatcher for Site {
    type Error = crate::SiteError;

    fn dispatch_event(&mut self, mut event: Event) -> SiteResult<bool> {
        tracing::trace!("Dispatching {} at {}", event.event_type.as_str(), event.target);

        for node in self.propagation_path(&event) {
            event.current_target = Some(node);
            let matching: Vec<Listener> = self
                .listeners
                .iter()
                .filter(|(n, t, _)| *n == node && *t == event.event_type)
                .map(|(_, _, l)| *l)
                .collect();
            for listener in matching {
                self.handle(listener, &mut event)?;
            }
        }

        let proceed = !event.is_default_prevented();
        if proceed {
            self.run_default_action(&event)?;
        }
        // Handlers may have moved or restyled things
        self.event_loop.request_render();
        Ok(proceed)
    }
}
