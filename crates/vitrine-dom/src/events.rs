//! DOM Events
//!
//! User-interaction and lifecycle events delivered by the host.

use crate::NodeId;

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Submit,
    Scroll,
    Resize,
    DOMContentLoaded,
}

impl EventType {
    /// Event name as used in markup and listeners
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::DOMContentLoaded => "DOMContentLoaded",
        }
    }
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: bool,
}

impl Event {
    fn new(event_type: EventType, target: NodeId, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type,
            target,
            current_target: None,
            bubbles,
            cancelable,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    /// Create click event
    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target, true, true)
    }

    /// Create submit event (fired at a form)
    pub fn submit(form: NodeId) -> Self {
        Self::new(EventType::Submit, form, true, true)
    }

    /// Create scroll event (fired at the document)
    pub fn scroll() -> Self {
        Self::new(EventType::Scroll, NodeId::ROOT, false, false)
    }

    /// Create resize event
    pub fn resize() -> Self {
        Self::new(EventType::Resize, NodeId::ROOT, false, false)
    }

    /// Create DOMContentLoaded event
    pub fn content_loaded() -> Self {
        Self::new(EventType::DOMContentLoaded, NodeId::ROOT, true, false)
    }

    /// Set the event timestamp (ms since page load)
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Event dispatcher trait
///
/// Returns `Ok(false)` when a listener prevented the default action,
/// mirroring `dispatchEvent`.
pub trait EventDispatcher {
    type Error;

    fn dispatch_event(&mut self, event: Event) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_is_cancelable() {
        let mut event = Event::click(NodeId(5));
        assert_eq!(event.event_type, EventType::Click);
        assert!(event.bubbles);
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_scroll_ignores_prevent_default() {
        let mut event = Event::scroll().at(12.0);
        event.prevent_default();
        assert!(!event.is_default_prevented());
        assert_eq!(event.target, NodeId::ROOT);
        assert_eq!(event.timestamp, 12.0);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventType::Submit.as_str(), "submit");
        assert_eq!(EventType::DOMContentLoaded.as_str(), "DOMContentLoaded");
    }
}
