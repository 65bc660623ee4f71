//! Vitrine Site - page behaviors
//!
//! Navigation between in-page sections, the mobile menu, header scroll
//! styling, the auto-advancing carousel, scroll-triggered fade-ins and stat
//! counters, and contact form validation. `Site` wires them onto a parsed
//! document and drives them from a virtual clock.

mod animator;
mod carousel;
mod config;
mod error;
mod event_loop;
mod form;
mod header;
mod mobile_menu;
mod navigator;
mod site;
mod window;

pub use animator::{COUNTER_TARGET_ATTR, CounterFormat, Trigger, VisibilityAnimator, parse_counter_target};
pub use carousel::Carousel;
pub use config::SiteConfig;
pub use error::{SiteError, SiteResult};
pub use event_loop::{EventLoop, Step, Task, Timer};
pub use form::{ContactSubmission, Field, FormValidator, ValidationReport};
pub use header::HeaderScrollEffect;
pub use mobile_menu::MobileMenuToggle;
pub use navigator::{Navigator, PAGE_TARGET_ATTR};
pub use site::Site;
pub use window::{ScrollBehavior, ScrollToOptions, Window};

pub use vitrine_dom::{DOMRect, Document, NodeId};
