//! Page navigation
//!
//! Exactly one `.page` section carries `active` after a navigation, and
//! `.nav-link`s mirror it.

use vitrine_dom::{Document, NodeId};

use crate::mobile_menu::MobileMenuToggle;
use crate::window::{ScrollToOptions, Window};
use crate::{SiteError, SiteResult};

/// Attribute naming a link's target page
pub const PAGE_TARGET_ATTR: &str = "data-page";

/// Single-page navigator
#[derive(Debug, Clone)]
pub struct Navigator {
    pages: Vec<NodeId>,
    nav_links: Vec<NodeId>,
    menu: MobileMenuToggle,
}

impl Navigator {
    pub fn new(doc: &Document, menu: MobileMenuToggle) -> Self {
        Self {
            pages: doc.get_elements_by_class_name("page"),
            nav_links: doc.get_elements_by_class_name("nav-link"),
            menu,
        }
    }

    /// Every element that navigates on click (`[data-page]`)
    pub fn page_targets(doc: &Document) -> Vec<NodeId> {
        doc.elements_with_attribute(PAGE_TARGET_ATTR)
    }

    pub fn pages(&self) -> &[NodeId] {
        &self.pages
    }

    /// Show the page with id `page_id`.
    ///
    /// Pages are deactivated before the target is looked up, so an unknown
    /// id leaves no page active and returns `ElementNotFound`.
    pub fn show_page(&self, doc: &mut Document, window: &mut Window, page_id: &str) -> SiteResult<bool> {
        for &page in &self.pages {
            doc.remove_class(page, "active")?;
        }
        let page = doc
            .get_element_by_id(page_id)
            .ok_or_else(|| SiteError::missing(format!("#{page_id}")))?;
        doc.add_class(page, "active")?;

        for &link in &self.nav_links {
            let target = doc.get_attribute(link, PAGE_TARGET_ATTR);
            doc.toggle_class(link, "active", Some(target.as_deref() == Some(page_id)))?;
        }

        if self.menu.is_open(doc) {
            self.menu.close(doc)?;
        }

        tracing::debug!("Showing page {}", page_id);
        Ok(window.scroll_to(ScrollToOptions::smooth_top()))
    }

    /// Id of the active page, if exactly one is active
    pub fn active_page(&self, doc: &Document) -> Option<String> {
        let mut active = self.pages.iter().filter(|&&p| doc.has_class(p, "active"));
        let page = *active.next()?;
        if active.next().is_some() {
            return None;
        }
        doc.get_attribute(page, "id")
    }
}
