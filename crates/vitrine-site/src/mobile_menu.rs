//! Mobile menu toggle

use vitrine_dom::{Document, NodeId};

use crate::{SiteError, SiteResult};

/// Collapsible navigation panel and its trigger button
#[derive(Debug, Clone, Copy)]
pub struct MobileMenuToggle {
    button: NodeId,
    panel: NodeId,
}

impl MobileMenuToggle {
    pub fn new(doc: &Document) -> SiteResult<Self> {
        Ok(Self {
            button: doc
                .first_by_class("mobile-menu-btn")
                .ok_or_else(|| SiteError::missing(".mobile-menu-btn"))?,
            panel: doc
                .get_element_by_id("mobileNav")
                .ok_or_else(|| SiteError::missing("#mobileNav"))?,
        })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.panel, "active")
    }

    /// Flip `aria-expanded` and the panel's `active` class.
    /// Returns the new `aria-expanded` value.
    ///
    /// The two are flipped independently, so markup that starts them out of
    /// sync stays out of sync.
    pub fn toggle(&self, doc: &mut Document) -> SiteResult<bool> {
        let expanded = doc.get_attribute(self.button, "aria-expanded").as_deref() == Some("true");
        doc.set_attribute(self.button, "aria-expanded", if expanded { "false" } else { "true" })?;
        let open = doc.toggle_class(self.panel, "active", None)?;
        tracing::debug!(expanded = !expanded, open, "Mobile menu toggled");
        Ok(!expanded)
    }

    /// Collapse the panel
    pub fn close(&self, doc: &mut Document) -> SiteResult<()> {
        doc.remove_class(self.panel, "active")?;
        doc.set_attribute(self.button, "aria-expanded", "false")?;
        Ok(())
    }
}
