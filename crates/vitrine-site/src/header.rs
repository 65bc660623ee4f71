//! Header scroll effect

use vitrine_dom::{Document, NodeId};

use crate::{SiteError, SiteResult};

/// Marks `#header` as `scrolled` past a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct HeaderScrollEffect {
    header: NodeId,
    threshold: f64,
}

impl HeaderScrollEffect {
    pub fn new(doc: &Document, threshold: f64) -> SiteResult<Self> {
        let header = doc
            .get_element_by_id("header")
            .ok_or_else(|| SiteError::missing("#header"))?;
        Ok(Self { header, threshold })
    }

    /// Recompute from the current offset. Returns whether `scrolled` is set.
    pub fn on_scroll(&self, doc: &mut Document, scroll_y: f64) -> SiteResult<bool> {
        Ok(doc.toggle_class(self.header, "scrolled", Some(scroll_y > self.threshold))?)
    }
}
