//! Site errors

use vitrine_dom::{DomError, NodeId};
use vitrine_html::ParseError;

/// Errors raised while wiring or running site behaviors
///
/// Form validation failures are not errors: they surface through the DOM
/// and the `ValidationReport`.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid counter target {value:?} on {node}")]
    InvalidCounterTarget { node: NodeId, value: String },

    #[error("Slide index {index} out of range for {count} slides")]
    SlideOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to serialize submission: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias for site operations
pub type SiteResult<T> = Result<T, SiteError>;

impl SiteError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Self::ElementNotFound(what.into())
    }
}
