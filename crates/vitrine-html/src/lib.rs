//! Vitrine HTML loader
//!
//! Builds a `vitrine_dom::Document` from the site's markup using html5ever.

mod parser;

pub use parser::HtmlParser;

use vitrine_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build tree: {0}")]
    Dom(#[from] vitrine_dom::DomError),
}
