//! fz HTML - markup loader
//!
//! Parses page markup with html5ever and converts it into an
//! `fz_dom::Document`.

mod parser;

pub use parser::HtmlParser;

/// Parse HTML into a document
pub fn parse(html: &str) -> Result<fz_dom::Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML loading errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("markup has no <html> element")]
    MissingRoot,
}
