//! Page text sources: the PDF text layer and plain-text page dumps.

mod extractor;

pub use extractor::{PdfExtractor, PlainTextPages};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Raw text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Page index (0-based).
    pub index: usize,
    /// Text layer content.
    pub text: String,
}

impl RawPage {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Trait for page text extraction backends.
pub trait PageSource {
    /// Split a document into per-page text, in document order.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<RawPage>>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
