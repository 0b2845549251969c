//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageSource, RawPage, Result};
use crate::error::PdfError;

/// Page text extractor for PDF files.
///
/// lopdf opens (and if needed decrypts) the document; pdf-extract reads
/// the text layer page by page. When pdf-extract cannot handle a file,
/// lopdf's own text extraction is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Open a document, decrypting files protected with an empty password.
    ///
    /// Returns the document and the (possibly decrypted) bytes.
    fn load(&self, data: &[u8]) -> Result<(Document, Vec<u8>)> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        Ok((doc, raw))
    }

    fn extract_with_lopdf(&self, doc: &Document) -> Result<Vec<RawPage>> {
        doc.get_pages()
            .keys()
            .enumerate()
            .map(|(index, number)| {
                doc.extract_text(&[*number])
                    .map(|text| RawPage::new(index, text))
                    .map_err(|e| PdfError::TextExtraction(e.to_string()))
            })
            .collect()
    }
}

impl PageSource for PdfExtractor {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<RawPage>> {
        let (doc, raw) = self.load(data)?;
        let page_count = doc.get_pages().len();
        debug!("Loaded PDF with {} pages", page_count);

        match pdf_extract::extract_text_from_mem_by_pages(&raw) {
            Ok(texts) if texts.len() == page_count => Ok(texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| RawPage::new(index, text))
                .collect()),
            Ok(texts) => {
                warn!(
                    "pdf-extract returned {} pages for a {}-page document, using lopdf",
                    texts.len(),
                    page_count
                );
                self.extract_with_lopdf(&doc)
            }
            Err(e) => {
                warn!("pdf-extract failed ({}), using lopdf", e);
                self.extract_with_lopdf(&doc)
            }
        }
    }

    fn backend_name(&self) -> &str {
        "pdf-extract"
    }
}

/// Plain-text page dumps, pages separated by form feeds (as written by `pdftotext`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextPages;

impl PlainTextPages {
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for PlainTextPages {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<RawPage>> {
        let text = String::from_utf8_lossy(data);
        let mut pages: Vec<&str> = text.split('\x0c').collect();

        // pdftotext terminates the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| RawPage::new(index, page))
            .collect())
    }

    fn backend_name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_is_parse_error() {
        let result = PdfExtractor::new().extract_pages(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_plain_text_splits_on_form_feed() {
        let pages = PlainTextPages::new()
            .extract_pages(b"page one SO-1\x0cpage two\x0c")
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], RawPage::new(0, "page one SO-1"));
        assert_eq!(pages[1].index, 1);
    }

    #[test]
    fn test_plain_text_single_page() {
        let pages = PlainTextPages::new().extract_pages(b"").unwrap();
        assert_eq!(pages, vec![RawPage::new(0, "")]);
    }
}
