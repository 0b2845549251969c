//! Error types for the picksheet-core library.

use thiserror::Error;

/// Main error type for the picksheet library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// PDF reading error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Catalog loading error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Report generation error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the PDF reading boundary.
///
/// Any of these aborts the whole document: there is no partial output
/// for a file that cannot be opened.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract the text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to loading the part catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog source could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    /// The catalog has no usable entries.
    #[error("catalog contains no entries")]
    Empty,
}

/// Errors related to writing the PDF report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A page content stream could not be encoded.
    #[error("failed to encode page content: {0}")]
    Encode(String),

    /// The document could not be serialized.
    #[error("failed to write document: {0}")]
    Write(String),
}

/// Result type for the picksheet library.
pub type Result<T> = std::result::Result<T, ScanError>;
