//! Core library for warehouse build sheet and pick list scanning.
//!
//! This crate provides:
//! - Page text extraction from PDFs (and plain-text page dumps)
//! - Order and shipment identifier extraction with carry-forward
//! - Catalog part code matching with longest-match shadowing
//! - Product categorisation and per-order aggregation
//! - PDF report rendering

pub mod aggregate;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;
pub mod report;

pub use aggregate::{group_by_order, part_appearances, pickup_orders, OrderMap};
pub use catalog::{Catalog, CatalogEntry, CatalogWarning};
pub use classify::classify;
pub use error::{CatalogError, PdfError, ReportError, Result, ScanError};
pub use extract::{extract_identifiers, extract_part_numbers, DocumentParser, PartCodeMatcher};
pub use models::config::ScanConfig;
pub use models::order::{Category, DocumentKind, OrderAccumulator, PageRecord, ParsedDocument, RelationRecord};
pub use pdf::{PageSource, PdfExtractor, PlainTextPages, RawPage};
pub use report::{build_report, ReportDocument, ReportInput};

use tracing::info;

/// Extract and parse one document.
pub fn scan_document(
    data: &[u8],
    source: &dyn PageSource,
    parser: &DocumentParser,
    kind: DocumentKind,
) -> Result<ParsedDocument> {
    let pages = source.extract_pages(data)?;
    info!("{} backend returned {} pages", source.backend_name(), pages.len());
    Ok(parser.parse_pages(kind, &pages))
}

/// Scan several documents and merge the results in order.
///
/// Carry-forward state does not cross document boundaries.
pub fn scan_documents<'a, I>(documents: I, parser: &DocumentParser) -> Result<ParsedDocument>
where
    I: IntoIterator<Item = (&'a [u8], &'a dyn PageSource, DocumentKind)>,
{
    let mut merged: Option<ParsedDocument> = None;
    for (data, source, kind) in documents {
        let parsed = scan_document(data, source, parser, kind)?;
        merged = Some(match merged {
            Some(acc) => acc.merge(parsed),
            None => parsed,
        });
    }
    Ok(merged.unwrap_or_default())
}
