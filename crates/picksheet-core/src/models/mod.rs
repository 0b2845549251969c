//! Data models shared across the crate.

pub mod config;
pub mod order;

pub use config::{CatalogConfig, ExtractionConfig, ReportConfig, ScanConfig, Shadowing};
pub use order::{Category, DocumentKind, OrderAccumulator, PageRecord, ParsedDocument, RelationRecord};
