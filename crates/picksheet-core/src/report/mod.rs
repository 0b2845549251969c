//! PDF report rendering.
//!
//! The report is a concatenation of sections, each closed by a divider
//! page naming it:
//!
//! 1. relations table for codes outside the named categories
//! 2. general appearance summary, then one summary per named category
//! 3. relations table for each named category
//! 4. shipping methods (two-day shipments, customer pickups)
//!
//! Sections with nothing to show are left out together with their divider.

mod document;
mod sections;

pub use document::{Color, Font, ReportDocument, ReportPage, TextItem};
pub use sections::{divider, part_summary, relations_table, shipping_summary};

use std::collections::BTreeSet;

use tracing::info;

use crate::aggregate::OrderMap;
use crate::catalog::Catalog;
use crate::models::config::ReportConfig;
use crate::models::order::{Category, RelationRecord};

/// Everything the report needs from a scan.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub relations: &'a [RelationRecord],
    pub orders: &'a OrderMap,
    pub catalog: &'a Catalog,
    pub two_day_shipments: &'a BTreeSet<String>,
    pub pickup_orders: &'a [String],
}

fn push_section(report: &mut ReportDocument, label: &str, section: Option<ReportDocument>, config: &ReportConfig) {
    if let Some(section) = section {
        report.append(section);
        report.append(divider(label, config));
    }
}

/// Assemble the full report. Returns `None` when no section has content.
pub fn build_report(input: &ReportInput<'_>, config: &ReportConfig) -> Option<ReportDocument> {
    let mut report = ReportDocument::from_config(config);

    push_section(
        &mut report,
        "General product relations (other categories)",
        relations_table(input.relations, Category::Other, config),
        config,
    );

    push_section(
        &mut report,
        "Appearance summary general",
        part_summary(input.orders, input.catalog, None, config),
        config,
    );
    for category in Category::NAMED {
        push_section(
            &mut report,
            &format!("Appearance summary {}", category.label()),
            part_summary(input.orders, input.catalog, Some(category), config),
            config,
        );
    }

    for category in Category::NAMED {
        push_section(
            &mut report,
            &format!("Detail of {}", category.label()),
            relations_table(input.relations, category, config),
            config,
        );
    }

    push_section(
        &mut report,
        "Shipping methods",
        shipping_summary(input.two_day_shipments, input.pickup_orders, config),
        config,
    );

    if report.page_count() == 0 {
        info!("Nothing to report");
        return None;
    }

    info!("Report assembled with {} pages", report.page_count());
    Some(report)
}
