//! Report section builders.
//!
//! Each builder returns `None` when it has nothing to show, so callers can
//! leave the section (and its divider) out of the merged report.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::document::{Color, Font, ReportDocument};
use crate::aggregate::{part_appearances, relations_in_category, sorted_relations, OrderMap};
use crate::catalog::Catalog;
use crate::models::config::ReportConfig;
use crate::models::order::{Category, RelationRecord};

const TABLE_TOP: f32 = 50.0;
const SUMMARY_TOP: f32 = 72.0;

const COL_ORDER: f32 = 50.0;
const COL_CODE: f32 = 150.0;
const COL_DESCRIPTION: f32 = 300.0;
const COL_SHIPMENT: f32 = 500.0;

const SUMMARY_COL_CODE: f32 = 50.0;
const SUMMARY_COL_DESCRIPTION: f32 = 150.0;
const SUMMARY_COL_COUNT: f32 = 500.0;

const LIST_MARGIN: f32 = 72.0;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 12.0;
const ROW_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 9.0;
const TOTAL_SIZE: f32 = 14.0;
const DIVIDER_SIZE: f32 = 18.0;

// Space between an order heading and its first row.
const ORDER_GAP: f32 = 12.0;

fn relations_title(category: Category) -> String {
    match category {
        Category::Other => {
            "ORDERS - CODES - SHIPMENTS (EXCLUDING BALLS, CAPS, GLOVES AND ACCESSORIES)".to_string()
        }
        other => format!("ORDERS - CODES - SHIPMENTS ({})", other.label().to_uppercase()),
    }
}

fn relation_headers(doc: &mut ReportDocument, y: f32) {
    for (x, label) in [
        (COL_ORDER, "Order"),
        (COL_CODE, "Code"),
        (COL_DESCRIPTION, "Description"),
        (COL_SHIPMENT, "Shipment"),
    ] {
        doc.insert_text((x, y), label, Font::Bold, HEADER_SIZE, Color::BLACK);
    }
}

/// Cut a description to `limit` characters, marking the cut with "...".
fn truncate(description: &str, limit: usize) -> Option<String> {
    if description.chars().count() > limit {
        Some(format!("{}...", description.chars().take(limit).collect::<String>()))
    } else {
        None
    }
}

/// Split a description into lines of at most `width` characters.
fn wrap(description: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = description.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Order / code / description / shipment table for one category.
pub fn relations_table(
    relations: &[RelationRecord],
    category: Category,
    config: &ReportConfig,
) -> Option<ReportDocument> {
    let rows = sorted_relations(&relations_in_category(relations, category));
    if rows.is_empty() {
        info!("No {} relations to show in the report", category);
        return None;
    }

    let mut doc = ReportDocument::from_config(config);
    doc.new_page();
    let mut y = TABLE_TOP;

    doc.insert_text((COL_ORDER, y), relations_title(category), Font::Bold, TITLE_SIZE, Color::BLUE);
    y += 30.0;
    relation_headers(&mut doc, y);
    y += 20.0;

    let mut current_order: Option<&str> = None;
    for row in &rows {
        if y > config.fill_threshold {
            doc.new_page();
            y = TABLE_TOP;
            relation_headers(&mut doc, y);
            y += 20.0;
        }

        if current_order != Some(row.order_id.as_str()) {
            if current_order.is_some() {
                y += 10.0;
            }
            doc.insert_text((COL_ORDER, y), row.order_id.as_str(), Font::Bold, ROW_SIZE, Color::NAVY);
            current_order = Some(row.order_id.as_str());
            y += ORDER_GAP;
        }

        doc.insert_text((COL_CODE, y), row.code.as_str(), Font::Regular, ROW_SIZE, Color::BLACK);
        match truncate(&row.description, config.description_limit) {
            Some(short) => {
                doc.insert_text((COL_DESCRIPTION, y), short, Font::Regular, SMALL_SIZE, Color::BLACK)
            }
            None => doc.insert_text(
                (COL_DESCRIPTION, y),
                row.description.as_str(),
                Font::Regular,
                ROW_SIZE,
                Color::BLACK,
            ),
        }
        doc.insert_text((COL_SHIPMENT, y), row.shipment_id.as_str(), Font::Regular, ROW_SIZE, Color::BLACK);
        y += 15.0;
    }

    debug!("{} relations table: {} rows, {} pages", category, rows.len(), doc.page_count());
    Some(doc)
}

fn summary_heading(doc: &mut ReportDocument, title: &str, y: f32) {
    doc.insert_text((SUMMARY_COL_CODE, y - 30.0), title, Font::Bold, TITLE_SIZE, Color::BLUE);
    for (x, label) in [
        (SUMMARY_COL_CODE, "Code"),
        (SUMMARY_COL_DESCRIPTION, "Description"),
        (SUMMARY_COL_COUNT, "Appearances"),
    ] {
        doc.insert_text((x, y), label, Font::Bold, HEADER_SIZE, Color::BLACK);
    }
}

/// Appearance counts per code, for all categories or just one.
pub fn part_summary(
    orders: &OrderMap,
    catalog: &Catalog,
    filter: Option<Category>,
    config: &ReportConfig,
) -> Option<ReportDocument> {
    let totals = part_appearances(orders, catalog, filter);
    if totals.is_empty() {
        return None;
    }

    let scope = filter
        .map(|c| c.label().to_uppercase())
        .unwrap_or_else(|| "GENERAL".to_string());
    let title = format!("APPEARANCE SUMMARY: {}", scope);

    let mut doc = ReportDocument::from_config(config);
    doc.new_page();
    let mut y = SUMMARY_TOP;
    summary_heading(&mut doc, &title, y);
    y += 25.0;

    for (code, count) in &totals {
        if y > config.fill_threshold {
            doc.new_page();
            y = SUMMARY_TOP;
            summary_heading(&mut doc, &title, y);
            y += 25.0;
        }

        let description = catalog.description(code).unwrap_or("Description not found");
        doc.insert_text((SUMMARY_COL_CODE, y), code.as_str(), Font::Regular, ROW_SIZE, Color::BLACK);

        let line_height = if description.chars().count() > config.summary_wrap {
            let lines = wrap(description, config.summary_wrap);
            for (i, line) in lines.iter().enumerate() {
                doc.insert_text(
                    (SUMMARY_COL_DESCRIPTION, y + i as f32 * 12.0),
                    line.as_str(),
                    Font::Regular,
                    SMALL_SIZE,
                    Color::BLACK,
                );
            }
            15.0 + (lines.len().saturating_sub(1)) as f32 * 12.0
        } else {
            doc.insert_text((SUMMARY_COL_DESCRIPTION, y), description, Font::Regular, ROW_SIZE, Color::BLACK);
            15.0
        };

        doc.insert_text((SUMMARY_COL_COUNT, y), count.to_string(), Font::Regular, ROW_SIZE, Color::BLACK);
        y += line_height;
    }

    if y > config.fill_threshold {
        doc.new_page();
        y = SUMMARY_TOP;
    }
    y += 20.0;

    let total: u32 = totals.values().sum();
    doc.insert_text(
        (SUMMARY_COL_CODE, y),
        format!("TOTAL APPEARANCES ({}): {}", scope, total),
        Font::Bold,
        TOTAL_SIZE,
        Color::BLUE,
    );

    debug!("{} summary: {} codes, {} appearances", scope, totals.len(), total);
    Some(doc)
}

/// Write a titled list with a trailing total, continuing at `y`.
fn write_list(
    doc: &mut ReportDocument,
    config: &ReportConfig,
    mut y: f32,
    title: &str,
    items: &[&str],
    total_label: &str,
) -> f32 {
    if y > config.fill_threshold {
        doc.new_page();
        y = SUMMARY_TOP;
    }
    doc.insert_text((LIST_MARGIN, y), title, Font::Bold, TITLE_SIZE, Color::BLUE);
    y += 30.0;

    for item in items {
        if y > config.fill_threshold {
            doc.new_page();
            y = SUMMARY_TOP;
        }
        doc.insert_text((LIST_MARGIN, y), *item, Font::Regular, HEADER_SIZE, Color::BLACK);
        y += 20.0;
    }

    y += 20.0;
    doc.insert_text(
        (LIST_MARGIN, y),
        format!("{}: {}", total_label, items.len()),
        Font::Regular,
        TOTAL_SIZE,
        Color::BLUE,
    );
    y
}

/// Two-day shipments and customer pickup orders.
pub fn shipping_summary(
    two_day_shipments: &BTreeSet<String>,
    pickup_orders: &[String],
    config: &ReportConfig,
) -> Option<ReportDocument> {
    if two_day_shipments.is_empty() && pickup_orders.is_empty() {
        return None;
    }

    let mut doc = ReportDocument::from_config(config);
    doc.new_page();
    let mut y = SUMMARY_TOP;

    if !two_day_shipments.is_empty() {
        let shipments: Vec<&str> = two_day_shipments.iter().map(String::as_str).collect();
        y = write_list(
            &mut doc,
            config,
            y,
            "SHIPMENTS WITH SHIPPING METHOD: 2 DAY",
            &shipments,
            "Total 2-day shipments",
        );
        y += 40.0;
    }

    if !pickup_orders.is_empty() {
        let mut orders: Vec<&str> = pickup_orders.iter().map(String::as_str).collect();
        orders.sort_unstable();
        write_list(
            &mut doc,
            config,
            y,
            "CUSTOMER PICKUP ORDERS",
            &orders,
            "Total pickup orders",
        );
    }

    Some(doc)
}

/// Single page carrying `=== LABEL ===` at mid-height.
pub fn divider(label: &str, config: &ReportConfig) -> ReportDocument {
    let mut doc = ReportDocument::from_config(config);
    doc.new_page();
    doc.insert_text(
        (LIST_MARGIN, config.page_height / 2.0),
        format!("=== {} ===", label.to_uppercase()),
        Font::Bold,
        DIVIDER_SIZE,
        Color::BLACK,
    );
    doc
}
