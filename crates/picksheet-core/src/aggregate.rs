//! Order-level aggregation of page records.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::Catalog;
use crate::classify::classify;
use crate::models::order::{Category, OrderAccumulator, PageRecord, RelationRecord};

/// Orders keyed by order ID.
pub type OrderMap = BTreeMap<String, OrderAccumulator>;

/// Fold pages into per-order accumulators.
///
/// Pages without an order ID are skipped. A code's count for an order is
/// the number of that order's pages mentioning it.
pub fn group_by_order(pages: &[PageRecord], classify_pickup: bool) -> OrderMap {
    let mut orders = OrderMap::new();

    for page in pages {
        let Some(order_id) = &page.order_id else {
            continue;
        };
        orders
            .entry(order_id.clone())
            .or_insert_with(|| OrderAccumulator::new(order_id.clone()))
            .absorb(page, classify_pickup);
    }

    debug!("Grouped {} pages into {} orders", pages.len(), orders.len());
    orders
}

/// Total appearances per catalog code, optionally restricted to one category.
///
/// Codes missing from the catalog and zero counts are left out.
pub fn part_appearances(
    orders: &OrderMap,
    catalog: &Catalog,
    filter: Option<Category>,
) -> BTreeMap<String, u32> {
    let mut totals = BTreeMap::new();

    for order in orders.values() {
        for (code, count) in &order.part_counts {
            let Some(entry) = catalog.get(code) else {
                continue;
            };
            if filter.is_some_and(|category| entry.category() != category) {
                continue;
            }
            *totals.entry(code.clone()).or_insert(0) += count;
        }
    }

    totals.retain(|_, count| *count > 0);
    totals
}

/// Total appearances per code across all orders.
pub fn global_appearances(orders: &OrderMap) -> BTreeMap<String, u32> {
    let mut totals = BTreeMap::new();
    for order in orders.values() {
        for (code, count) in &order.part_counts {
            *totals.entry(code.clone()).or_insert(0) += count;
        }
    }
    totals
}

/// Relations whose code falls in the given category.
pub fn relations_in_category(relations: &[RelationRecord], category: Category) -> Vec<RelationRecord> {
    relations
        .iter()
        .filter(|r| classify(&r.code, &r.description) == category)
        .cloned()
        .collect()
}

/// Relations sorted by order, then code.
pub fn sorted_relations(relations: &[RelationRecord]) -> Vec<RelationRecord> {
    let mut sorted = relations.to_vec();
    sorted.sort_by(|a, b| {
        a.order_id
            .cmp(&b.order_id)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.shipment_id.cmp(&b.shipment_id))
    });
    sorted
}

/// Order IDs flagged as customer pickup.
pub fn pickup_orders(orders: &OrderMap) -> Vec<String> {
    orders
        .values()
        .filter(|o| o.pickup)
        .map(|o| o.order_id.clone())
        .collect()
}
