//! Order, page and relation data models.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product grouping assigned to a part code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Catch-all bucket (bags land here).
    Other,
    /// Dozen-pack golf balls.
    Balls,
    /// Hats, caps and visors.
    Caps,
    /// Gloves.
    Gloves,
    /// Accessories and headcovers.
    Accessories,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 5] = [
        Category::Other,
        Category::Balls,
        Category::Caps,
        Category::Gloves,
        Category::Accessories,
    ];

    /// Categories with their own report sections.
    pub const NAMED: [Category; 4] = [
        Category::Balls,
        Category::Caps,
        Category::Gloves,
        Category::Accessories,
    ];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Balls => "Balls",
            Self::Caps => "Caps",
            Self::Gloves => "Gloves",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "other" | "others" => Ok(Self::Other),
            "balls" | "ball" => Ok(Self::Balls),
            "caps" | "cap" | "hats" => Ok(Self::Caps),
            "gloves" | "glove" => Ok(Self::Gloves),
            "accessories" | "accessory" => Ok(Self::Accessories),
            other => Err(format!(
                "unknown category '{}' (expected one of: other, balls, caps, gloves, accessories)",
                other
            )),
        }
    }
}

/// Which upload a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Warehouse build sheet.
    #[default]
    BuildSheet,
    /// Shipment pick list.
    PickList,
    /// Two or more documents merged together.
    Merged,
}

/// Everything extracted from one page of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page index within its document (0-based).
    pub index: usize,

    /// Raw page text as returned by the text layer.
    #[serde(skip_serializing, default)]
    pub raw_text: String,

    /// Order identifier, after carry-forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Shipment identifier, after carry-forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,

    /// Catalog codes present on the page, each mapped to 1.
    pub matched_codes: BTreeMap<String, u32>,

    /// Page mentions a customer pickup.
    pub is_pickup: bool,

    /// Page declares two-day shipping.
    pub is_two_day_shipping: bool,

    /// Order ID was inherited from an earlier page.
    pub carried_forward: bool,
}

/// Running totals for one order across all of its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccumulator {
    /// Order identifier.
    pub order_id: String,

    /// Pages attributed to the order, in document order.
    pub pages: Vec<PageRecord>,

    /// Any page of the order mentions a customer pickup.
    pub pickup: bool,

    /// Number of pages of this order that mention each code.
    pub part_counts: BTreeMap<String, u32>,
}

impl OrderAccumulator {
    /// Create an empty accumulator.
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            pages: Vec::new(),
            pickup: false,
            part_counts: BTreeMap::new(),
        }
    }

    /// Fold one page into the running totals.
    ///
    /// Counts only ever grow and `pickup` never goes back to false.
    pub fn absorb(&mut self, page: &PageRecord, classify_pickup: bool) {
        self.pages.push(page.clone());
        if classify_pickup && page.is_pickup {
            self.pickup = true;
        }
        for (code, count) in &page.matched_codes {
            *self.part_counts.entry(code.clone()).or_insert(0) += count;
        }
    }

    /// Total number of code mentions across the order.
    pub fn total_parts(&self) -> u32 {
        self.part_counts.values().sum()
    }
}

/// Denormalized (order, code, description, shipment) row used for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationRecord {
    /// Order identifier.
    pub order_id: String,
    /// Catalog code.
    pub code: String,
    /// Catalog description.
    pub description: String,
    /// Shipment identifier.
    pub shipment_id: String,
}

/// Result of parsing one document (or several merged ones).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Source of the pages.
    pub kind: DocumentKind,

    /// Page records in document order.
    pub pages: Vec<PageRecord>,

    /// Relation rows, unique per (order, code, shipment).
    pub relations: Vec<RelationRecord>,

    /// Shipments flagged for two-day shipping.
    pub two_day_shipments: BTreeSet<String>,
}

impl ParsedDocument {
    /// Create an empty result for the given document kind.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Combine two parsed documents.
    ///
    /// Pages and relations are concatenated (relations stay unique),
    /// two-day shipments are unioned.
    pub fn merge(mut self, other: ParsedDocument) -> ParsedDocument {
        self.kind = DocumentKind::Merged;
        self.pages.extend(other.pages);

        let mut seen: HashSet<RelationRecord> = self.relations.iter().cloned().collect();
        for relation in other.relations {
            if seen.insert(relation.clone()) {
                self.relations.push(relation);
            }
        }

        self.two_day_shipments.extend(other.two_day_shipments);
        self
    }

    /// True when at least one page carries an order identifier.
    pub fn has_orders(&self) -> bool {
        self.pages.iter().any(|p| p.order_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(order: &str, codes: &[&str], pickup: bool) -> PageRecord {
        PageRecord {
            order_id: Some(order.to_string()),
            matched_codes: codes.iter().map(|c| (c.to_string(), 1)).collect(),
            is_pickup: pickup,
            ..Default::default()
        }
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Balls".parse::<Category>(), Ok(Category::Balls));
        assert_eq!(" accessories ".parse::<Category>(), Ok(Category::Accessories));
        assert!("bags".parse::<Category>().is_err());
    }

    #[test]
    fn test_absorb_is_monotonic() {
        let mut order = OrderAccumulator::new("SO-1");
        order.absorb(&page("SO-1", &["B-PG-172"], true), true);
        order.absorb(&page("SO-1", &["B-PG-172", "GB-DOZ-XTREME"], false), true);

        assert!(order.pickup);
        assert_eq!(order.part_counts["B-PG-172"], 2);
        assert_eq!(order.part_counts["GB-DOZ-XTREME"], 1);
        assert_eq!(order.total_parts(), 3);
        assert_eq!(order.pages.len(), 2);
    }

    #[test]
    fn test_absorb_ignores_pickup_when_disabled() {
        let mut order = OrderAccumulator::new("SO-1");
        order.absorb(&page("SO-1", &[], true), false);
        assert!(!order.pickup);
    }

    #[test]
    fn test_merge_dedupes_relations() {
        let relation = RelationRecord {
            order_id: "SO-1".into(),
            code: "B-PG-172".into(),
            description: "Bag".into(),
            shipment_id: "SH12345".into(),
        };

        let mut first = ParsedDocument::new(DocumentKind::BuildSheet);
        first.relations.push(relation.clone());
        first.two_day_shipments.insert("SH12345".into());

        let mut second = ParsedDocument::new(DocumentKind::PickList);
        second.relations.push(relation);
        second.two_day_shipments.insert("SH99999".into());
        second.pages.push(page("SO-1", &[], false));

        let merged = first.merge(second);
        assert_eq!(merged.kind, DocumentKind::Merged);
        assert_eq!(merged.relations.len(), 1);
        assert_eq!(merged.pages.len(), 1);
        assert_eq!(merged.two_day_shipments.len(), 2);
    }
}
