//! Page-by-page document parser.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::models::config::{ExtractionConfig, Shadowing};
use crate::models::order::{DocumentKind, PageRecord, ParsedDocument, RelationRecord};
use crate::pdf::RawPage;

use super::rules::{
    extract_identifiers, is_customer_pickup, is_two_day_shipping, CarryForward, PartCodeMatcher,
};

/// Turns raw page text into page records, relations and shipping flags.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    catalog: Arc<Catalog>,
    matcher: PartCodeMatcher,
    /// Reuse identifiers from earlier pages.
    carry_forward: bool,
}

impl DocumentParser {
    /// Create a parser with default settings.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let matcher = PartCodeMatcher::new(&catalog);
        Self {
            catalog,
            matcher,
            carry_forward: true,
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(catalog: Arc<Catalog>, config: &ExtractionConfig) -> Self {
        Self::new(catalog)
            .with_carry_forward(config.carry_forward)
            .with_shadowing(config.shadowing)
    }

    /// Set identifier carry-forward.
    pub fn with_carry_forward(mut self, enabled: bool) -> Self {
        self.carry_forward = enabled;
        self
    }

    /// Set the part code shadowing rule.
    pub fn with_shadowing(mut self, shadowing: Shadowing) -> Self {
        self.matcher = self.matcher.with_shadowing(shadowing);
        self
    }

    /// The catalog this parser matches against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Extract one page without any carry-forward.
    pub fn parse_page(&self, index: usize, text: &str) -> PageRecord {
        let (order_id, shipment_id) = extract_identifiers(text);
        self.build_record(index, text, order_id, shipment_id, false)
    }

    /// Parse every page of one document.
    ///
    /// Carry-forward state starts empty on every call.
    pub fn parse_pages(&self, kind: DocumentKind, pages: &[RawPage]) -> ParsedDocument {
        let start = Instant::now();
        let mut carry = CarryForward::new();
        let mut document = ParsedDocument::new(kind);
        let mut seen_relations: HashSet<RelationRecord> = HashSet::new();

        for page in pages {
            let (found_order, found_shipment) = extract_identifiers(&page.text);

            let record = if self.carry_forward {
                let ids = carry.resolve(found_order, found_shipment);
                self.build_record(
                    page.index,
                    &page.text,
                    ids.order_id,
                    ids.shipment_id,
                    ids.order_carried,
                )
            } else {
                self.build_record(page.index, &page.text, found_order, found_shipment, false)
            };

            debug!(
                "Page {}: order={:?} shipment={:?} carried={} codes={}",
                record.index,
                record.order_id,
                record.shipment_id,
                record.carried_forward,
                record.matched_codes.len()
            );

            if record.is_two_day_shipping {
                if let Some(shipment) = &record.shipment_id {
                    document.two_day_shipments.insert(shipment.clone());
                }
            }

            for relation in self.relations_for(&record) {
                if seen_relations.insert(relation.clone()) {
                    document.relations.push(relation);
                }
            }

            document.pages.push(record);
        }

        info!(
            "Parsed {:?}: {} pages, {} relations, {} two-day shipments in {}ms",
            kind,
            document.pages.len(),
            document.relations.len(),
            document.two_day_shipments.len(),
            start.elapsed().as_millis()
        );

        document
    }

    fn build_record(
        &self,
        index: usize,
        text: &str,
        order_id: Option<String>,
        shipment_id: Option<String>,
        carried_forward: bool,
    ) -> PageRecord {
        PageRecord {
            index,
            raw_text: text.to_string(),
            order_id,
            shipment_id,
            matched_codes: self.matcher.match_codes(text),
            is_pickup: is_customer_pickup(text),
            is_two_day_shipping: is_two_day_shipping(text),
            carried_forward,
        }
    }

    /// One relation per matched code when the page has both identifiers.
    fn relations_for(&self, page: &PageRecord) -> Vec<RelationRecord> {
        let (Some(order_id), Some(shipment_id)) = (&page.order_id, &page.shipment_id) else {
            return Vec::new();
        };

        page.matched_codes
            .keys()
            .filter_map(|code| {
                let description = self.catalog.description(code)?;
                Some(RelationRecord {
                    order_id: order_id.clone(),
                    code: code.clone(),
                    description: description.to_string(),
                    shipment_id: shipment_id.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser() -> DocumentParser {
        DocumentParser::new(Arc::new(Catalog::builtin()))
    }

    fn pages(texts: &[&str]) -> Vec<RawPage> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| RawPage::new(index, *text))
            .collect()
    }

    #[test]
    fn test_carry_forward_attributes_continuation_page() {
        let doc = parser().parse_pages(
            DocumentKind::BuildSheet,
            &pages(&["Order SO-100\nB-PG-172", "continued\nGB-DOZ-XTREME", "Order SO-200"]),
        );

        let orders: Vec<Option<&str>> = doc.pages.iter().map(|p| p.order_id.as_deref()).collect();
        assert_eq!(orders, vec![Some("SO-100"), Some("SO-100"), Some("SO-200")]);
        assert!(doc.pages[1].carried_forward);
        assert!(!doc.pages[2].carried_forward);
    }

    #[test]
    fn test_carry_forward_disabled() {
        let doc = parser()
            .with_carry_forward(false)
            .parse_pages(DocumentKind::BuildSheet, &pages(&["SO-100", "continued"]));
        assert_eq!(doc.pages[1].order_id, None);
    }

    #[test]
    fn test_relations_need_both_identifiers() {
        let doc = parser().parse_pages(
            DocumentKind::PickList,
            &pages(&[
                "SO-100 SH12345\nB-PG-172-BGRY\nA-UAC18-FM",
                "SO-300\nB-PG-172",
            ]),
        );

        assert_eq!(
            doc.relations,
            vec![
                RelationRecord {
                    order_id: "SO-100".into(),
                    code: "A-UAC18-FM".into(),
                    description: "PXG Wedge Brush - Chrome".into(),
                    shipment_id: "SH12345".into(),
                },
                RelationRecord {
                    order_id: "SO-100".into(),
                    code: "B-PG-172-BGRY".into(),
                    description: "Xtreme Carry Stand Bag - Black".into(),
                    shipment_id: "SH12345".into(),
                },
            ]
        );
    }

    #[test]
    fn test_relations_are_unique_per_document() {
        let doc = parser().parse_pages(
            DocumentKind::PickList,
            &pages(&["SO-1 SH11111 B-PG-172", "SO-1 SH11111 B-PG-172"]),
        );
        assert_eq!(doc.relations.len(), 1);
        assert_eq!(doc.pages.len(), 2);
    }

    #[test]
    fn test_two_day_shipments_collected() {
        let doc = parser().parse_pages(
            DocumentKind::PickList,
            &pages(&[
                "SO-1 SH11111 Shipping Method: 2 Day",
                "SO-2 Shipping Method: 2 day",
                "SO-3 SH33333 Shipping Method: Ground",
            ]),
        );
        let two_day: Vec<&str> = doc.two_day_shipments.iter().map(String::as_str).collect();
        assert_eq!(two_day, vec!["SH11111"]);
        assert!(doc.pages[1].is_two_day_shipping);
    }

    #[test]
    fn test_parse_page_flags() {
        let page = parser().parse_page(4, "AMZ-9 Customer Pickup G4-65201019L-BLK");
        assert_eq!(page.index, 4);
        assert_eq!(page.order_id.as_deref(), Some("AMZ-9"));
        assert!(page.is_pickup);
        assert_eq!(page.matched_codes.get("G4-65201019L-BLK"), Some(&1));
    }

    #[test]
    fn test_empty_document() {
        let doc = parser().parse_pages(DocumentKind::BuildSheet, &[]);
        assert!(doc.pages.is_empty());
        assert!(doc.relations.is_empty());
        assert!(!doc.has_orders());
    }
}
