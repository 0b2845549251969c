//! Order and shipment identifier extraction, plus carry-forward across pages.

use super::patterns::{ORDER_ID, SHIPMENT_ID};
use super::{ExtractionMatch, FieldExtractor};

/// Order ID extractor.
///
/// Matches the `SO-`, `USS`, `SOC` and `AMZ` families and normalizes
/// them to `<PREFIX>-<DIGITS>` (`USS123` and `USS-123` both become `USS-123`).
pub struct OrderIdExtractor;

impl OrderIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrderIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for OrderIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ORDER_ID
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let prefix = caps[1].trim_end_matches('-');
                let value = format!("{}-{}", prefix, &caps[2]);
                Some(
                    ExtractionMatch::new(value, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Shipment ID extractor.
///
/// The matched text is returned verbatim (`SH` + digits).
pub struct ShipmentIdExtractor;

impl ShipmentIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShipmentIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ShipmentIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        SHIPMENT_ID
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the first order ID and first shipment ID from page text.
pub fn extract_identifiers(text: &str) -> (Option<String>, Option<String>) {
    let order_id = OrderIdExtractor::new().extract(text).map(|m| m.value);
    let shipment_id = ShipmentIdExtractor::new().extract(text).map(|m| m.value);
    (order_id, shipment_id)
}

/// Identifiers attributed to a page after carry-forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIds {
    pub order_id: Option<String>,
    pub shipment_id: Option<String>,
    /// The order ID came from an earlier page.
    pub order_carried: bool,
}

/// Carry-forward state for one document parse.
///
/// Pages without an order ID inherit the last one seen. A shipment ID is
/// inherited only while the order stays the same, so a new order never
/// picks up the previous order's shipment.
#[derive(Debug, Clone, Default)]
pub struct CarryForward {
    last_order: Option<String>,
    last_shipment: Option<(String, Option<String>)>,
}

impl CarryForward {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the identifiers for the next page in document order.
    pub fn resolve(&mut self, order_id: Option<String>, shipment_id: Option<String>) -> ResolvedIds {
        let order_carried = order_id.is_none() && self.last_order.is_some();
        let order_id = match order_id {
            Some(id) => {
                self.last_order = Some(id.clone());
                Some(id)
            }
            None => self.last_order.clone(),
        };

        let shipment_id = match shipment_id {
            Some(id) => {
                self.last_shipment = Some((id.clone(), order_id.clone()));
                Some(id)
            }
            None => match &self.last_shipment {
                Some((id, owner)) if *owner == order_id => Some(id.clone()),
                _ => None,
            },
        };

        ResolvedIds {
            order_id,
            shipment_id,
            order_carried,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_normalization() {
        assert_eq!(extract_identifiers("Order SO-100 ").0, Some("SO-100".to_string()));
        assert_eq!(extract_identifiers("USS123").0, Some("USS-123".to_string()));
        assert_eq!(extract_identifiers("ref USS-123").0, Some("USS-123".to_string()));
        assert_eq!(extract_identifiers("SOC-77").0, Some("SOC-77".to_string()));
        assert_eq!(extract_identifiers("AMZ4455").0, Some("AMZ-4455".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        let (order, shipment) = extract_identifiers("SO-1 SO-2 SH11111 SH22222");
        assert_eq!(order, Some("SO-1".to_string()));
        assert_eq!(shipment, Some("SH11111".to_string()));
    }

    #[test]
    fn test_shipment_requires_five_digits() {
        assert_eq!(extract_identifiers("SH1234").1, None);
        assert_eq!(extract_identifiers("ship SH123456789").1, Some("SH123456789".to_string()));
        assert_eq!(extract_identifiers("XSH12345").1, None);
    }

    #[test]
    fn test_no_identifiers() {
        assert_eq!(extract_identifiers(""), (None, None));
        assert_eq!(extract_identifiers("nothing to see"), (None, None));
    }

    #[test]
    fn test_extract_all_positions() {
        let matches = OrderIdExtractor::new().extract_all("a SO-1 b AMZ-2");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].position, Some((2, 6)));
        assert_eq!(matches[1].value, "AMZ-2");
    }

    #[test]
    fn test_carry_forward_orders() {
        let mut carry = CarryForward::new();
        let p1 = carry.resolve(Some("SO-100".into()), None);
        let p2 = carry.resolve(None, None);
        let p3 = carry.resolve(Some("SO-200".into()), None);

        assert_eq!(p1.order_id.as_deref(), Some("SO-100"));
        assert!(!p1.order_carried);
        assert_eq!(p2.order_id.as_deref(), Some("SO-100"));
        assert!(p2.order_carried);
        assert_eq!(p3.order_id.as_deref(), Some("SO-200"));
    }

    #[test]
    fn test_shipment_not_carried_into_new_order() {
        let mut carry = CarryForward::new();
        carry.resolve(Some("SO-1".into()), Some("SH11111".into()));
        let continuation = carry.resolve(None, None);
        let next_order = carry.resolve(Some("SO-2".into()), None);

        assert_eq!(continuation.shipment_id.as_deref(), Some("SH11111"));
        assert_eq!(next_order.shipment_id, None);
    }

    #[test]
    fn test_nothing_to_carry() {
        let mut carry = CarryForward::new();
        assert_eq!(carry.resolve(None, None), ResolvedIds::default());
    }
}
