//! Shipping method signals: customer pickup and two-day shipping.

use super::patterns::{CUSTOMER_PICKUP, TWO_DAY_SHIPPING};

/// Page mentions a customer pickup ("Customer Pickup", "Cust Pickup", "CUSTPICKUP").
pub fn is_customer_pickup(text: &str) -> bool {
    CUSTOMER_PICKUP.is_match(text)
}

/// Page declares `Shipping Method: 2 day`.
pub fn is_two_day_shipping(text: &str) -> bool {
    TWO_DAY_SHIPPING.is_match(text)
}
