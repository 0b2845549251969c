//! Common regex patterns for build sheet and pick list extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Order numbers: SO-, USS, SOC and AMZ families, optional dash, digits
    pub static ref ORDER_ID: Regex = Regex::new(
        r"\b(SO-|USS|SOC|AMZ)-?(\d+)\b"
    ).unwrap();

    // Shipment numbers: SH followed by at least five digits
    pub static ref SHIPMENT_ID: Regex = Regex::new(
        r"\b(SH\d{5,})\b"
    ).unwrap();

    pub static ref CUSTOMER_PICKUP: Regex = Regex::new(
        r"(?i)Customer\s*Pickup|Cust\s*Pickup|CUSTPICKUP"
    ).unwrap();

    pub static ref TWO_DAY_SHIPPING: Regex = Regex::new(
        r"(?i)Shipping\s*Method:\s*2\s*day"
    ).unwrap();
}
