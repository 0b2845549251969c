//! Rule-based field extractors for build sheets and pick lists.

pub mod identifiers;
pub mod parts;
pub mod patterns;
pub mod shipping;

pub use identifiers::{
    extract_identifiers, CarryForward, OrderIdExtractor, ResolvedIds, ShipmentIdExtractor,
};
pub use parts::{extract_part_numbers, PartCodeMatcher};
pub use shipping::{is_customer_pickup, is_two_day_shipping};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in page text, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted (normalized) value.
    pub value: T,
    /// Byte span in the searched text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
