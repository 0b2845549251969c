//! Page field extraction module.

mod parser;
pub mod rules;

pub use parser::DocumentParser;
pub use rules::{
    extract_identifiers, extract_part_numbers, CarryForward, ExtractionMatch, FieldExtractor,
    PartCodeMatcher,
};
