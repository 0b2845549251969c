//! Product category classification.
//!
//! Rules are evaluated in order and the first hit wins:
//!
//! 1. `GB-DOZ-` code, or a description mentioning `GOLF BALL` → [`Category::Balls`]
//! 2. `H-` code, or a description mentioning `HAT` / `CAP` → [`Category::Caps`]
//! 3. `G4-` code → [`Category::Gloves`]
//! 4. `A-` / `HC-` code → [`Category::Accessories`]
//! 5. anything else → [`Category::Other`]
//!
//! Bags have no rule of their own and fall through to `Other`.

use crate::models::order::Category;

const BALL_PREFIX: &str = "GB-DOZ-";
const BALL_KEYWORD: &str = "GOLF BALL";
const CAP_PREFIX: &str = "H-";
const CAP_KEYWORDS: [&str; 2] = ["HAT", "CAP"];
const GLOVE_PREFIX: &str = "G4-";
const ACCESSORY_PREFIXES: [&str; 2] = ["A-", "HC-"];

/// Classify a code and its description. Case-insensitive on both inputs.
pub fn classify(code: &str, description: &str) -> Category {
    let code = code.to_uppercase();
    let description = description.to_uppercase();

    if code.starts_with(BALL_PREFIX) || description.contains(BALL_KEYWORD) {
        Category::Balls
    } else if code.starts_with(CAP_PREFIX) || CAP_KEYWORDS.iter().any(|k| description.contains(k)) {
        Category::Caps
    } else if code.starts_with(GLOVE_PREFIX) {
        Category::Gloves
    } else if ACCESSORY_PREFIXES.iter().any(|p| code.starts_with(p)) {
        Category::Accessories
    } else {
        Category::Other
    }
}
