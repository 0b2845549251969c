//! Builtin catalog data, embedded in the binary.

use lazy_static::lazy_static;

use super::Catalog;

/// Reference catalog as a JSON array of `{"code", "description"}`.
pub static BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

lazy_static! {
    pub(crate) static ref BUILTIN: Catalog = Catalog::from_json_str(BUILTIN_CATALOG_JSON)
        .map(|(catalog, _)| catalog)
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_clean() {
        let (catalog, warnings) = Catalog::from_json_str(BUILTIN_CATALOG_JSON).unwrap();
        assert!(warnings.is_empty(), "builtin catalog warnings: {:?}", warnings);
        assert_eq!(catalog.len(), 127);
    }
}
