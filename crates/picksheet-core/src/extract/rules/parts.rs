//! Part code matching against the catalog.
//!
//! Codes share prefixes: a base bag code such as `B-PG-172` has colour
//! variants like `B-PG-172-BGRY`. A plain substring search would report the
//! base code every time a variant is printed, so matching works as follows:
//!
//! 1. The page text is upper-cased.
//! 2. Codes are tried longest first.
//! 3. An occurrence counts only as a delimited token: the characters on
//!    either side must not be word characters (letters, digits, `_`).
//!    `-` is not a word character.
//! 4. An occurrence of a shorter code is shadowed when a longer code that
//!    extends it also matches, as a delimited token, at the same position.
//!
//! The result maps every code with at least one surviving occurrence to 1:
//! presence on the page, not frequency.

use std::collections::BTreeMap;

use tracing::trace;

use super::{ExtractionMatch, FieldExtractor};
use crate::catalog::Catalog;
use crate::models::config::Shadowing;

/// Precompiled catalog code.
#[derive(Debug, Clone)]
struct CodePattern {
    /// Code as spelled in the catalog.
    code: String,
    /// Upper-cased needle searched in page text.
    needle: String,
    /// Indices of longer patterns whose needle starts with this one.
    extensions: Vec<usize>,
}

/// Longest-match, non-overlapping part code matcher.
#[derive(Debug, Clone)]
pub struct PartCodeMatcher {
    patterns: Vec<CodePattern>,
    shadowing: Shadowing,
}

impl PartCodeMatcher {
    /// Build a matcher over every code in the catalog.
    pub fn new(catalog: &Catalog) -> Self {
        let mut patterns: Vec<CodePattern> = catalog
            .iter()
            .map(|entry| CodePattern {
                code: entry.code.clone(),
                needle: entry.code.to_uppercase(),
                extensions: Vec::new(),
            })
            .collect();

        patterns.sort_by(|a, b| {
            b.needle
                .len()
                .cmp(&a.needle.len())
                .then_with(|| a.needle.cmp(&b.needle))
        });

        for i in 0..patterns.len() {
            let extensions: Vec<usize> = (0..i)
                .filter(|&j| {
                    patterns[j].needle.len() > patterns[i].needle.len()
                        && patterns[j].needle.starts_with(&patterns[i].needle)
                })
                .collect();
            patterns[i].extensions = extensions;
        }

        Self {
            patterns,
            shadowing: Shadowing::default(),
        }
    }

    /// Set the shadowing rule.
    pub fn with_shadowing(mut self, shadowing: Shadowing) -> Self {
        self.shadowing = shadowing;
        self
    }

    /// Codes present in the text, each mapped to 1.
    pub fn match_codes(&self, text: &str) -> BTreeMap<String, u32> {
        let mut found = BTreeMap::new();
        for m in self.extract_all(text) {
            found.insert(m.value, 1);
        }
        found
    }

    fn accepted_matches(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        let upper = text.to_uppercase();
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut matches = Vec::new();

        for pattern in &self.patterns {
            for start in delimited_occurrences(&upper, &pattern.needle) {
                let end = start + pattern.needle.len();

                let shadowed = pattern.extensions.iter().any(|&j| {
                    is_delimited_at(&upper, start, &self.patterns[j].needle)
                });
                if shadowed {
                    trace!("{} at {} shadowed by a longer code", pattern.code, start);
                    continue;
                }

                if self.shadowing == Shadowing::Overlap
                    && claimed.iter().any(|&(s, e)| start < e && s < end)
                {
                    trace!("{} at {} overlaps a longer match", pattern.code, start);
                    continue;
                }

                claimed.push((start, end));
                matches.push(
                    ExtractionMatch::new(pattern.code.clone(), &upper[start..end])
                        .with_position(start, end),
                );
            }
        }

        matches.sort_by_key(|m| m.position);
        matches
    }
}

impl FieldExtractor for PartCodeMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Every surviving occurrence in text order. Positions refer to the
    /// upper-cased text.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.accepted_matches(text)
    }
}

/// Catalog codes present in the text, each mapped to 1.
pub fn extract_part_numbers(text: &str, catalog: &Catalog) -> BTreeMap<String, u32> {
    PartCodeMatcher::new(catalog).match_codes(text)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `needle` occurs at byte offset `start` as a delimited token.
fn is_delimited_at(haystack: &str, start: usize, needle: &str) -> bool {
    let Some(rest) = haystack.get(start..) else {
        return false;
    };
    if !rest.starts_with(needle) {
        return false;
    }

    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !is_word_char(c));
    let after_ok = rest[needle.len()..]
        .chars()
        .next()
        .is_none_or(|c| !is_word_char(c));

    before_ok && after_ok
}

/// Start offsets of every delimited occurrence, overlapping ones included.
fn delimited_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    if needle.is_empty() {
        return starts;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        if is_delimited_at(haystack, start, needle) {
            starts.push(start);
        }
        // Advance by one character to also see overlapping occurrences.
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }

    starts
}
