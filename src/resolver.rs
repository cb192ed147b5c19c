//! Destination resolution: colloquial rider text → catalog key.
//!
//! Lookup precedence is fixed: the synonym table is consulted first (exact
//! match on the normalized text), then catalog keys are scanned in
//! declaration order and the first key that contains, or is contained by,
//! the text wins.

use crate::catalog::TransitCatalog;

/// Spoken shorthands and their catalog-style expansions, checked in order.
pub const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("university", "university bus park"),
    ("hospital", "royal hospital entrance"),
    ("derby hospital", "royal hospital entrance"),
    ("royal derby", "royal hospital entrance"),
    ("uttoxeter", "uttoxeter bus station"),
    ("derby", "derby bus station"),
    ("beetwell", "new beetwell street"),
    ("high", "high street"),
];

/// Matches free text against the synonym table and catalog keys.
#[derive(Debug, Clone, Copy)]
pub struct DestinationResolver {
    synonyms: &'static [(&'static str, &'static str)],
}

impl Default for DestinationResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SYNONYMS)
    }
}

impl DestinationResolver {
    pub const fn new(synonyms: &'static [(&'static str, &'static str)]) -> Self {
        Self { synonyms }
    }

    /// Lowercase and trim, then substitute an exact synonym hit.
    pub fn normalize(&self, raw: &str) -> String {
        let lowered = raw.trim().to_lowercase();
        self.synonyms
            .iter()
            .find(|(phrase, _)| *phrase == lowered)
            .map(|(_, expansion)| (*expansion).to_string())
            .unwrap_or(lowered)
    }

    /// Resolve rider text to a catalog key, or `None` when nothing matches.
    pub fn resolve(&self, raw: &str, catalog: &dyn TransitCatalog) -> Option<String> {
        let text = self.normalize(raw);
        if text.is_empty() {
            return None;
        }
        catalog
            .destination_keys()
            .into_iter()
            .find(|key| text.contains(key) || key.contains(text.as_str()))
            .map(str::to_string)
    }
}
