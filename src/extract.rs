//! URN extraction over fetched page bodies.
//!
//! The pattern set is an explicit ordered table rather than nested
//! fallbacks: for a given entity kind, entries are tried top to bottom and
//! the first match wins. Patterns run over the raw response body — the
//! URN is embedded in page markup and needs no DOM parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::EntityKind;

/// Ordered (kind, pattern) table. Capture group 1 is the entity id; the
/// full match is the URN. Order within a kind is priority order: the
/// `fsd_profile` form supersedes the legacy `member` form.
static PATTERNS: Lazy<Vec<(EntityKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            EntityKind::Company,
            Regex::new(r"urn:li:fsd_company:(\d+)").unwrap(),
        ),
        (
            EntityKind::Person,
            Regex::new(r"urn:li:fsd_profile:([\w-]+)").unwrap(),
        ),
        (
            EntityKind::Person,
            Regex::new(r"urn:li:member:(\d+)").unwrap(),
        ),
    ]
});

/// A matched identifier token and its id component.
#[derive(Debug, Clone, PartialEq)]
pub struct UrnMatch {
    pub urn: String,
    pub entity_id: String,
}

/// Find the first URN of the given kind in `body`.
pub fn extract(kind: EntityKind, body: &str) -> Option<UrnMatch> {
    PATTERNS
        .iter()
        .filter(|(k, _)| *k == kind)
        .find_map(|(_, re)| {
            re.captures(body).map(|caps| UrnMatch {
                urn: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
                entity_id: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
        })
}
