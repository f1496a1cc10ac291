use serde::{Deserialize, Serialize};

/// Path fragment that marks an organization page.
const COMPANY_PATH: &str = "/company/";
/// Path fragment that marks an individual profile page.
const PROFILE_PATH: &str = "/in/";

/// The kind of entity a target URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Person,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Company => write!(f, "company"),
            EntityKind::Person => write!(f, "person"),
        }
    }
}

/// Classify a target by the shape of the *requested* URL.
///
/// Redirects never change the classification: a profile link that bounces
/// through a tracking path is still a profile. Returns `None` for URLs
/// outside both recognized namespaces.
pub fn classify(url: &str) -> Option<EntityKind> {
    if url.contains(COMPANY_PATH) {
        Some(EntityKind::Company)
    } else if url.contains(PROFILE_PATH) {
        Some(EntityKind::Person)
    } else {
        None
    }
}

/// One successful extraction. `urn` and `entity_id` come from the same
/// regex match, so they are always jointly present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrnRecord {
    /// The URL as supplied by the caller, casing and form preserved.
    pub input_url: String,
    pub entity_type: EntityKind,
    /// Full matched identifier token, e.g. `urn:li:fsd_company:987654`.
    pub urn: String,
    /// The numeric/alphanumeric component of the URN.
    pub entity_id: String,
}
