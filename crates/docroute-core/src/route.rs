//! Resolved routes and persisted URL entries

use serde::{Deserialize, Serialize};

use crate::{content::ContentKey, culture};

/// A resolved public route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Key of the nearest ancestor with an assigned domain; `None` if no
    /// node in the chain has one
    pub ancestor_key: Option<ContentKey>,

    /// Full path, always starting with `/`
    pub path: String,
}

impl Route {
    pub fn new(ancestor_key: Option<ContentKey>, path: impl Into<String>) -> Self {
        Self {
            ancestor_key,
            path: path.into(),
        }
    }
}

/// Identity of a persisted URL entry.
///
/// Culture and segment are stored normalized: lowercase, `""` for invariant
/// or no segment, so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UrlEntryKey {
    pub document_key: ContentKey,
    pub culture: String,
    pub segment: String,
    pub is_draft: bool,
}

impl UrlEntryKey {
    pub fn new(
        document_key: ContentKey,
        culture: Option<&str>,
        segment: Option<&str>,
        is_draft: bool,
    ) -> Self {
        Self {
            document_key,
            culture: culture::storage_key(culture),
            segment: culture::storage_key(segment),
            is_draft,
        }
    }

    /// Culture as an optional tag (`None` for invariant)
    pub fn culture(&self) -> Option<&str> {
        culture::normalize(Some(&self.culture))
    }
}

/// Persisted URL information for one document/culture/segment/draft tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    #[serde(flatten)]
    pub key: UrlEntryKey,

    /// The node's own URL segment
    pub url_segment: String,

    /// Full resolved route, if the document was routable when stored
    #[serde(default)]
    pub route: Option<Route>,
}

impl UrlEntry {
    pub fn new(key: UrlEntryKey, url_segment: impl Into<String>) -> Self {
        Self {
            key,
            url_segment: url_segment.into(),
            route: None,
        }
    }

    /// Attach the resolved route
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }
}
