//! Domain bindings anchoring route resolution at a node

use serde::{Deserialize, Serialize};

use crate::content::ContentKey;

/// Association between a content node and a host (optionally culture-specific).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBinding {
    /// Host name, or `*<id>` for a wildcard (culture-only) binding
    pub domain_name: String,

    /// Node the domain is assigned to
    pub root_content_key: ContentKey,

    /// Language of the binding, if any
    #[serde(default)]
    pub language_iso_code: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

impl DomainBinding {
    pub fn new(domain_name: impl Into<String>, root_content_key: ContentKey) -> Self {
        Self {
            domain_name: domain_name.into(),
            root_content_key,
            language_iso_code: None,
            sort_order: 0,
        }
    }

    /// Set the language of the binding
    pub fn with_language(mut self, language_iso_code: impl Into<String>) -> Self {
        self.language_iso_code = Some(language_iso_code.into());
        self
    }

    /// Wildcard bindings carry only a culture and no real host
    pub fn is_wildcard(&self) -> bool {
        self.domain_name.starts_with('*')
    }
}
