//! Domain assignment lookup

use docroute_core::{ContentKey, DomainService, Result, culture};
use std::sync::Arc;

/// Answers whether a node anchors a route for a culture.
#[derive(Clone)]
pub struct DomainLookup {
    domains: Arc<dyn DomainService>,
}

impl DomainLookup {
    pub fn new(domains: Arc<dyn DomainService>) -> Self {
        Self { domains }
    }

    /// Whether the node has a domain usable for `culture`.
    ///
    /// With no culture any binding counts. Otherwise a binding must carry
    /// the same language (ASCII case-insensitive).
    pub async fn has_domain_assigned(
        &self,
        key: ContentKey,
        culture: Option<&str>,
        include_wildcards: bool,
    ) -> Result<bool> {
        let bindings = self
            .domains
            .get_assigned_domains(key, include_wildcards)
            .await?;

        let Some(culture) = culture::normalize(culture) else {
            return Ok(!bindings.is_empty());
        };

        Ok(bindings.iter().any(|binding| {
            binding
                .language_iso_code
                .as_deref()
                .is_some_and(|language| language.trim().eq_ignore_ascii_case(culture))
        }))
    }
}
