//! URL segment providers
//!
//! A node's URL segment is produced by an ordered chain of providers. The
//! first provider returning a non-blank segment wins; specialized providers
//! sit in front of the default one.

use docroute_core::{ContentNode, SlugConfig};
use std::collections::HashSet;
use std::sync::Arc;

use crate::slug::to_url_segment;

/// Produces the URL segment of a single node.
///
/// Returning `None` (or a blank string) passes the decision on to the next
/// provider in the collection.
pub trait UrlSegmentProvider: Send + Sync {
    fn try_get_segment(
        &self,
        node: &ContentNode,
        culture: Option<&str>,
        published: bool,
    ) -> Option<String>;

    /// Settings that shape the produced segments. Part of the routing
    /// fingerprint, so changing them marks stored URLs as stale.
    fn settings(&self) -> Option<String> {
        None
    }
}

/// Derives the segment from the node's URL name override or its name.
#[derive(Debug, Clone, Default)]
pub struct DefaultUrlSegmentProvider {
    slug: SlugConfig,
}

impl DefaultUrlSegmentProvider {
    pub fn new(slug: SlugConfig) -> Self {
        Self { slug }
    }
}

impl UrlSegmentProvider for DefaultUrlSegmentProvider {
    fn try_get_segment(
        &self,
        node: &ContentNode,
        culture: Option<&str>,
        published: bool,
    ) -> Option<String> {
        // variant nodes have nothing to say without an available culture
        let name = node.name_for(culture)?;

        if published && node.is_variant() && !node.is_published_for(culture) {
            return None;
        }

        let source = node.url_name_for(culture).unwrap_or(name);
        let segment = to_url_segment(source, &self.slug);
        (!segment.is_empty()).then_some(segment)
    }

    fn settings(&self) -> Option<String> {
        Some(format!(
            "slug:{}:{}",
            self.slug.mode.as_str(),
            self.slug.separator.as_char()
        ))
    }
}

/// Applies an inner provider only to nodes of the given content types.
pub struct ContentTypeSegmentProvider {
    content_types: HashSet<String>,
    inner: Arc<dyn UrlSegmentProvider>,
}

impl ContentTypeSegmentProvider {
    pub fn new<I, S>(content_types: I, inner: Arc<dyn UrlSegmentProvider>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            content_types: content_types
                .into_iter()
                .map(|alias| alias.as_ref().to_ascii_lowercase())
                .collect(),
            inner,
        }
    }
}

impl UrlSegmentProvider for ContentTypeSegmentProvider {
    fn try_get_segment(
        &self,
        node: &ContentNode,
        culture: Option<&str>,
        published: bool,
    ) -> Option<String> {
        if !self
            .content_types
            .contains(&node.content_type.to_ascii_lowercase())
        {
            return None;
        }
        self.inner.try_get_segment(node, culture, published)
    }

    fn settings(&self) -> Option<String> {
        let mut content_types: Vec<&str> = self.content_types.iter().map(String::as_str).collect();
        content_types.sort_unstable();
        Some(format!(
            "types:{}>{}",
            content_types.join(","),
            self.inner.settings().unwrap_or_default()
        ))
    }
}

/// Ordered provider chain.
#[derive(Clone)]
pub struct UrlSegmentProviderCollection {
    providers: Vec<Arc<dyn UrlSegmentProvider>>,
}

impl UrlSegmentProviderCollection {
    pub fn new(providers: Vec<Arc<dyn UrlSegmentProvider>>) -> Self {
        Self { providers }
    }

    /// A chain holding only the default provider
    pub fn with_slug_config(slug: SlugConfig) -> Self {
        Self::new(vec![Arc::new(DefaultUrlSegmentProvider::new(slug))])
    }

    /// Put a provider in front of the existing ones
    pub fn prepend(mut self, provider: Arc<dyn UrlSegmentProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Settings of every provider, in chain order
    pub fn settings(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.settings().unwrap_or_default())
            .collect()
    }

    /// First non-blank segment any provider produces
    pub fn url_segment(
        &self,
        node: &ContentNode,
        culture: Option<&str>,
        published: bool,
    ) -> Option<String> {
        self.providers.iter().find_map(|provider| {
            provider
                .try_get_segment(node, culture, published)
                .filter(|segment| !segment.trim().is_empty())
        })
    }
}

impl Default for UrlSegmentProviderCollection {
    fn default() -> Self {
        Self::with_slug_config(SlugConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docroute_core::ROOT_PARENT_ID;

    struct Fixed(Option<&'static str>);

    impl UrlSegmentProvider for Fixed {
        fn try_get_segment(&self, _: &ContentNode, _: Option<&str>, _: bool) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_default_uses_name() {
        let provider = DefaultUrlSegmentProvider::default();
        let node = ContentNode::new(1, ROOT_PARENT_ID, "About Us");
        assert_eq!(
            provider.try_get_segment(&node, None, true),
            Some("about-us".to_string())
        );
    }

    #[test]
    fn test_default_prefers_url_name() {
        let provider = DefaultUrlSegmentProvider::default();
        let node = ContentNode::new(1, ROOT_PARENT_ID, "About Us").with_url_name(None, "Who We Are");
        assert_eq!(
            provider.try_get_segment(&node, Some("en-US"), true),
            Some("who-we-are".to_string())
        );
    }

    #[test]
    fn test_default_variant_requires_published_culture() {
        let provider = DefaultUrlSegmentProvider::default();
        let node = ContentNode::new(2, 1, "x")
            .with_culture("en-US", "Products", true)
            .with_culture("da-DK", "Produkter", false);

        assert_eq!(
            provider.try_get_segment(&node, Some("en-US"), true),
            Some("products".to_string())
        );
        assert_eq!(provider.try_get_segment(&node, Some("da-DK"), true), None);
        assert_eq!(
            provider.try_get_segment(&node, Some("da-DK"), false),
            Some("produkter".to_string())
        );
        assert_eq!(provider.try_get_segment(&node, Some("fr-FR"), false), None);
        assert_eq!(provider.try_get_segment(&node, None, false), None);
    }

    #[test]
    fn test_default_blank_name_yields_none() {
        let provider = DefaultUrlSegmentProvider::default();
        let node = ContentNode::new(1, ROOT_PARENT_ID, "  ?? ");
        assert_eq!(provider.try_get_segment(&node, None, true), None);
    }

    #[test]
    fn test_content_type_provider_filters() {
        let provider = ContentTypeSegmentProvider::new(["BlogPost"], Arc::new(Fixed(Some("post"))));
        let post = ContentNode::new(1, 1, "A").with_content_type("blogPost");
        let page = ContentNode::new(2, 1, "B").with_content_type("page");

        assert_eq!(provider.try_get_segment(&post, None, true), Some("post".to_string()));
        assert_eq!(provider.try_get_segment(&page, None, true), None);
    }

    #[test]
    fn test_collection_first_non_blank_wins() {
        let collection = UrlSegmentProviderCollection::default()
            .prepend(Arc::new(Fixed(Some("second"))))
            .prepend(Arc::new(Fixed(Some("   "))))
            .prepend(Arc::new(Fixed(None)));
        let node = ContentNode::new(1, ROOT_PARENT_ID, "Home");

        assert_eq!(collection.len(), 4);
        assert_eq!(collection.url_segment(&node, None, true), Some("second".to_string()));
    }

    #[test]
    fn test_collection_falls_through_to_default() {
        let collection = UrlSegmentProviderCollection::default().prepend(Arc::new(Fixed(None)));
        let node = ContentNode::new(1, ROOT_PARENT_ID, "Home");
        assert_eq!(collection.url_segment(&node, None, true), Some("home".to_string()));
    }

    #[test]
    fn test_empty_collection() {
        let collection = UrlSegmentProviderCollection::new(Vec::new());
        assert!(collection.is_empty());
        let node = ContentNode::new(1, ROOT_PARENT_ID, "Home");
        assert_eq!(collection.url_segment(&node, None, true), None);
    }

    #[test]
    fn test_settings_follow_slug_config() {
        let default = UrlSegmentProviderCollection::default();
        let ascii = UrlSegmentProviderCollection::with_slug_config(SlugConfig {
            mode: docroute_core::SlugMode::Ascii,
            separator: docroute_core::SlugSeparator::Underscore,
        });
        assert_eq!(default.settings(), vec!["slug:safe:-".to_string()]);
        assert_eq!(ascii.settings(), vec!["slug:ascii:_".to_string()]);

        let chained = default.clone().prepend(Arc::new(ContentTypeSegmentProvider::new(
            ["Product", "article"],
            Arc::new(Fixed(Some("x"))),
        )));
        assert_eq!(
            chained.settings(),
            vec!["types:article,product>".to_string(), "slug:safe:-".to_string()]
        );
    }
}
