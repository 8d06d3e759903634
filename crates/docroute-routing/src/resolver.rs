//! Route resolution
//!
//! A route is built by walking from a document up through its ancestors,
//! collecting one URL segment per node, until a node with a matching domain
//! binding or the top of the tree is reached.

use docroute_core::{
    ContentKey, ContentNode, ContentRepository, DomainService, Error, GlobalRoutingConfig,
    IdKeyMap, Result, Route, culture,
};
use docroute_observability::{Metrics, ResolutionOutcome};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::ascent::{SegmentTrail, parent_key};
use crate::domain::DomainLookup;
use crate::hide_top_level::TopLevelHider;
use crate::segment::UrlSegmentProviderCollection;

enum Resolution {
    Routed { route: Route, depth: usize },
    NotFound,
    Unroutable,
}

/// Resolves the public route of documents.
///
/// Resolution is read-only; one resolver can serve any number of concurrent
/// callers.
pub struct RouteResolver {
    content: Arc<dyn ContentRepository>,
    id_keys: Arc<dyn IdKeyMap>,
    domains: DomainLookup,
    segments: UrlSegmentProviderCollection,
    hider: TopLevelHider,
    config: GlobalRoutingConfig,
    metrics: Option<Arc<Metrics>>,
}

impl RouteResolver {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        id_keys: Arc<dyn IdKeyMap>,
        domains: Arc<dyn DomainService>,
        segments: UrlSegmentProviderCollection,
        config: GlobalRoutingConfig,
    ) -> Self {
        Self {
            hider: TopLevelHider::new(content.clone(), id_keys.clone()),
            content,
            id_keys,
            domains: DomainLookup::new(domains),
            segments,
            config,
            metrics: None,
        }
    }

    /// Record resolution metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &GlobalRoutingConfig {
        &self.config
    }

    pub fn content(&self) -> &Arc<dyn ContentRepository> {
        &self.content
    }

    pub fn segments(&self) -> &UrlSegmentProviderCollection {
        &self.segments
    }

    pub fn domains(&self) -> &DomainLookup {
        &self.domains
    }

    /// Resolve the route of a document.
    ///
    /// `Ok(None)` means the document is missing, trashed, or has no usable
    /// segment somewhere in its ascent. `segment` is reserved and does not
    /// influence the result.
    pub async fn resolve_route(
        &self,
        key: ContentKey,
        is_draft: bool,
        culture: Option<&str>,
        _segment: Option<&str>,
    ) -> Result<Option<Route>> {
        let start = Instant::now();
        let result = self.resolve(key, is_draft, culture).await;
        let elapsed = start.elapsed().as_secs_f64();

        let (outcome, depth) = match &result {
            Ok(Resolution::Routed { depth, .. }) => (ResolutionOutcome::Resolved, *depth),
            Ok(Resolution::NotFound) => (ResolutionOutcome::NotFound, 0),
            Ok(Resolution::Unroutable) => (ResolutionOutcome::Unroutable, 0),
            Err(_) => (ResolutionOutcome::Error, 0),
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_resolution(outcome, depth, elapsed);
        }

        match result? {
            Resolution::Routed { route, .. } => Ok(Some(route)),
            Resolution::NotFound | Resolution::Unroutable => Ok(None),
        }
    }

    async fn resolve(
        &self,
        key: ContentKey,
        is_draft: bool,
        culture: Option<&str>,
    ) -> Result<Resolution> {
        let culture = culture::normalize(culture);
        let published = !is_draft;

        let Some(mut node) = self.content.get_by_key(key).await? else {
            debug!(%key, "Document not found");
            return Ok(Resolution::NotFound);
        };
        if node.trashed {
            debug!(%key, "Document is trashed");
            return Ok(Resolution::NotFound);
        }

        let mut url_segment = self.segments.url_segment(&node, culture, published);
        let mut has_domains = self
            .domains
            .has_domain_assigned(node.key, culture, false)
            .await?;
        let mut trail = SegmentTrail::new();
        let mut visited = HashSet::from([node.key]);

        while !has_domains {
            let Some(segment) = non_blank(url_segment.as_deref()) else {
                debug!(%key, node = %node.key, culture, "No segment in ascent, unroutable");
                return Ok(Resolution::Unroutable);
            };
            trail = trail.push(segment);

            let Some(parent) = self.load_parent(&node).await? else {
                break;
            };
            if !visited.insert(parent.key) {
                warn!(%key, node = %parent.key, "Ascent revisited a node");
                return Err(Error::CorruptTree(format!(
                    "node {} visited twice while resolving {}",
                    parent.key, key
                )));
            }

            url_segment = self.segments.url_segment(&parent, culture, published);
            has_domains = self
                .domains
                .has_domain_assigned(parent.key, culture, false)
                .await?;
            node = parent;
        }

        if non_blank(url_segment.as_deref()).is_none() {
            debug!(%key, terminal = %node.key, culture, "Terminal node has no segment, unroutable");
            return Ok(Resolution::Unroutable);
        }

        if !has_domains && self.config.hide_top_level_node_from_path {
            trail = self.hider.apply(&node, trail).await?;
        }

        let direction_culture = culture.unwrap_or(&self.config.default_ui_language);
        let root_to_leaf = self.config.force_combine_url_path_left_to_right
            || !culture::is_right_to_left(direction_culture);

        let depth = trail.len();
        let path = trail.into_path(root_to_leaf);
        debug!(route = %format!("{}{}", node.id, path), "Resolved route");

        Ok(Resolution::Routed {
            route: Route::new(has_domains.then_some(node.key), path),
            depth,
        })
    }

    /// The node's parent, or `None` when the ascent should end here.
    async fn load_parent(&self, node: &ContentNode) -> Result<Option<ContentNode>> {
        let Some(parent_key) = parent_key(self.id_keys.as_ref(), node).await? else {
            return Ok(None);
        };

        let parent = self.content.get_by_key(parent_key).await?;
        if parent.is_none() {
            warn!(node = %node.key, parent = %parent_key, "Parent missing, ending ascent");
        }
        Ok(parent)
    }
}

fn non_blank(segment: Option<&str>) -> Option<&str> {
    segment.filter(|s| !s.trim().is_empty())
}
