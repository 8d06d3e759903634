//! Document URL service
//!
//! Keeps the persisted URL entries in step with the content tree: bulk
//! rebuilds, freshness checks, and single-entry maintenance.

use dashmap::DashMap;
use docroute_core::{
    ContentKey, ContentNode, ContentTreeLock, DocumentUrlStore, Error, Result, UrlEntry,
    UrlEntryKey, culture,
};
use docroute_observability::{Metrics, RebuildOutcome};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use tracing::{debug, error, info, warn};

use crate::resolver::RouteResolver;

/// Key/value entry holding the fingerprint of the last complete rebuild
pub const ROUTING_FINGERPRINT_KEY: &str = "docroute.routing.fingerprint";

/// A document/culture/draft combination the rebuild could not process
#[derive(Debug, Clone, Serialize)]
pub struct RebuildFailure {
    pub document_key: ContentKey,
    pub culture: Option<String>,
    pub is_draft: bool,
    pub error: String,
}

/// Summary of a bulk rebuild
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebuildStats {
    /// Documents visited
    pub documents: u64,
    /// Entries written with a route
    pub entries_saved: u64,
    /// Combinations without a route (stale entries removed)
    pub entries_unroutable: u64,
    pub failures: Vec<RebuildFailure>,
    /// Stopped early by the cancellation signal
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl RebuildStats {
    /// Every document was processed without failures
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }
}

/// Maintains persisted URL entries for documents.
pub struct DocumentUrlService {
    resolver: Arc<RouteResolver>,
    store: Arc<dyn DocumentUrlStore>,
    tree_lock: ContentTreeLock,
    entry_locks: DashMap<UrlEntryKey, Arc<Mutex<()>>>,
    metrics: Option<Arc<Metrics>>,
}

impl DocumentUrlService {
    pub fn new(resolver: Arc<RouteResolver>, store: Arc<dyn DocumentUrlStore>) -> Self {
        Self {
            resolver,
            store,
            tree_lock: docroute_core::content::new_tree_lock(),
            entry_locks: DashMap::new(),
            metrics: None,
        }
    }

    /// Share the lock structural tree writers take
    pub fn with_tree_lock(mut self, tree_lock: ContentTreeLock) -> Self {
        self.tree_lock = tree_lock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn resolver(&self) -> &RouteResolver {
        &self.resolver
    }

    /// Rebuild every URL entry without a way to cancel
    pub async fn rebuild_all_urls(&self) -> Result<RebuildStats> {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        self.rebuild_all_urls_with_cancel(cancel_rx).await
    }

    /// Rebuild every URL entry, stopping between documents once `cancel`
    /// turns true.
    ///
    /// The tree lock is held only while document keys are enumerated.
    /// A failing combination is recorded in the stats and the rebuild moves
    /// on. The routing fingerprint is stored only after a complete run.
    pub async fn rebuild_all_urls_with_cancel(
        &self,
        cancel: watch::Receiver<bool>,
    ) -> Result<RebuildStats> {
        let start = Instant::now();
        let mut stats = RebuildStats::default();

        let keys = {
            let _guard = self.tree_lock.read().await;
            self.resolver.content().document_keys().await?
        };
        info!("Rebuilding URLs for {} documents", keys.len());

        for key in keys {
            if *cancel.borrow() {
                warn!(
                    "URL rebuild cancelled after {} documents",
                    stats.documents
                );
                stats.cancelled = true;
                break;
            }

            self.rebuild_document(key, &mut stats).await;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        if let Some(metrics) = &self.metrics {
            metrics.record_rebuild(start.elapsed().as_secs_f64());
        }

        if stats.is_complete() {
            self.store
                .set_value(ROUTING_FINGERPRINT_KEY, &self.routing_fingerprint())
                .await?;
        }

        info!(
            "URL rebuild finished: {} documents, {} saved, {} unroutable, {} failed in {}ms",
            stats.documents,
            stats.entries_saved,
            stats.entries_unroutable,
            stats.failures.len(),
            stats.duration_ms
        );

        Ok(stats)
    }

    async fn rebuild_document(&self, key: ContentKey, stats: &mut RebuildStats) {
        let node = match self.resolver.content().get_by_key(key).await {
            Ok(Some(node)) if !node.trashed => node,
            Ok(_) => {
                // removed or trashed since enumeration
                debug!(%key, "Document gone, dropping its entries");
                if let Err(e) = self.store.delete_document(key).await {
                    self.record_failure(stats, key, None, false, &e);
                }
                return;
            }
            Err(e) => {
                self.record_failure(stats, key, None, false, &e);
                return;
            }
        };

        stats.documents += 1;

        for culture in cultures_of(&node) {
            for is_draft in [false, true] {
                match self.refresh_entry(&node, culture.as_deref(), is_draft).await {
                    Ok(RebuildOutcome::Persisted) => stats.entries_saved += 1,
                    Ok(_) => stats.entries_unroutable += 1,
                    Err(e) => self.record_failure(stats, key, culture.as_deref(), is_draft, &e),
                }
            }
        }
    }

    /// Resolve one combination and write (or remove) its entry
    async fn refresh_entry(
        &self,
        node: &ContentNode,
        culture: Option<&str>,
        is_draft: bool,
    ) -> Result<RebuildOutcome> {
        let entry_key = UrlEntryKey::new(node.key, culture, None, is_draft);
        let _guard = self.lock_entry(&entry_key).await;

        let route = self
            .resolver
            .resolve_route(node.key, is_draft, culture, None)
            .await?;
        let url_segment = self
            .resolver
            .segments()
            .url_segment(node, culture, !is_draft);

        let outcome = match (route, url_segment) {
            (Some(route), Some(url_segment)) => {
                self.store
                    .save(vec![UrlEntry::new(entry_key, url_segment).with_route(route)])
                    .await?;
                RebuildOutcome::Persisted
            }
            _ => {
                self.store.delete(&entry_key).await?;
                RebuildOutcome::Unroutable
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_rebuild_document(outcome);
        }
        Ok(outcome)
    }

    fn record_failure(
        &self,
        stats: &mut RebuildStats,
        key: ContentKey,
        culture: Option<&str>,
        is_draft: bool,
        e: &Error,
    ) {
        error!(%key, culture, is_draft, "Failed to rebuild URL: {}", e);
        if let Some(metrics) = &self.metrics {
            metrics.record_rebuild_document(RebuildOutcome::Failed);
        }
        stats.failures.push(RebuildFailure {
            document_key: key,
            culture: culture.map(str::to_string),
            is_draft,
            error: e.to_string(),
        });
    }

    /// Whether the stored entries were built with a different schema or
    /// routing configuration (or never built at all)
    pub async fn should_rebuild_urls(&self) -> Result<bool> {
        let stored = self.store.get_value(ROUTING_FINGERPRINT_KEY).await?;
        let current = self.routing_fingerprint();
        Ok(stored.as_deref() != Some(current.as_str()))
    }

    /// SHA-256 over the store schema version, the routing configuration and
    /// the segment provider settings
    pub fn routing_fingerprint(&self) -> String {
        let config = self.resolver.config();
        let mut hasher = Sha256::new();
        hasher.update(self.store.schema_version().to_le_bytes());
        hasher.update([u8::from(config.hide_top_level_node_from_path)]);
        hasher.update([u8::from(config.force_combine_url_path_left_to_right)]);
        hasher.update(config.default_ui_language.as_bytes());
        for settings in self.resolver.segments().settings() {
            hasher.update([0]);
            hasher.update(settings.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Path of a document: the stored route when one exists, otherwise a
    /// live resolution. Missing and trashed documents have no path, whatever
    /// the store still holds.
    pub async fn get_url(
        &self,
        key: ContentKey,
        culture: Option<&str>,
        segment: Option<&str>,
        is_draft: bool,
    ) -> Result<Option<String>> {
        ensure_no_segment(segment)?;

        match self.resolver.content().get_by_key(key).await? {
            Some(node) if !node.trashed => {}
            _ => {
                debug!(%key, "Document missing or trashed, no URL");
                return Ok(None);
            }
        }

        let entry_key = UrlEntryKey::new(key, culture, None, is_draft);
        if let Some(route) = self.store.get(&entry_key).await?.and_then(|e| e.route) {
            return Ok(Some(route.path));
        }

        Ok(self
            .resolver
            .resolve_route(key, is_draft, culture, None)
            .await?
            .map(|route| route.path))
    }

    /// Store an explicit URL segment for one combination.
    ///
    /// A changed segment clears the stored route, which is recomputed on the
    /// next rebuild.
    pub async fn create_or_update_url_segment(
        &self,
        key: ContentKey,
        culture: Option<&str>,
        segment: Option<&str>,
        is_draft: bool,
        url_segment: &str,
    ) -> Result<()> {
        ensure_no_segment(segment)?;
        let url_segment = url_segment.trim();
        if url_segment.is_empty() {
            return Err(Error::Store("URL segment must not be blank".to_string()));
        }

        let entry_key = UrlEntryKey::new(key, culture, None, is_draft);
        let _guard = self.lock_entry(&entry_key).await;
        self.upsert_segment(entry_key, url_segment).await
    }

    /// Compute and store URL segments for documents, for each available
    /// culture and both published and draft. Returns the number of entries
    /// written.
    pub async fn create_or_update_url_segments(&self, documents: &[ContentNode]) -> Result<u64> {
        let mut written = 0;

        for node in documents.iter().filter(|n| !n.trashed) {
            for culture in cultures_of(node) {
                for is_draft in [false, true] {
                    let entry_key = UrlEntryKey::new(node.key, culture.as_deref(), None, is_draft);
                    let _guard = self.lock_entry(&entry_key).await;

                    match self
                        .resolver
                        .segments()
                        .url_segment(node, culture.as_deref(), !is_draft)
                    {
                        Some(url_segment) => {
                            self.upsert_segment(entry_key, &url_segment).await?;
                            written += 1;
                        }
                        None => {
                            self.store.delete(&entry_key).await?;
                        }
                    }
                }
            }
        }

        debug!("Stored {} URL segments for {} documents", written, documents.len());
        Ok(written)
    }

    async fn upsert_segment(&self, entry_key: UrlEntryKey, url_segment: &str) -> Result<()> {
        let entry = match self.store.get(&entry_key).await? {
            Some(existing) if existing.url_segment == url_segment => existing,
            _ => UrlEntry::new(entry_key, url_segment),
        };
        self.store.save(vec![entry]).await
    }

    /// Remove one entry, returning whether it existed
    pub async fn delete_url(
        &self,
        key: ContentKey,
        culture: Option<&str>,
        segment: Option<&str>,
        is_draft: bool,
    ) -> Result<bool> {
        ensure_no_segment(segment)?;
        let entry_key = UrlEntryKey::new(key, culture, None, is_draft);
        let _guard = self.lock_entry(&entry_key).await;
        self.store.delete(&entry_key).await
    }

    /// Remove every entry of a document
    pub async fn delete_urls(&self, key: ContentKey) -> Result<u64> {
        self.store.delete_document(key).await
    }

    async fn lock_entry(&self, key: &UrlEntryKey) -> EntryGuard<'_> {
        let lock = self.entry_locks.entry(key.clone()).or_default().clone();
        EntryGuard {
            guard: Some(lock.lock_owned().await),
            locks: &self.entry_locks,
            key: key.clone(),
        }
    }
}

/// Holds one entry lock; the map slot is dropped once nobody else holds or
/// waits for it.
struct EntryGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a DashMap<UrlEntryKey, Arc<Mutex<()>>>,
    key: UrlEntryKey,
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Cultures to build entries for: every available culture of a variant
/// document, or the invariant culture
fn cultures_of(node: &ContentNode) -> Vec<Option<String>> {
    if node.is_variant() {
        node.available_cultures().map(|c| Some(c.to_string())).collect()
    } else {
        vec![None]
    }
}

fn ensure_no_segment(segment: Option<&str>) -> Result<()> {
    match culture::normalize(segment) {
        Some(segment) => Err(Error::NotSupported(format!(
            "segment variants are not supported yet (segment '{}')",
            segment
        ))),
        None => Ok(()),
    }
}
