//! In-memory collaborators
//!
//! Backs the CLI's fixture-driven commands and the test suites. The content
//! tree implements both [`ContentRepository`] and [`IdKeyMap`], mirroring a
//! content store that owns its own id/key mapping.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    Error, Result,
    content::{ContentKey, ContentNode, ContentTreeLock, ObjectType, new_tree_lock},
    domain::DomainBinding,
    repository::{ContentRepository, DomainService, IdKeyMap},
    route::{UrlEntry, UrlEntryKey},
    url_store::DocumentUrlStore,
};

/// Content tree held in memory.
#[derive(Debug)]
pub struct InMemoryContentTree {
    nodes: DashMap<ContentKey, ContentNode>,
    ids: DashMap<i32, ContentKey>,
    tree_lock: ContentTreeLock,
}

impl Default for InMemoryContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContentTree {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
            ids: DashMap::new(),
            tree_lock: new_tree_lock(),
        }
    }

    /// Build a tree from nodes without taking the tree lock
    pub fn with_nodes(nodes: impl IntoIterator<Item = ContentNode>) -> Self {
        let tree = Self::new();
        for node in nodes {
            tree.ids.insert(node.id, node.key);
            tree.nodes.insert(node.key, node);
        }
        tree
    }

    /// Lock shared with the bulk rebuild
    pub fn tree_lock(&self) -> ContentTreeLock {
        self.tree_lock.clone()
    }

    /// Insert or replace a node
    pub async fn insert(&self, node: ContentNode) {
        let _guard = self.tree_lock.write().await;
        self.ids.insert(node.id, node.key);
        self.nodes.insert(node.key, node);
    }

    /// Re-parent a node under another node's numeric id
    pub async fn move_node(&self, key: ContentKey, new_parent_id: i32) -> Result<()> {
        let _guard = self.tree_lock.write().await;
        let mut node = self
            .nodes
            .get_mut(&key)
            .ok_or_else(|| Error::Repository(format!("Content not found: {}", key)))?;
        node.parent_id = new_parent_id;
        Ok(())
    }

    /// Move a node to the recycle bin
    pub async fn trash(&self, key: ContentKey) -> Result<()> {
        let _guard = self.tree_lock.write().await;
        let mut node = self
            .nodes
            .get_mut(&key)
            .ok_or_else(|| Error::Repository(format!("Content not found: {}", key)))?;
        node.trashed = true;
        Ok(())
    }

    /// Remove a node entirely
    pub async fn remove(&self, key: ContentKey) -> Option<ContentNode> {
        let _guard = self.tree_lock.write().await;
        let (_, node) = self.nodes.remove(&key)?;
        self.ids.remove(&node.id);
        Some(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentTree {
    async fn get_by_key(&self, key: ContentKey) -> Result<Option<ContentNode>> {
        Ok(self.nodes.get(&key).map(|n| n.value().clone()))
    }

    async fn get_root_content(&self) -> Result<Vec<ContentNode>> {
        let mut roots: Vec<ContentNode> = self
            .nodes
            .iter()
            .filter(|n| n.is_root() && !n.trashed)
            .map(|n| n.value().clone())
            .collect();
        roots.sort_by_key(|n| (n.sort_order, n.id));
        Ok(roots)
    }

    async fn document_keys(&self) -> Result<Vec<ContentKey>> {
        let mut documents: Vec<(i32, ContentKey)> = self
            .nodes
            .iter()
            .filter(|n| !n.trashed)
            .map(|n| (n.id, n.key))
            .collect();
        documents.sort();
        Ok(documents.into_iter().map(|(_, key)| key).collect())
    }
}

#[async_trait]
impl IdKeyMap for InMemoryContentTree {
    async fn get_key_for_id(&self, id: i32, object_type: ObjectType) -> Result<Option<ContentKey>> {
        if object_type != ObjectType::Document {
            return Ok(None);
        }
        Ok(self.ids.get(&id).map(|k| *k.value()))
    }
}

/// Domain assignments held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDomainService {
    domains: DashMap<ContentKey, Vec<DomainBinding>>,
}

impl InMemoryDomainService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: impl IntoIterator<Item = DomainBinding>) -> Self {
        let service = Self::new();
        for binding in bindings {
            service.assign(binding);
        }
        service
    }

    /// Assign a domain to its root content node
    pub fn assign(&self, binding: DomainBinding) {
        let mut bindings = self.domains.entry(binding.root_content_key).or_default();
        bindings.push(binding);
        bindings.sort_by_key(|b| b.sort_order);
    }

    /// Remove every domain of a node
    pub fn clear(&self, key: ContentKey) {
        self.domains.remove(&key);
    }
}

#[async_trait]
impl DomainService for InMemoryDomainService {
    async fn get_assigned_domains(
        &self,
        key: ContentKey,
        include_wildcards: bool,
    ) -> Result<Vec<DomainBinding>> {
        Ok(self
            .domains
            .get(&key)
            .map(|bindings| {
                bindings
                    .iter()
                    .filter(|b| include_wildcards || !b.is_wildcard())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// URL entry store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryUrlStore {
    entries: DashMap<UrlEntryKey, UrlEntry>,
    values: DashMap<String, String>,
}

impl InMemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DocumentUrlStore for InMemoryUrlStore {
    async fn get(&self, key: &UrlEntryKey) -> Result<Option<UrlEntry>> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn save(&self, entries: Vec<UrlEntry>) -> Result<()> {
        for entry in entries {
            self.entries.insert(entry.key.clone(), entry);
        }
        Ok(())
    }

    async fn delete(&self, key: &UrlEntryKey) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn delete_document(&self, document_key: ContentKey) -> Result<u64> {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.document_key != document_key);
        Ok((before - self.entries.len()) as u64)
    }

    async fn entries_for(&self, document_key: ContentKey) -> Result<Vec<UrlEntry>> {
        let mut entries: Vec<UrlEntry> = self
            .entries
            .iter()
            .filter(|e| e.key().document_key == document_key)
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    async fn get_value(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.get(name).map(|v| v.value().clone()))
    }

    async fn set_value(&self, name: &str, value: &str) -> Result<()> {
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Content tree and domain fixture, as loaded from YAML or JSON.
///
/// ```yaml
/// nodes:
///   - key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
///     id: 1
///     name: Home
///     published: true
/// domains:
///   - domain_name: example.com
///     root_content_key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
///     language_iso_code: en-US
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFixture {
    #[serde(default)]
    pub nodes: Vec<ContentNode>,

    #[serde(default)]
    pub domains: Vec<DomainBinding>,
}

impl ContentFixture {
    /// Load a fixture, choosing the format by file extension (YAML by default)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| Error::Repository(format!("Invalid content fixture: {}", e)))
    }

    /// Split into the in-memory collaborators
    pub fn into_collaborators(self) -> (InMemoryContentTree, InMemoryDomainService) {
        (
            InMemoryContentTree::with_nodes(self.nodes),
            InMemoryDomainService::with_bindings(self.domains),
        )
    }
}

#[cfg(test)]
mod tests;
