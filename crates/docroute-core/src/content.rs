//! Content tree snapshot types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::{Error, Result, culture};

/// Parent id carried by nodes at the top of the content tree.
pub const ROOT_PARENT_ID: i32 = -1;

/// Tree-wide lock shared by structural writers (move, trash, insert) and
/// the bulk route rebuild while it enumerates documents.
pub type ContentTreeLock = Arc<tokio::sync::RwLock<()>>;

/// Create a fresh, unshared content tree lock.
pub fn new_tree_lock() -> ContentTreeLock {
    Arc::new(tokio::sync::RwLock::new(()))
}

/// Opaque unique identifier of a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(Uuid);

impl ContentKey {
    /// Create a new random content key
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a content key from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a content key from a string
    pub fn from_string(s: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(s)
            .map_err(|e| Error::Repository(format!("Invalid content key format: {}", e)))?;
        Ok(Self(uuid))
    }
}

impl Default for ContentKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

/// Kind of entity a legacy numeric id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Document,
    Media,
}

/// Read-only snapshot of a content node.
///
/// Culture-keyed maps use [`culture::storage_key`] keys (lowercase). A node
/// with no culture names is invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub key: ContentKey,

    /// Legacy numeric identifier
    pub id: i32,

    /// Legacy numeric identifier of the parent, [`ROOT_PARENT_ID`] at the top
    #[serde(default = "default_parent_id")]
    pub parent_id: i32,

    #[serde(default)]
    pub sort_order: i32,

    /// Content type alias, used to pick segment providers per node type
    #[serde(default)]
    pub content_type: String,

    #[serde(default)]
    pub trashed: bool,

    /// Invariant name
    #[serde(default)]
    pub name: Option<String>,

    /// Invariant published state
    #[serde(default)]
    pub published: bool,

    /// Names per culture; the keys are the available cultures
    #[serde(default)]
    pub culture_names: BTreeMap<String, String>,

    #[serde(default)]
    pub published_cultures: BTreeSet<String>,

    /// Explicit URL name overrides per culture ("" for invariant)
    #[serde(default)]
    pub url_names: BTreeMap<String, String>,
}

fn default_parent_id() -> i32 {
    ROOT_PARENT_ID
}

impl ContentNode {
    /// Create an invariant, published node with a name.
    pub fn new(id: i32, parent_id: i32, name: impl Into<String>) -> Self {
        Self {
            key: ContentKey::new(),
            id,
            parent_id,
            sort_order: 0,
            content_type: String::new(),
            trashed: false,
            name: Some(name.into()),
            published: true,
            culture_names: BTreeMap::new(),
            published_cultures: BTreeSet::new(),
            url_names: BTreeMap::new(),
        }
    }

    /// Set the key
    pub fn with_key(mut self, key: ContentKey) -> Self {
        self.key = key;
        self
    }

    /// Set the content type alias
    pub fn with_content_type(mut self, alias: impl Into<String>) -> Self {
        self.content_type = alias.into();
        self
    }

    /// Set the sort order among siblings
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Add a culture variant, optionally published
    pub fn with_culture(mut self, culture: &str, name: impl Into<String>, published: bool) -> Self {
        let key = culture::storage_key(Some(culture));
        if published {
            self.published_cultures.insert(key.clone());
        }
        self.culture_names.insert(key, name.into());
        self
    }

    /// Set an explicit URL name for a culture (`None` for invariant)
    pub fn with_url_name(mut self, culture: Option<&str>, url_name: impl Into<String>) -> Self {
        self.url_names
            .insert(culture::storage_key(culture), url_name.into());
        self
    }

    /// Set the invariant published flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Mark the node as trashed
    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    /// Whether the node varies by culture
    pub fn is_variant(&self) -> bool {
        !self.culture_names.is_empty()
    }

    /// Whether the numeric parent id denotes the top of the tree
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID || self.parent_id == 0
    }

    /// Cultures the node has content for
    pub fn available_cultures(&self) -> impl Iterator<Item = &str> {
        self.culture_names.keys().map(String::as_str)
    }

    pub fn is_culture_available(&self, culture: &str) -> bool {
        self.culture_names
            .contains_key(&culture::storage_key(Some(culture)))
    }

    pub fn is_culture_published(&self, culture: &str) -> bool {
        self.published_cultures
            .contains(&culture::storage_key(Some(culture)))
    }

    /// Name for a culture. Invariant nodes ignore the culture; variant
    /// nodes have no invariant name.
    pub fn name_for(&self, culture: Option<&str>) -> Option<&str> {
        if !self.is_variant() {
            return self.name.as_deref();
        }
        let culture = culture::normalize(culture)?;
        self.culture_names
            .get(&culture::storage_key(Some(culture)))
            .map(String::as_str)
    }

    /// Whether the node is published in the culture, following the same
    /// invariant/variant rules as [`ContentNode::name_for`].
    pub fn is_published_for(&self, culture: Option<&str>) -> bool {
        if !self.is_variant() {
            return self.published;
        }
        culture::normalize(culture).is_some_and(|c| self.is_culture_published(c))
    }

    /// Explicit URL name for the culture, falling back to the invariant override.
    pub fn url_name_for(&self, culture: Option<&str>) -> Option<&str> {
        self.url_names
            .get(&culture::storage_key(culture))
            .or_else(|| self.url_names.get(""))
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty())
    }
}
