//! Collaborator traits consumed by route resolution
//!
//! Every lookup is async because real implementations hit storage. A
//! `Ok(None)` means "does not exist"; `Err` is a storage fault.

use async_trait::async_trait;

use crate::{
    Result,
    content::{ContentKey, ContentNode, ObjectType},
    domain::DomainBinding,
};

/// Read access to content node snapshots.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Get a node by key, including trashed nodes
    async fn get_by_key(&self, key: ContentKey) -> Result<Option<ContentNode>>;

    /// Top-level nodes in store order (sort order)
    async fn get_root_content(&self) -> Result<Vec<ContentNode>>;

    /// Keys of every non-trashed document
    async fn document_keys(&self) -> Result<Vec<ContentKey>>;
}

/// Translates legacy numeric identifiers to opaque keys.
#[async_trait]
pub trait IdKeyMap: Send + Sync {
    /// `Ok(None)` when the id has no key of the given type
    async fn get_key_for_id(&self, id: i32, object_type: ObjectType) -> Result<Option<ContentKey>>;
}

/// Domain assignments per node.
#[async_trait]
pub trait DomainService: Send + Sync {
    /// Bindings assigned to the node, wildcard bindings only when requested
    async fn get_assigned_domains(
        &self,
        key: ContentKey,
        include_wildcards: bool,
    ) -> Result<Vec<DomainBinding>>;
}
