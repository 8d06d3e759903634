//! Persistence adapter for computed URL entries
//!
//! The `DocumentUrlStore` trait abstracts over where resolved URL entries
//! live, allowing an in-memory store for tests and SQLite for local
//! deployments.

use async_trait::async_trait;

use crate::{
    Result,
    content::ContentKey,
    route::{UrlEntry, UrlEntryKey},
};

/// URL entry store trait
///
/// Implementations:
/// - `InMemoryUrlStore`: `DashMap`-backed, process lifetime only
/// - `SqliteUrlStore`: SQLite database (single node)
///
/// Writers for the same [`UrlEntryKey`] must be serialized by the caller;
/// `DocumentUrlService` does this with per-key locks.
#[async_trait]
pub trait DocumentUrlStore: Send + Sync {
    /// Get a single entry
    async fn get(&self, key: &UrlEntryKey) -> Result<Option<UrlEntry>>;

    /// Insert or replace entries
    ///
    /// # Errors
    /// - `Error::Store` / `Error::Database` for write errors
    async fn save(&self, entries: Vec<UrlEntry>) -> Result<()>;

    /// Delete a single entry, returning whether it existed
    async fn delete(&self, key: &UrlEntryKey) -> Result<bool>;

    /// Delete every entry of a document, returning how many were removed
    async fn delete_document(&self, document_key: ContentKey) -> Result<u64>;

    /// All entries of a document
    async fn entries_for(&self, document_key: ContentKey) -> Result<Vec<UrlEntry>>;

    /// Read a value from the store's key/value table
    async fn get_value(&self, name: &str) -> Result<Option<String>>;

    /// Write a value to the store's key/value table
    async fn set_value(&self, name: &str, value: &str) -> Result<()>;

    /// Schema version of the backing storage, folded into the rebuild fingerprint
    fn schema_version(&self) -> u32 {
        1
    }
}
