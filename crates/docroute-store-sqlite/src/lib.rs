//! SQLite URL entry storage for DocRoute
//!
//! This crate implements the `DocumentUrlStore` trait on a single SQLite
//! database.
//!
//! # Features
//! - WAL journal with a small connection pool
//! - Upserts keyed by `(document_key, culture, segment, is_draft)`
//! - Key/value table for the routing fingerprint
//! - Schema version check on open
//!
//! # Example
//! ```no_run
//! # use docroute_store_sqlite::SqliteUrlStore;
//! # use docroute_core::DocumentUrlStore;
//! # async fn example() -> docroute_core::Result<()> {
//! let store = SqliteUrlStore::new("~/.docroute/urls.db").await?;
//! let fingerprint = store.get_value("docroute.routing.fingerprint").await?;
//! # Ok(())
//! # }
//! ```

mod sqlite_url_store;

pub use sqlite_url_store::SqliteUrlStore;
