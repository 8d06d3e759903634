//! File-based configuration store for DocRoute
//!
//! This crate implements the `ConfigStore` trait using a YAML or TOML file
//! on disk.
//!
//! # Features
//! - YAML (default) and TOML formats, chosen by file extension
//! - `~` expansion for the configuration path
//! - Validation of the `routing`, `slug`, `store` and `logging` sections
//!
//! # Example
//! ```no_run
//! # use docroute_config_file::FileConfigStore;
//! # use docroute_core::ConfigStore;
//! # async fn example() -> docroute_core::Result<()> {
//! let store = FileConfigStore::new("~/.docroute/config.yaml").await?;
//! let routing = store.routing_config().await?;
//! # Ok(())
//! # }
//! ```

mod file_store;

pub use file_store::FileConfigStore;
