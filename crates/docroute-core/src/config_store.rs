//! Configuration store trait
//!
//! The `ConfigStore` trait abstracts where routing configuration lives, so
//! the URL service can be wired against a file today and a database later.

use async_trait::async_trait;

use crate::{Error, Result, config::GlobalRoutingConfig, config::SlugConfig};

/// Configuration store trait
///
/// Implementations:
/// - `FileConfigStore`: YAML/TOML file on disk
///
/// # Example
/// ```no_run
/// # use docroute_core::config_store::ConfigStore;
/// # async fn example(store: &dyn ConfigStore) -> docroute_core::Result<()> {
/// let routing = store.routing_config().await?;
/// println!("hide top level: {}", routing.hide_top_level_node_from_path);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Get the full configuration document as JSON
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if the configuration doesn't exist
    /// - `Error::Config` if it can't be parsed
    async fn get_config(&self) -> Result<serde_json::Value>;

    /// Replace the configuration document
    ///
    /// # Errors
    /// - `Error::ConfigValidation` if the new configuration is invalid
    async fn update_config(&self, config: serde_json::Value) -> Result<()>;

    /// Validate a configuration document before saving
    async fn validate_config(&self, config: &serde_json::Value) -> Result<()>;

    /// Typed `routing` section. A missing section yields the defaults.
    async fn routing_config(&self) -> Result<GlobalRoutingConfig> {
        let config = self.get_config().await?;
        let routing = section::<GlobalRoutingConfig>(&config, "routing")?;
        routing.validate()?;
        Ok(routing)
    }

    /// Typed `slug` section. A missing section yields the defaults.
    async fn slug_config(&self) -> Result<SlugConfig> {
        let config = self.get_config().await?;
        section(&config, "slug")
    }
}

/// Deserialize a top-level section of a configuration document.
pub fn section<T>(config: &serde_json::Value, name: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match config.get(name) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| Error::ConfigValidation(format!("Invalid '{}' section: {}", name, e))),
    }
}
