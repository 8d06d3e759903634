//! CLI configuration
//!
//! Loaded through [`FileConfigStore`] and then overridden by `DOCROUTE_*`
//! environment variables. A missing configuration file is fatal.

use anyhow::Context;
use docroute_config_file::FileConfigStore;
use docroute_core::{ConfigStore, GlobalRoutingConfig, SlugConfig};
use docroute_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub routing: GlobalRoutingConfig,

    #[serde(default)]
    pub slug: SlugConfig,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub content: ContentSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database holding URL entries
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "~/.docroute/urls.db".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSettings {
    /// YAML or JSON content tree fixture
    #[serde(default)]
    pub fixture: Option<String>,
}

impl CliConfig {
    /// Load and validate the configuration file
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let path = shellexpand::tilde(path).to_string();

        let store = FileConfigStore::new(&path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path))?;
        let raw = store.get_config().await?;
        store.validate_config(&raw).await?;

        let config: CliConfig =
            serde_json::from_value(raw).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Apply `DOCROUTE_*` environment overrides
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    pub fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Routing settings
        if let Some(val) = var("DOCROUTE_HIDE_TOP_LEVEL_NODE") {
            match val.parse::<bool>() {
                Ok(hide) => self.routing.hide_top_level_node_from_path = hide,
                Err(_) => eprintln!("Warning: Invalid DOCROUTE_HIDE_TOP_LEVEL_NODE '{}'", val),
            }
        }

        if let Some(val) = var("DOCROUTE_FORCE_LEFT_TO_RIGHT") {
            match val.parse::<bool>() {
                Ok(force) => self.routing.force_combine_url_path_left_to_right = force,
                Err(_) => eprintln!("Warning: Invalid DOCROUTE_FORCE_LEFT_TO_RIGHT '{}'", val),
            }
        }

        if let Some(val) = var("DOCROUTE_DEFAULT_UI_LANGUAGE") {
            self.routing.default_ui_language = val;
        }

        // Storage and content
        if let Some(val) = var("DOCROUTE_STORE_PATH") {
            self.store.path = val;
        }

        if let Some(val) = var("DOCROUTE_FIXTURE") {
            self.content.fixture = Some(val);
        }

        // Logging settings
        if let Some(val) = var("DOCROUTE_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Some(val) = var("DOCROUTE_LOG_JSON")
            && let Ok(json) = val.parse::<bool>()
        {
            self.logging.json = json;
        }
    }
}
