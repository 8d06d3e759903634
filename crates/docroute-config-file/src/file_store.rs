//! Config store backed by a single YAML or TOML file

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, error, info};

use docroute_core::{
    Error, GlobalRoutingConfig, Result, SlugConfig,
    config_store::{ConfigStore, section},
};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Routing configuration kept in a YAML (default) or TOML file.
#[derive(Debug)]
pub struct FileConfigStore {
    config_path: PathBuf,
    /// Bumped on every successful write
    version: Arc<AtomicU32>,
}

impl FileConfigStore {
    /// Open an existing YAML or TOML file. A leading `~` is expanded.
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if the file doesn't exist
    /// - `Error::Config` if the home directory can't be determined
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = expand_home(config_path.into())?;

        if !config_path.is_file() {
            error!(path = ?config_path, "Config file not found");
            return Err(Error::ConfigNotFound);
        }

        debug!(path = ?config_path, "Opened config store");

        Ok(Self {
            config_path,
            version: Arc::new(AtomicU32::new(1)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Number of writes since the store was opened, starting at 1
    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    /// Parse the file into a JSON document; a blank file is an empty object
    fn load(&self) -> Result<serde_json::Value> {
        let contents = std::fs::read_to_string(&self.config_path).inspect_err(|e| {
            error!(path = ?self.config_path, "Cannot read config file: {}", e);
        })?;

        if contents.trim().is_empty() {
            return Ok(serde_json::Value::Object(Default::default()));
        }

        let config = FileFormat::of(&self.config_path).parse(&contents)?;
        debug!(path = ?self.config_path, "Loaded config file");
        Ok(config)
    }

    fn store(&self, config: &serde_json::Value) -> Result<()> {
        let contents = FileFormat::of(&self.config_path).render(config)?;
        std::fs::write(&self.config_path, contents).inspect_err(|e| {
            error!(path = ?self.config_path, "Cannot write config file: {}", e);
        })?;

        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        info!(path = ?self.config_path, version, "Config file updated");
        Ok(())
    }
}

/// On-disk syntax, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn parse(self, contents: &str) -> Result<serde_json::Value> {
        let parsed = match self {
            Self::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str::<toml::Value>(contents)
                .map_err(|e| e.to_string())
                .and_then(|value| serde_json::to_value(value).map_err(|e| e.to_string())),
        };
        parsed.map_err(|e| Error::Config(format!("Invalid {:?} config: {}", self, e)))
    }

    fn render(self, config: &serde_json::Value) -> Result<String> {
        let rendered = match self {
            Self::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
            Self::Toml => serde_json::from_value::<toml::Value>(config.clone())
                .map_err(|e| e.to_string())
                .and_then(|value| toml::to_string_pretty(&value).map_err(|e| e.to_string())),
        };
        rendered.map_err(|e| Error::Config(format!("Cannot write {:?} config: {}", self, e)))
    }
}

/// Replace a leading `~` with the home directory
fn expand_home(path: PathBuf) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path);
    };
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(rest))
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_config(&self) -> Result<serde_json::Value> {
        self.load()
    }

    async fn update_config(&self, config: serde_json::Value) -> Result<()> {
        self.validate_config(&config).await?;
        self.store(&config)
    }

    async fn validate_config(&self, config: &serde_json::Value) -> Result<()> {
        let Some(obj) = config.as_object() else {
            return Err(Error::ConfigValidation(
                "Configuration must be an object".to_string(),
            ));
        };

        section::<GlobalRoutingConfig>(config, "routing")?.validate()?;
        section::<SlugConfig>(config, "slug")?;

        if let Some(store) = obj.get("store") {
            match store.get("path") {
                Some(path) if path.is_string() => {}
                Some(_) => {
                    return Err(Error::ConfigValidation(
                        "'store.path' must be a string".to_string(),
                    ));
                }
                None => {
                    return Err(Error::ConfigValidation(
                        "'store' requires a 'path'".to_string(),
                    ));
                }
            }
        }

        if let Some(level) = obj.get("logging").and_then(|l| l.get("level")) {
            let valid = level
                .as_str()
                .is_some_and(|l| LOG_LEVELS.contains(&l.to_lowercase().as_str()));
            if !valid {
                return Err(Error::ConfigValidation(format!(
                    "'logging.level' must be one of {}",
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }
}
