//! Routing settings shared by the resolver and the URL service

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Global routing configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalRoutingConfig {
    /// Drop the top-level node's segment from paths when no domain is assigned
    #[serde(default)]
    pub hide_top_level_node_from_path: bool,

    /// Always combine segments root-to-leaf, even for right-to-left cultures
    #[serde(default)]
    pub force_combine_url_path_left_to_right: bool,

    /// Culture used for text direction when a request carries none
    #[serde(default = "default_ui_language")]
    pub default_ui_language: String,
}

fn default_ui_language() -> String {
    "en-US".to_string()
}

impl Default for GlobalRoutingConfig {
    fn default() -> Self {
        Self {
            hide_top_level_node_from_path: false,
            force_combine_url_path_left_to_right: false,
            default_ui_language: default_ui_language(),
        }
    }
}

impl GlobalRoutingConfig {
    pub fn with_hide_top_level_node_from_path(mut self, hide: bool) -> Self {
        self.hide_top_level_node_from_path = hide;
        self
    }

    pub fn with_force_left_to_right(mut self, force: bool) -> Self {
        self.force_combine_url_path_left_to_right = force;
        self
    }

    pub fn with_default_ui_language(mut self, language: impl Into<String>) -> Self {
        self.default_ui_language = language.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_ui_language.trim().is_empty() {
            return Err(Error::ConfigValidation(
                "'default_ui_language' must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// How node names are turned into URL segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Transliterate to ASCII, lowercase, replace everything else with the separator
    Full,
    /// Keep Unicode letters, strip URL-unsafe characters (default)
    #[default]
    Safe,
    /// Transliterate to ASCII but keep the original case
    Ascii,
}

impl SlugMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Safe => "safe",
            Self::Ascii => "ascii",
        }
    }
}

/// Separator used between words of a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugSeparator {
    #[default]
    Dash,
    Underscore,
}

impl SlugSeparator {
    pub const fn as_char(&self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

/// Segment generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugConfig {
    pub mode: SlugMode,
    pub separator: SlugSeparator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalRoutingConfig::default();
        assert!(!config.hide_top_level_node_from_path);
        assert!(!config.force_combine_url_path_left_to_right);
        assert_eq!(config.default_ui_language, "en-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GlobalRoutingConfig =
            serde_json::from_value(serde_json::json!({"hide_top_level_node_from_path": true}))
                .unwrap();
        assert!(config.hide_top_level_node_from_path);
        assert_eq!(config.default_ui_language, "en-US");
    }

    #[test]
    fn test_blank_default_language_rejected() {
        let config = GlobalRoutingConfig::default().with_default_ui_language("  ");
        assert!(matches!(config.validate(), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn test_slug_config_parsing() {
        let config: SlugConfig =
            serde_json::from_value(serde_json::json!({"mode": "full", "separator": "underscore"}))
                .unwrap();
        assert_eq!(config.mode, SlugMode::Full);
        assert_eq!(config.separator.as_char(), '_');

        let config: SlugConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.mode, SlugMode::Safe);
        assert_eq!(config.separator, SlugSeparator::Dash);
    }
}
