use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::{Result, TranslatableError};

/// Translation layer configuration module
/// Holds the process-wide defaults that entity descriptors may override.
/// Every key is optional; missing keys resolve to the built-in defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslatableConfig {
    /// Appended to the primary name to derive the translation model name
    #[serde(default = "default_translation_suffix")]
    pub translation_suffix: String,

    /// Column holding the locale in translation tables
    #[serde(default = "default_locale_key")]
    pub translatable_locale_key: String,

    /// Locale consulted when the requested one has no translation
    #[serde(default)]
    pub fallback_locale: Option<String>,

    /// Whether lookups fall back when neither the call nor the entity decides
    #[serde(default)]
    pub use_translation_fallback: bool,

    /// Known locales; when non-empty only these keys route as locale sub-maps
    #[serde(default)]
    pub locales: Vec<String>,

    /// Locale a fresh `LocaleContext` starts with
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_translation_suffix() -> String {
    "Translation".to_string()
}

fn default_locale_key() -> String {
    "locale".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for TranslatableConfig {
    fn default() -> Self {
        Self {
            translation_suffix: default_translation_suffix(),
            translatable_locale_key: default_locale_key(),
            fallback_locale: None,
            use_translation_fallback: false,
            locales: Vec::new(),
            default_locale: default_locale(),
        }
    }
}

impl TranslatableConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TranslatableError::Config(format!("Invalid configuration JSON: {}", e)))
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslatableError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.translation_suffix.is_empty() {
            return Err(TranslatableError::Config(
                "translation_suffix must not be empty".to_string(),
            ));
        }

        if !crate::database::repository::is_valid_identifier(&self.translatable_locale_key) {
            return Err(TranslatableError::Config(format!(
                "translatable_locale_key '{}' is not a valid column name",
                self.translatable_locale_key
            )));
        }

        if matches!(self.fallback_locale.as_deref(), Some("")) {
            return Err(TranslatableError::Config(
                "fallback_locale must not be empty when set".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured fallback locale, treating an empty string as unset
    pub fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref().filter(|l| !l.is_empty())
    }

    /// Whether `key` may be routed as a locale sub-map during mass assignment
    pub fn accepts_locale(&self, key: &str) -> bool {
        self.locales.is_empty() || self.locales.iter().any(|l| l == key)
    }

    /// Builder-style override of the fallback locale
    pub fn with_fallback_locale(mut self, locale: &str) -> Self {
        self.fallback_locale = Some(locale.to_string());
        self
    }

    /// Builder-style override of the translation suffix
    pub fn with_translation_suffix(mut self, suffix: &str) -> Self {
        self.translation_suffix = suffix.to_string();
        self
    }

    /// Builder-style override of the locale column
    pub fn with_locale_key(mut self, key: &str) -> Self {
        self.translatable_locale_key = key.to_string();
        self
    }

    /// Builder-style override of the global fallback switch
    pub fn with_translation_fallback(mut self, enabled: bool) -> Self {
        self.use_translation_fallback = enabled;
        self
    }
}
