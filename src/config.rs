//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub email: EmailConfig,
    pub ui: UiConfig,
}

/// Remote REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Transactional email service settings (EmailJS-compatible REST API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Disable to skip acceptance notifications entirely.
    #[serde(default = "default_email_enabled")]
    pub enabled: bool,
}

fn default_email_enabled() -> bool {
    true
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub dark_mode: bool,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("Backend URL cannot be empty".to_string()));
        }
        if !self.backend.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "Backend URL must start with http:// or https://".to_string(),
            ));
        }
        if self.backend.timeout_secs < 5 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 5 seconds".to_string(),
            ));
        }
        if self.backend.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "Request timeout cannot exceed 300 seconds".to_string(),
            ));
        }
        if self.email.enabled {
            if self.email.service_id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Email service ID is required while email is enabled".to_string(),
                ));
            }
            if self.email.template_id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Email template ID is required while email is enabled".to_string(),
                ));
            }
            if self.email.public_key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Email public key is required while email is enabled".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backend-production-c8da.up.railway.app".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: "service_j8to979".to_string(),
            template_id: "template_ipb5cz3".to_string(),
            public_key: "rJ5kPXerBg9bonHix".to_string(),
            enabled: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { dark_mode: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = AppConfig::default();
        config.backend.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url_scheme() {
        let mut config = AppConfig::default();
        config.backend.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = AppConfig::default();

        config.backend.timeout_secs = 2;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 301;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_email_ids_required_when_enabled() {
        let mut config = AppConfig::default();
        config.email.service_id = String::new();
        assert!(config.validate().is_err());

        // Disabled email skips the identifier checks
        config.email.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.email.template_id, config.email.template_id);
    }

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let text = r#"
            [backend]
            base_url = "https://example.test"

            [email]
            service_id = "svc"
            template_id = "tpl"
            public_key = "key"

            [ui]
            dark_mode = true
        "#;
        let parsed: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(parsed.backend.timeout_secs, 30);
        assert!(parsed.email.enabled);
        assert!(parsed.ui.dark_mode);
    }
}
