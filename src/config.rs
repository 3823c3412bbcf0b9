use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Recipe backend connection
    #[serde(default)]
    pub api: ApiConfig,
    /// Behaviour when the backend cannot be reached
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Where the pantry and session are persisted
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration for the recipe backend
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for falling back to the bundled catalog and retry behavior
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FallbackConfig {
    /// Whether the bundled catalog answers when the backend fails
    #[serde(default = "default_fallback_enabled")]
    pub enabled: bool,
    /// Attempts against the backend before falling back
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay between attempts in milliseconds (grows linearly with each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: default_fallback_enabled(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for local persistence
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    /// JSON file holding persisted key/value pairs
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_fallback_enabled() -> bool {
    true
}

fn default_retry_attempts() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_storage_path() -> String {
    "mystere-meal-store.json".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MYSTERE_MEAL__ prefix
    /// 2. mystere-meal.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MYSTERE_MEAL__API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("mystere-meal").required(false))
        // Use double underscore for nested: MYSTERE_MEAL__FALLBACK__RETRY_ATTEMPTS
        .add_source(
            Environment::with_prefix("MYSTERE_MEAL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_base_url(), "http://localhost:5000/api");
        assert_eq!(default_timeout(), 30);
        assert!(default_fallback_enabled());
        assert_eq!(default_retry_attempts(), 1);
        assert_eq!(default_retry_delay_ms(), 500);
        assert_eq!(default_storage_path(), "mystere-meal-store.json");
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.fallback.enabled);
        assert_eq!(config.fallback.retry_attempts, 1);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "[api]\nbase_url = \"https://meals.example.com/api\"\n\n[fallback]\nretry_attempts = 3\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.api.base_url, "https://meals.example.com/api");
        assert_eq!(config.api.timeout, 30);
        assert!(config.fallback.enabled);
        assert_eq!(config.fallback.retry_attempts, 3);
        assert_eq!(config.fallback.retry_delay_ms, 500);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_load_config_without_file() {
        // No config file in the test working directory; defaults must deserialize
        let result = load_config();
        assert!(result.is_ok());
    }
}
