//! # Configuration
//!
//! Settings live in `config.json` inside the config directory (the OS config
//! dir for `scripture`, or `$SCRIPTURE_CONFIG_DIR`). A missing file means
//! defaults. After loading, a few environment variables take precedence:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `SCRIPTURE_API_KEY` | `api_key` |
//! | `SCRIPTURE_BASE_URL` | `base_url` |
//! | `SCRIPTURE_RETRY_DELAY_MS` | `retry_base_delay_ms` |
//!
//! The CLI reads and writes single values through [`ClientConfig::get`] and
//! [`ClientConfig::set`], using the dashed key names listed in [`KEYS`].

use crate::cache::CacheTtl;
use crate::catalog::DEFAULT_TRANSLATION;
use crate::error::ConfigError;
use crate::remote::RetryPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
pub const CONFIG_DIR_ENV: &str = "SCRIPTURE_CONFIG_DIR";
pub const DEFAULT_BASE_URL: &str = "https://api.scripture.api.bible/v1";

pub const KEYS: &[&str] = &[
    "base-url",
    "api-key",
    "default-translation",
    "default-ttl-secs",
    "catalog-ttl-secs",
    "search-ttl-secs",
    "max-attempts",
    "retry-base-delay-ms",
    "request-timeout-secs",
    "coalesce-requests",
    "random-seed",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_translation: String,
    pub default_ttl_secs: u64,
    pub catalog_ttl_secs: u64,
    pub search_ttl_secs: u64,
    /// Total attempts per remote call, the first included.
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Share one in-flight fetch between concurrent callers of the same key.
    pub coalesce_requests: bool,
    /// Fixes the random verse sequence when set.
    pub random_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            default_translation: DEFAULT_TRANSLATION.to_string(),
            default_ttl_secs: CacheTtl::DEFAULT.as_secs(),
            catalog_ttl_secs: CacheTtl::CATALOG.as_secs(),
            search_ttl_secs: CacheTtl::SEARCH.as_secs(),
            max_attempts: retry.max_attempts,
            retry_base_delay_ms: retry.base_delay.as_millis() as u64,
            request_timeout_secs: 30,
            coalesce_requests: true,
            random_seed: None,
        }
    }
}

impl ClientConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<(), ConfigError> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies `SCRIPTURE_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SCRIPTURE_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = lookup("SCRIPTURE_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(delay) = lookup("SCRIPTURE_RETRY_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.retry_base_delay_ms = delay;
        }
        self
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }

    /// Reads one value by its dashed key name.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "base-url" => self.base_url.clone(),
            "api-key" => self.api_key.clone(),
            "default-translation" => self.default_translation.clone(),
            "default-ttl-secs" => self.default_ttl_secs.to_string(),
            "catalog-ttl-secs" => self.catalog_ttl_secs.to_string(),
            "search-ttl-secs" => self.search_ttl_secs.to_string(),
            "max-attempts" => self.max_attempts.to_string(),
            "retry-base-delay-ms" => self.retry_base_delay_ms.to_string(),
            "request-timeout-secs" => self.request_timeout_secs.to_string(),
            "coalesce-requests" => self.coalesce_requests.to_string(),
            "random-seed" => self
                .random_seed
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Sets one value by its dashed key name. An empty `random-seed` unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "base-url" => self.base_url = value.trim_end_matches('/').to_string(),
            "api-key" => self.api_key = value.to_string(),
            "default-translation" => self.default_translation = value.to_string(),
            "default-ttl-secs" => self.default_ttl_secs = parse(key, value)?,
            "catalog-ttl-secs" => self.catalog_ttl_secs = parse(key, value)?,
            "search-ttl-secs" => self.search_ttl_secs = parse(key, value)?,
            "max-attempts" => {
                self.max_attempts = parse(key, value)?;
                if self.max_attempts == 0 {
                    return Err(invalid(key, value));
                }
            }
            "retry-base-delay-ms" => self.retry_base_delay_ms = parse(key, value)?,
            "request-timeout-secs" => self.request_timeout_secs = parse(key, value)?,
            "coalesce-requests" => self.coalesce_requests = parse(key, value)?,
            "random-seed" => {
                self.random_seed = if value.is_empty() {
                    None
                } else {
                    Some(parse(key, value)?)
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// `$SCRIPTURE_CONFIG_DIR` if set, otherwise the OS config dir for `scripture`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("org", "scripture", "scripture")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            ConfigError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine a config directory; set SCRIPTURE_CONFIG_DIR",
            ))
        })
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(config.catalog_ttl(), Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.search_ttl(), Duration::from_secs(10 * 60));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert!(config.coalesce_requests);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(temp_dir.path().join("missing")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.set("api-key", "abc123").unwrap();
        config.set("max-attempts", "5").unwrap();
        config.save(temp_dir.path().join("nested")).unwrap();

        let loaded = ClientConfig::load(temp_dir.path().join("nested")).unwrap();
        assert_eq!(loaded.api_key, "abc123");
        assert_eq!(loaded.max_attempts, 5);
    }

    #[test]
    fn test_partial_files_fill_in_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"api_key": "k", "search_ttl_secs": 60}"#,
        )
        .unwrap();

        let config = ClientConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.search_ttl(), Duration::from_secs(60));
        assert_eq!(config.default_translation, DEFAULT_TRANSLATION);
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default().with_env_from(|name| match name {
            "SCRIPTURE_API_KEY" => Some("from-env".to_string()),
            "SCRIPTURE_BASE_URL" => Some("http://localhost:9000".to_string()),
            "SCRIPTURE_RETRY_DELAY_MS" => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.retry_base_delay_ms, 5);
    }

    #[test]
    fn test_get_and_set_by_key() {
        let mut config = ClientConfig::default();
        for key in KEYS {
            assert!(config.get(key).is_ok(), "{key} should be readable");
        }

        config.set("coalesce-requests", "false").unwrap();
        assert_eq!(config.get("coalesce-requests").unwrap(), "false");
        config.set("random-seed", "42").unwrap();
        assert_eq!(config.random_seed, Some(42));
        config.set("random-seed", "").unwrap();
        assert_eq!(config.random_seed, None);
    }

    #[test]
    fn test_rejects_bad_keys_and_values() {
        let mut config = ClientConfig::default();
        assert!(matches!(
            config.set("colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("max-attempts", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("max-attempts", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
