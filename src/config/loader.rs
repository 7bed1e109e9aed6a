//! Configuration Loader
//!
//! Builds a [`ClientConfig`] from defaults, an optional JSON file and
//! `OPENROUTER_*` environment variables, in that order.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Partial settings as found in a config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    site_url: Option<String>,
    site_name: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ClientConfig,
}

impl ConfigLoader {
    /// Load `.env`, the first config file found on the default paths, then the environment
    pub fn new() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut loader = Self::default();
        loader.load_from_default_paths()?;
        loader.apply_env();

        Ok(loader)
    }

    /// Create a loader with a specific config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut loader = Self::default();
        loader.load_from_file(path)?;
        loader.apply_env();

        Ok(loader)
    }

    /// Load configuration from default paths
    fn load_from_default_paths(&mut self) -> Result<()> {
        if let Some(path) = Self::get_config_paths().into_iter().find(|p| p.exists()) {
            tracing::debug!(path = %path.display(), "loading config file");
            self.load_from_file(&path)?;
        }
        Ok(())
    }

    /// Get list of config paths to check, most specific first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(custom_path) = std::env::var("OPENROUTER_CONFIG_PATH") {
            paths.push(PathBuf::from(custom_path));
        }

        paths.push(PathBuf::from("openrouter.json"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("openrouter").join("config.json"));
        }

        paths
    }

    /// Load configuration from a specific file
    fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let file: FileConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        self.merge_config(file);
        Ok(())
    }

    /// Overlay the fields the file sets
    fn merge_config(&mut self, other: FileConfig) {
        let config = &mut self.config;
        if let Some(v) = other.api_key {
            config.api_key = v;
        }
        if let Some(v) = other.base_url {
            config.base_url = v;
        }
        if other.site_url.is_some() {
            config.site_url = other.site_url;
        }
        if other.site_name.is_some() {
            config.site_name = other.site_name;
        }
        if other.timeout_secs.is_some() {
            config.timeout_secs = other.timeout_secs;
        }
        if let Some(v) = other.connect_timeout_secs {
            config.connect_timeout_secs = v;
        }
    }

    fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to read variables
    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = &mut self.config;
        if let Some(v) = var("OPENROUTER_API_KEY") {
            config.api_key = v;
        }
        if let Some(v) = var("OPENROUTER_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = var("OPENROUTER_SITE_URL") {
            config.site_url = Some(v);
        }
        if let Some(v) = var("OPENROUTER_SITE_NAME") {
            config.site_name = Some(v);
        }
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Take ownership of the configuration, failing if it is unusable
    pub fn into_config(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_load_from_custom_file() {
        let file = write_config(
            r#"{
                "api_key": "sk-or-file",
                "site_name": "My App",
                "timeout_secs": 30
            }"#,
        );

        let mut loader = ConfigLoader::default();
        loader.load_from_file(file.path()).unwrap();

        let config = loader.config();
        assert_eq!(config.api_key, "sk-or-file");
        assert_eq!(config.site_name.as_deref(), Some("My App"));
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.base_url, crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(r#"{"api_key": "sk-or-file", "base_url": "http://file"}"#);
        let env: HashMap<&str, &str> = [
            ("OPENROUTER_API_KEY", "sk-or-env"),
            ("OPENROUTER_SITE_URL", "https://example.com"),
            ("OPENROUTER_BASE_URL", "  "),
        ]
        .into_iter()
        .collect();

        let mut loader = ConfigLoader::default();
        loader.load_from_file(file.path()).unwrap();
        loader.apply_env_with(|name| env.get(name).map(|v| v.to_string()));

        let config = loader.into_config().unwrap();
        assert_eq!(config.api_key, "sk-or-env");
        assert_eq!(config.site_url.as_deref(), Some("https://example.com"));
        // blank variables are ignored
        assert_eq!(config.base_url, "http://file");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let loader = ConfigLoader::default();
        assert!(matches!(loader.into_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_file() {
        let file = write_config(r#"{"api_key": 42}"#);
        let mut loader = ConfigLoader::default();
        let err = loader.load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));

        let file = write_config(r#"{"providers": {}}"#);
        assert!(loader.load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let mut loader = ConfigLoader::default();
        assert!(matches!(
            loader.load_from_file("/nonexistent/openrouter.json"),
            Err(Error::Config(_))
        ));
    }
}
