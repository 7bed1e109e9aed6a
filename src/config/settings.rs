//! Client Settings

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Base URL of the public API
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

/// Settings for an [`OpenRouterClient`](crate::OpenRouterClient)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer credential; never serialized back out
    #[serde(default, skip_serializing)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `HTTP-Referer` for app attribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Sent as `X-Title` for app attribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Whole-request timeout applied to every call; `None` leaves streams unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the attribution headers
    pub fn with_site(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self.site_name = Some(name.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(
                "API key is missing; set OPENROUTER_API_KEY or api_key in the config file"
                    .to_string(),
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            site_url: None,
            site_name: None,
            timeout_secs: None,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() { "" } else { "[redacted]" };
        f.debug_struct("ClientConfig")
            .field("api_key", &key)
            .field("base_url", &self.base_url)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("sk-or-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("sk-or-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_key_not_serialized() {
        let json = serde_json::to_value(ClientConfig::new("sk-or-secret")).unwrap();
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ClientConfig::default().validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("k").with_base_url("ftp://x").validate(),
            Err(Error::Config(_))
        ));
    }
}
