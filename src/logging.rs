//! Logging setup
//!
//! The library only emits `tracing` events; binaries opt into output with [`init`].

use tracing_subscriber::EnvFilter;

/// Variable holding the filter directives, checked before `RUST_LOG`
pub const LOG_ENV: &str = "OPENROUTER_LOG";

/// Install a formatting subscriber, ignoring the error if one is already set
pub fn init() {
    let _ = try_init();
}

/// Install a formatting subscriber filtered by `OPENROUTER_LOG`, then `RUST_LOG`, then `info`
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(
            std::env::var(LOG_ENV).ok(),
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        ))
        .with_target(false)
        .try_init()
}

/// First valid set of directives wins
fn filter_from(directives: Option<String>, fallback: Option<String>) -> EnvFilter {
    [directives, fallback]
        .into_iter()
        .flatten()
        .find_map(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directives() {
        let filter = filter_from(Some("openrouter_client=trace".to_string()), None);
        assert_eq!(filter.to_string(), "openrouter_client=trace");
    }

    #[test]
    fn test_falls_back_to_rust_log() {
        let filter = filter_from(None, Some("warn".to_string()));
        assert_eq!(filter.to_string(), "warn");

        let filter = filter_from(
            Some("openrouter_client=loud".to_string()),
            Some("debug".to_string()),
        );
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_defaults_to_info() {
        assert_eq!(filter_from(None, None).to_string(), "info");
        let filter = filter_from(
            Some("openrouter_client=loud".to_string()),
            Some("hyper=verbose".to_string()),
        );
        assert_eq!(filter.to_string(), "info");
    }
}
