// Runtime configuration
// Read from the environment once at startup; every value has a default
// so a bare environment still works against a local backend

use std::env;

use crate::api::client::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS};

/// Backend origin used when CODETRACK_API_URL is unset
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Settings shared by the service clients
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Config {
    /// Build the config from environment variables, falling back to the
    /// defaults for anything unset or unparseable
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("CODETRACK_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            request_timeout_ms: env_parse("CODETRACK_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            max_attempts: env_parse("CODETRACK_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_ms, 15_000);
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_from_env_overrides_and_defaults() {
        env::set_var("CODETRACK_API_URL", "http://backend:9000");
        env::set_var("CODETRACK_TIMEOUT_MS", "2500");
        env::set_var("CODETRACK_MAX_ATTEMPTS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.api_base_url, "http://backend:9000");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);

        env::remove_var("CODETRACK_API_URL");
        env::remove_var("CODETRACK_TIMEOUT_MS");
        env::remove_var("CODETRACK_MAX_ATTEMPTS");
    }
}
