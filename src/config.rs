//! Process-wide configuration.
//!
//! Loaded once at startup from environment variables and passed
//! explicitly into the provider client and the HTTP layer; nothing
//! reads ambient global state after startup.

use std::env;

use anyhow::{Context, Result, bail};

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenWeatherMap API key, attached to every upstream request.
    pub api_key: String,
    /// Base URL of the upstream REST API.
    pub base_url: String,
    /// Timeout applied to every upstream call.
    pub timeout_secs: u64,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// City pre-filled on the index page and used when `/weather` is
    /// called without a `city` parameter.
    pub default_city: String,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_port() -> u16 {
    5000
}

fn default_city() -> String {
    "Dhaka".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for everything except the API key.
    pub fn from_env() -> Result<Self> {
        let api_key =
            env::var("OPENWEATHER_API_KEY").context("Missing OPENWEATHER_API_KEY env var")?;

        let base_url =
            env::var("OPENWEATHER_BASE_URL").unwrap_or_else(|_| default_base_url());

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .context("UPSTREAM_TIMEOUT_SECS must be a positive integer")?,
            Err(_) => default_timeout_secs(),
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => default_port(),
        };

        let default_city = env::var("DEFAULT_CITY").unwrap_or_else(|_| default_city());

        let config = Self {
            api_key,
            base_url,
            timeout_secs,
            port,
            default_city,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            bail!("OpenWeatherMap API key cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("Upstream base URL must be a valid HTTP or HTTPS URL");
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            bail!("Upstream timeout must be between 1 and 300 seconds");
        }

        if self.default_city.trim().is_empty() {
            bail!("Default city cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            api_key: "test_api_key_123".to_string(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            port: default_port(),
            default_city: default_city(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = sample_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_city, "Dhaka");
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let mut config = sample_config();
        config.api_key = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = sample_config();
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_timeout_is_rejected() {
        let mut config = sample_config();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 301;
        assert!(config.validate().is_err());
    }
}
