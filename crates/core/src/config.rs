use std::env;
use crate::error::{AppError, Result};
use dotenvy::dotenv;
use url::Url;

/// Default base URL of the prediction service (the server's default bind).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout so every submission reaches a terminal state.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_url: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let server_url =
            env::var("LEAFSCAN_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let timeout_secs = match env::var("LEAFSCAN_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config(format!("LEAFSCAN_TIMEOUT_SECS must be an integer, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::builder()
            .with_server_url(&server_url)
            .with_timeout_secs(timeout_secs)
            .build()
    }

    /// Starts a builder for assembling a config in code, e.g. from UI settings.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`], validating the server URL on `build`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    server_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl ConfigBuilder {
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the server URL does not parse as an
    /// absolute `http`/`https` URL, or the timeout is zero.
    pub fn build(self) -> Result<Config> {
        let raw = self
            .server_url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let parsed = Url::parse(&raw)
            .map_err(|e| AppError::config(format!("Invalid server URL {raw:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "Server URL must be http or https, got {raw:?}"
            )));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::config("Request timeout must be at least 1 second"));
        }

        Ok(Config {
            // Endpoint paths are appended with a leading slash
            server_url: raw.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn builder_normalizes_trailing_slash() {
        let config = Config::builder()
            .with_server_url("http://192.168.1.7:5000/")
            .build()
            .unwrap();
        assert_eq!(config.server_url, "http://192.168.1.7:5000");
    }

    #[test]
    fn builder_rejects_non_http_schemes() {
        assert!(Config::builder().with_server_url("ftp://host").build().is_err());
        assert!(Config::builder().with_server_url("not a url").build().is_err());
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        assert!(Config::builder().with_timeout_secs(0).build().is_err());
    }
}
