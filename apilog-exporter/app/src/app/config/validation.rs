use super::{ConfigError, ExporterConfig};
use url::Url;

impl ExporterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A disabled exporter never talks to the server.
        if self.disabled {
            return Ok(());
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "API key is required when the exporter is enabled".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.flush_interval_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Flush interval must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_ms == 0 || self.shutdown_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        if self.retry_delay_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Retry delay must be greater than 0".to_string(),
            ));
        }

        if self.max_retry_delay_ms < self.retry_delay_ms {
            return Err(ConfigError::InvalidConfig(format!(
                "Max retry delay ({}ms) must not be below the base retry delay ({}ms)",
                self.max_retry_delay_ms, self.retry_delay_ms
            )));
        }

        Ok(())
    }
}
