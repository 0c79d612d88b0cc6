use crate::domain::Environment;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const BATCH_PATH: &str = "/api/v1/logs/batch";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub environment: Environment,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
    pub enable_compression: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            environment: Environment::Production,
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            user_agent: concat!("apilog-exporter/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_compression: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    pub client: Client,
    pub config: ClientConfig,
    pub batch_url: Url,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|e| ClientError::InvalidConfiguration(format!("Invalid base URL: {e}")))?;

        if config.api_key.is_empty() {
            return Err(ClientError::InvalidConfiguration(
                "API key must not be empty".to_string(),
            ));
        }

        let batch_url = if base_url.path().ends_with(BATCH_PATH) {
            base_url
        } else {
            let mut url = base_url;
            let path = url.path().trim_end_matches('/').to_string();
            url.set_path(&format!("{path}{BATCH_PATH}"));
            url
        };

        // Per-attempt timeouts are applied on each request by the transmitter.
        let client = ClientBuilder::new()
            .connect_timeout(config.connection_timeout)
            .user_agent(&config.user_agent)
            .gzip(config.enable_compression)
            .build()?;

        Ok(Self {
            client,
            config,
            batch_url,
        })
    }

    pub fn batch_url(&self) -> &Url {
        &self.batch_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            api_key: "key".to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn appends_batch_path_to_base_url() {
        let client = HttpClient::new(config("http://ingest:8080")).unwrap();
        assert_eq!(client.batch_url().as_str(), "http://ingest:8080/api/v1/logs/batch");

        let client = HttpClient::new(config("http://ingest:8080/telemetry/")).unwrap();
        assert_eq!(
            client.batch_url().as_str(),
            "http://ingest:8080/telemetry/api/v1/logs/batch"
        );
    }

    #[test]
    fn keeps_full_batch_url() {
        let client = HttpClient::new(config("http://ingest/api/v1/logs/batch")).unwrap();
        assert_eq!(client.batch_url().path(), "/api/v1/logs/batch");
    }

    #[test]
    fn rejects_bad_url_and_missing_key() {
        assert!(matches!(
            HttpClient::new(config("not a url")),
            Err(ClientError::InvalidConfiguration(_))
        ));

        let missing_key = ClientConfig {
            api_key: String::new(),
            ..config("http://ingest")
        };
        assert!(HttpClient::new(missing_key).is_err());
    }
}
