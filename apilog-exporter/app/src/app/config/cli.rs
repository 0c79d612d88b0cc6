use super::ConfigError;
use super::env::{load_env_flag, load_env_path_opt, load_env_string, load_env_var};
use crate::domain::Environment;
use crate::reliability::RetryPolicy;
use crate::sender::ClientConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("apilog-exporter/", env!("CARGO_PKG_VERSION"));

/// Construction-time settings of an [`crate::Exporter`].
#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[command(author, version, about = "Forward newline-delimited API log entries to an ingestion server", long_about = None)]
#[serde(default)]
pub struct ExporterConfig {
    /// Base URL of the ingestion server
    #[arg(long, env = "APILOG_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Project API key, sent as X-API-Key
    #[arg(long, env = "APILOG_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Environment the API key is bound to, sent as X-Environment
    #[arg(long, env = "APILOG_ENVIRONMENT", value_enum, default_value = "production")]
    pub environment: Environment,

    /// Queue length that triggers a flush
    #[arg(long, env = "APILOG_BATCH_SIZE", default_value = "100")]
    pub batch_size: usize,

    /// Periodic flush interval in milliseconds
    #[arg(long, env = "APILOG_FLUSH_INTERVAL_MS", default_value = "10000")]
    pub flush_interval_ms: u64,

    /// Retries after the first failed attempt of a batch
    #[arg(long, env = "APILOG_MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds, doubled on every retry
    #[arg(long, env = "APILOG_RETRY_DELAY_MS", default_value = "1000")]
    pub retry_delay_ms: u64,

    /// Upper bound of a single backoff delay in milliseconds
    #[arg(long, env = "APILOG_MAX_RETRY_DELAY_MS", default_value = "30000")]
    pub max_retry_delay_ms: u64,

    /// Randomise backoff delays between 50% and 150%
    #[arg(long, env = "APILOG_RETRY_JITTER")]
    pub retry_jitter: bool,

    /// Timeout of one HTTP attempt in milliseconds
    #[arg(long, env = "APILOG_REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Upper bound for shutdown, including the final flush, in milliseconds
    #[arg(long, env = "APILOG_SHUTDOWN_TIMEOUT_MS", default_value = "35000")]
    pub shutdown_timeout_ms: u64,

    /// Ask the server to create users for unseen identifiers
    #[arg(long, env = "APILOG_CREATE_USERS")]
    pub create_users: bool,

    /// Turn the exporter into a no-op
    #[arg(long, env = "APILOG_DISABLED")]
    pub disabled: bool,

    /// User-Agent of outgoing batch requests
    #[arg(long, env = "APILOG_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Configuration file path (optional, TOML)
    #[arg(long, env = "APILOG_CONFIG_FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            environment: Environment::Production,
            batch_size: 100,
            flush_interval_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            max_retry_delay_ms: 30_000,
            retry_jitter: false,
            request_timeout_ms: 30_000,
            shutdown_timeout_ms: 35_000,
            create_users: false,
            disabled: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            config_file: None,
        }
    }
}

impl ExporterConfig {
    /// Parses command-line arguments (falling back to `APILOG_*` variables).
    /// When a config file is named, its contents replace the parsed values.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = ExporterConfig::try_parse_from(args)?;

        if let Some(path) = &config.config_file {
            return Self::from_file(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads `APILOG_*` environment variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ExporterConfig::default();

        load_env_path_opt("APILOG_CONFIG_FILE", &mut config.config_file);
        if let Some(path) = &config.config_file {
            return Self::from_file(path);
        }

        load_env_string("APILOG_BASE_URL", &mut config.base_url);
        load_env_string("APILOG_API_KEY", &mut config.api_key);
        load_env_var("APILOG_ENVIRONMENT", &mut config.environment)?;
        load_env_var("APILOG_BATCH_SIZE", &mut config.batch_size)?;
        load_env_var("APILOG_FLUSH_INTERVAL_MS", &mut config.flush_interval_ms)?;
        load_env_var("APILOG_MAX_RETRIES", &mut config.max_retries)?;
        load_env_var("APILOG_RETRY_DELAY_MS", &mut config.retry_delay_ms)?;
        load_env_var("APILOG_MAX_RETRY_DELAY_MS", &mut config.max_retry_delay_ms)?;
        load_env_flag("APILOG_RETRY_JITTER", &mut config.retry_jitter)?;
        load_env_var("APILOG_REQUEST_TIMEOUT_MS", &mut config.request_timeout_ms)?;
        load_env_var("APILOG_SHUTDOWN_TIMEOUT_MS", &mut config.shutdown_timeout_ms)?;
        load_env_flag("APILOG_CREATE_USERS", &mut config.create_users)?;
        load_env_flag("APILOG_DISABLED", &mut config.disabled)?;
        load_env_string("APILOG_USER_AGENT", &mut config.user_agent);

        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: ExporterConfig = toml::from_str(&content)?;
        config.config_file = Some(path.as_ref().to_path_buf());
        config.validate()?;
        Ok(config)
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_delay_ms),
            max_delay: Duration::from_millis(self.max_retry_delay_ms),
            jitter: self.retry_jitter,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let request_timeout = self.request_timeout();
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            environment: self.environment,
            timeout: request_timeout,
            connection_timeout: request_timeout.min(Duration::from_secs(10)),
            user_agent: self.user_agent.clone(),
            ..ClientConfig::default()
        }
    }
}
